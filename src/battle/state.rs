use crate::battle::encounter::Encounter;
use crate::errors::{BattleResult, BattleStateError, UnavailableReason};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    WaitingForAction,
    RoundInProgress,
    PlayerWin,
    OpponentWin,
    Draw,
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameState::PlayerWin | GameState::OpponentWin | GameState::Draw
        )
    }
}

/// Which of the two combatants an event or result refers to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn other(&self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ActionFailureReason {
    NoUsesRemaining,
    OnCooldown { rounds: u8 },
    UnsupportedEffect,
}

impl From<UnavailableReason> for ActionFailureReason {
    fn from(reason: UnavailableReason) -> Self {
        match reason {
            UnavailableReason::NoUsesRemaining => ActionFailureReason::NoUsesRemaining,
            UnavailableReason::OnCooldown(rounds) => ActionFailureReason::OnCooldown { rounds },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    // Round Management
    RoundStarted {
        round: u32,
    },
    RoundEnded,

    // Actions
    AbilityUsed {
        side: Side,
        ability: String,
    },
    DamageDealt {
        target: Side,
        damage: u16,
        remaining_hp: u16,
    },
    ActionFailed {
        side: Side,
        ability: String,
        reason: ActionFailureReason,
    },
    CooldownsTicked {
        side: Side,
    },
    CombatantFainted {
        side: Side,
    },

    // Battle End
    BattleEnded {
        winner: Option<Side>,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using encounter context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, encounter: &Encounter) -> Option<String> {
        match self {
            BattleEvent::RoundStarted { round } => Some(format!("=== Round {} ===", round)),
            BattleEvent::RoundEnded => None,
            BattleEvent::AbilityUsed { side, ability } => Some(format!(
                "{} used {}!",
                encounter.combatant(*side).name,
                ability
            )),
            BattleEvent::DamageDealt { target, damage, .. } => Some(format!(
                "{} took {} damage!",
                encounter.combatant(*target).name,
                damage
            )),
            BattleEvent::ActionFailed {
                side,
                ability,
                reason,
            } => Some(format!(
                "{} tried to use {}, {}",
                encounter.combatant(*side).name,
                ability,
                Self::format_failure_reason(reason)
            )),
            BattleEvent::CooldownsTicked { .. } => None,
            BattleEvent::CombatantFainted { side } => {
                Some(format!("{} fainted!", encounter.combatant(*side).name))
            }
            BattleEvent::BattleEnded { winner } => match winner {
                Some(side) => Some(format!("{} Wins!", encounter.combatant(*side).name)),
                None => Some("Draw!".to_string()),
            },
        }
    }

    fn format_failure_reason(reason: &ActionFailureReason) -> String {
        match reason {
            ActionFailureReason::NoUsesRemaining => "but it has no uses left!".to_string(),
            ActionFailureReason::OnCooldown { rounds } => {
                format!("but it needs {} more round(s) to recover!", rounds)
            }
            ActionFailureReason::UnsupportedEffect => "but nothing happened!".to_string(),
        }
    }
}

/// Event bus for collecting the events of a single round.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// Render every non-silent event, one per line.
    pub fn format_all(&self, encounter: &Encounter) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| event.format(encounter))
            .collect()
    }
}

/// Percent-roll oracle for one round.
///
/// Outcomes are in `1..=100`. Live RNGs draw from a `StdRng`; test RNGs replay a
/// fixed list and fail with `RngExhausted` once it runs out.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<u8>, index: usize },
    Live(StdRng),
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Live(StdRng::from_os_rng()),
        }
    }

    pub fn new_seeded(seed: u64) -> Self {
        Self {
            source: RngSource::Live(StdRng::seed_from_u64(seed)),
        }
    }

    /// Derive an independent per-round RNG from an encounter-level generator.
    pub fn from_parent(parent: &mut StdRng) -> Self {
        Self {
            source: RngSource::Live(StdRng::from_rng(parent)),
        }
    }

    pub fn next_outcome(&mut self, reason: &str) -> BattleResult<u8> {
        match &mut self.source {
            RngSource::Scripted { outcomes, index } => {
                let outcome = *outcomes
                    .get(*index)
                    .ok_or_else(|| BattleStateError::RngExhausted(reason.to_string()))?;
                *index += 1;
                tracing::trace!(outcome, reason, "consumed scripted outcome");
                Ok(outcome)
            }
            RngSource::Live(rng) => Ok(rng.random_range(1..=100)),
        }
    }

    /// Roll an integer in `[min, max)`. A collapsed range (`max <= min`) yields `min`
    /// without consuming an outcome.
    ///
    /// Live RNGs draw the value directly. Scripted outcomes map `o` to
    /// `min + (o - 1) * (max - min) / 100`.
    pub fn roll_range(&mut self, min: u16, max: u16, reason: &str) -> BattleResult<u16> {
        if max <= min {
            return Ok(min);
        }
        if let RngSource::Live(rng) = &mut self.source {
            return Ok(rng.random_range(min..max));
        }
        let outcome = self.next_outcome(reason)?;
        let span = (max - min) as u32;
        let offset = (outcome.saturating_sub(1) as u32 * span) / 100;
        Ok(min + offset as u16)
    }
}
