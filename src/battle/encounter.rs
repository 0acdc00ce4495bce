use crate::battle::ai::{Behavior, FirstAbility};
use crate::battle::info::{CombatantInfo, EncounterInfo};
use crate::battle::state::{
    ActionFailureReason, BattleEvent, EventBus, GameState, Side, TurnRng,
};
use crate::combatant::{Combatant, PlannedAction, ResolvedEffect};
use crate::errors::{ActionError, BattleEngineError, BattleResult, BattleStateError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Receives encounter snapshots. Implementations must not assume they can
/// drive the encounter from inside a callback.
pub trait EncounterObserver {
    /// Called when the observer subscribes and again after every restart.
    fn on_init(&mut self, info: &EncounterInfo);

    /// Called once per resolved round, before the terminal check.
    fn on_update(&mut self, info: &EncounterInfo);

    /// Called once when a round ends the encounter.
    fn on_finished(&mut self, _info: &EncounterInfo, _outcome: &RoundOutcome) {}
}

/// Win/draw status derived from the two health totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleVerdict {
    pub finished: bool,
    pub draw: bool,
    pub winner: Option<Side>,
    pub loser: Option<Side>,
}

/// Everything one call to `play_round` produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round: u32,
    pub finished: bool,
    pub draw: bool,
    pub winner: Option<Side>,
    pub loser: Option<Side>,
    pub events: Vec<BattleEvent>,
}

impl RoundOutcome {
    fn new(round: u32, verdict: BattleVerdict, events: Vec<BattleEvent>) -> Self {
        RoundOutcome {
            round,
            finished: verdict.finished,
            draw: verdict.draw,
            winner: verdict.winner,
            loser: verdict.loser,
            events,
        }
    }
}

/// A one-on-one battle between the player and a computer-controlled opponent.
pub struct Encounter {
    pub player: Combatant,
    pub opponent: Combatant,
    round: u32,
    game_state: GameState,
    behavior: Box<dyn Behavior + Send>,
    rng: StdRng,
    observers: Vec<Box<dyn EncounterObserver + Send>>,
    event_log: Vec<BattleEvent>,
}

impl fmt::Debug for Encounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encounter")
            .field("player", &self.player)
            .field("opponent", &self.opponent)
            .field("round", &self.round)
            .field("game_state", &self.game_state)
            .field("observers", &self.observers.len())
            .field("events", &self.event_log.len())
            .finish()
    }
}

impl Encounter {
    pub fn new(player: Combatant, opponent: Combatant) -> Self {
        Encounter {
            player,
            opponent,
            round: 1,
            game_state: GameState::WaitingForAction,
            behavior: Box::new(FirstAbility),
            rng: StdRng::from_os_rng(),
            observers: Vec::new(),
            event_log: Vec::new(),
        }
    }

    /// Replace the opponent's ability-selection policy.
    pub fn with_behavior(mut self, behavior: Box<dyn Behavior + Send>) -> Self {
        self.behavior = behavior;
        self
    }

    /// Make every damage roll and every opponent choice reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn subscribe(&mut self, mut observer: Box<dyn EncounterObserver + Send>) {
        observer.on_init(&self.info());
        self.observers.push(observer);
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn info(&self) -> EncounterInfo {
        let latest_round = self
            .event_log
            .iter()
            .rposition(|event| matches!(event, BattleEvent::RoundStarted { .. }))
            .unwrap_or(self.event_log.len());
        let messages = self.event_log[latest_round..]
            .iter()
            .filter_map(|event| event.format(self))
            .collect();
        self.info_with_messages(messages)
    }

    fn info_with_messages(&self, messages: Vec<String>) -> EncounterInfo {
        EncounterInfo {
            round: self.round,
            game_state: self.game_state,
            player: CombatantInfo::from_combatant(&self.player),
            opponent: CombatantInfo::from_combatant(&self.opponent),
            messages,
        }
    }

    /// Finished iff either side is at 0 HP; a draw iff both are.
    pub fn battle_result(&self) -> BattleVerdict {
        match (self.player.is_fainted(), self.opponent.is_fainted()) {
            (true, true) => BattleVerdict {
                finished: true,
                draw: true,
                winner: None,
                loser: None,
            },
            (false, true) => BattleVerdict {
                finished: true,
                draw: false,
                winner: Some(Side::Player),
                loser: Some(Side::Opponent),
            },
            (true, false) => BattleVerdict {
                finished: true,
                draw: false,
                winner: Some(Side::Opponent),
                loser: Some(Side::Player),
            },
            (false, false) => BattleVerdict {
                finished: false,
                draw: false,
                winner: None,
                loser: None,
            },
        }
    }

    pub fn all_events(&self) -> &[BattleEvent] {
        &self.event_log
    }

    /// Events logged after the first `index` ones, for incremental consumers.
    pub fn events_since(&self, index: usize) -> &[BattleEvent] {
        &self.event_log[index.min(self.event_log.len())..]
    }

    /// Resolve one round with the player using the ability at `player_index`.
    pub fn play_round(&mut self, player_index: usize) -> BattleResult<RoundOutcome> {
        let rng = TurnRng::from_parent(&mut self.rng);
        self.play_round_with_rng(player_index, rng)
    }

    /// Like `play_round`, with the damage rolls drawn from `rng`.
    ///
    /// Validation and rolls happen before anything changes, so an error leaves the
    /// encounter exactly as it was.
    pub fn play_round_with_rng(
        &mut self,
        player_index: usize,
        mut rng: TurnRng,
    ) -> BattleResult<RoundOutcome> {
        match self.game_state {
            // Only left behind when an observer panicked mid-round and the caller
            // caught it. `restart` clears it.
            GameState::RoundInProgress => return Err(BattleStateError::RoundInProgress.into()),
            state if state.is_terminal() => {
                return Err(BattleStateError::IllegalActionInTerminalState(state).into());
            }
            _ => {}
        }

        let player_plan = match self.player.plan_ability(player_index, &mut rng) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(player_index, error = %e, "rejected player action");
                return Err(e);
            }
        };

        let opponent_index =
            self.behavior
                .choose_ability(&self.opponent, &self.player, &mut self.rng);
        let opponent_plan = match self.opponent.plan_ability(opponent_index, &mut rng) {
            Ok(plan) => Ok(plan),
            Err(BattleEngineError::Action(ActionError::AbilityUnavailable { ability, reason })) => {
                Err((ability, ActionFailureReason::from(reason)))
            }
            Err(BattleEngineError::Action(ActionError::UnsupportedEffect { ability, .. })) => {
                Err((ability, ActionFailureReason::UnsupportedEffect))
            }
            Err(e) => return Err(e),
        };

        tracing::debug!(
            round = self.round,
            player_index,
            opponent_index,
            "resolving round"
        );
        self.game_state = GameState::RoundInProgress;

        let mut bus = EventBus::new();
        bus.push(BattleEvent::RoundStarted { round: self.round });

        if let Err(e) = self.resolve_round(player_plan, opponent_plan, &mut bus) {
            self.game_state = GameState::WaitingForAction;
            return Err(e);
        }

        let info = self.info_with_messages(bus.format_all(self));
        for observer in &mut self.observers {
            observer.on_update(&info);
        }

        let verdict = self.battle_result();
        let played_round = self.round;
        if verdict.finished {
            self.game_state = match verdict.winner {
                Some(Side::Player) => GameState::PlayerWin,
                Some(Side::Opponent) => GameState::OpponentWin,
                None => GameState::Draw,
            };
            bus.push(BattleEvent::BattleEnded {
                winner: verdict.winner,
            });
            tracing::info!(
                round = played_round,
                state = ?self.game_state,
                "encounter finished"
            );
        } else {
            self.game_state = GameState::WaitingForAction;
            self.round += 1;
        }
        bus.push(BattleEvent::RoundEnded);

        let events = bus.into_events();
        self.event_log.extend(events.iter().cloned());
        let outcome = RoundOutcome::new(played_round, verdict, events);

        if outcome.finished {
            let info = self.info();
            for observer in &mut self.observers {
                observer.on_finished(&info, &outcome);
            }
        }

        Ok(outcome)
    }

    /// Player strictly first. The opponent still acts when already knocked out.
    fn resolve_round(
        &mut self,
        player_plan: PlannedAction,
        opponent_plan: Result<PlannedAction, (String, ActionFailureReason)>,
        bus: &mut EventBus,
    ) -> BattleResult<()> {
        self.apply_action(Side::Player, player_plan, bus)?;

        let opponent_used = match opponent_plan {
            Ok(plan) => {
                self.apply_action(Side::Opponent, plan, bus)?;
                Some(plan.ability_index)
            }
            Err((ability, reason)) => {
                tracing::debug!(%ability, ?reason, "opponent action failed");
                bus.push(BattleEvent::ActionFailed {
                    side: Side::Opponent,
                    ability,
                    reason,
                });
                None
            }
        };

        self.player
            .tick_abilities_except(Some(player_plan.ability_index));
        bus.push(BattleEvent::CooldownsTicked { side: Side::Player });
        self.opponent.tick_abilities_except(opponent_used);
        bus.push(BattleEvent::CooldownsTicked {
            side: Side::Opponent,
        });
        Ok(())
    }

    fn apply_action(
        &mut self,
        side: Side,
        plan: PlannedAction,
        bus: &mut EventBus,
    ) -> BattleResult<()> {
        let target = side.other();
        let was_standing = !self.combatant(target).is_fainted();

        let (actor, foe) = match side {
            Side::Player => (&mut self.player, &mut self.opponent),
            Side::Opponent => (&mut self.opponent, &mut self.player),
        };
        let ability = actor
            .ability(plan.ability_index)
            .map(|a| a.name().to_string())
            .unwrap_or_default();
        let effect = actor.apply_planned(plan, foe)?;

        bus.push(BattleEvent::AbilityUsed { side, ability });
        match effect {
            ResolvedEffect::DamageEnemy(damage) => {
                let remaining_hp = self.combatant(target).current_hp();
                bus.push(BattleEvent::DamageDealt {
                    target,
                    damage,
                    remaining_hp,
                });
            }
        }

        if was_standing && self.combatant(target).is_fainted() {
            bus.push(BattleEvent::CombatantFainted { side: target });
        }
        Ok(())
    }

    /// Reset both combatants and start over from round 1.
    pub fn restart(&mut self) {
        self.player.reset();
        self.opponent.reset();
        self.round = 1;
        self.game_state = GameState::WaitingForAction;
        self.event_log.clear();

        let info = self.info();
        for observer in &mut self.observers {
            observer.on_init(&info);
        }
        tracing::debug!("encounter restarted");
    }
}
