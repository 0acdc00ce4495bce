use crate::ability::AbilityInst;
use crate::battle::state::TurnRng;
use crate::errors::{ActionError, BattleResult};
use schema::{AbilityData, AbilityEffect, SpeciesData, TargetKind};
use serde::{Deserialize, Serialize};
use std::fmt;

const SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// The resolved effect of one ability use, computed before any state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedAction {
    pub ability_index: usize,
    pub effect: ResolvedEffect,
}

/// Effects that have a resolution rule. Every other target/effect pair is rejected
/// with `ActionError::UnsupportedEffect` while planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedEffect {
    DamageEnemy(u16),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub pokedex_number: u16, // Only used to build the sprite URL
    pub level: u8,           // Cosmetic
    max_hp: u16,
    current_hp: u16,
    abilities: Vec<AbilityInst>,
}

impl Combatant {
    /// Build a combatant at full health. Abilities start on their full cooldown.
    pub fn new(
        name: impl Into<String>,
        pokedex_number: u16,
        level: u8,
        max_hp: u16,
        abilities: Vec<AbilityData>,
    ) -> Self {
        Combatant {
            name: name.into(),
            pokedex_number,
            level,
            max_hp,
            current_hp: max_hp,
            abilities: abilities.into_iter().map(AbilityInst::new).collect(),
        }
    }

    pub fn from_species(species: &SpeciesData) -> Self {
        Self::new(
            species.name.clone(),
            species.pokedex_number,
            species.level,
            species.max_hp,
            species.abilities.clone(),
        )
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.max_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Set current HP directly, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp);
    }

    pub fn abilities(&self) -> &[AbilityInst] {
        &self.abilities
    }

    pub fn ability(&self, index: usize) -> Option<&AbilityInst> {
        self.abilities.get(index)
    }

    /// Mutable access to a single ability's counters. The list itself can't be resized.
    pub fn ability_mut(&mut self, index: usize) -> Option<&mut AbilityInst> {
        self.abilities.get_mut(index)
    }

    /// Whether the engine knows how to resolve this target/effect pair.
    pub fn is_supported(target: TargetKind, effect: AbilityEffect) -> bool {
        matches!(
            (target, effect),
            (
                TargetKind::Enemy,
                AbilityEffect::Damage(_) | AbilityEffect::DamageRange { .. }
            )
        )
    }

    /// Check that the ability at `index` exists, is ready and can be resolved.
    pub fn check_ability(&self, index: usize) -> Result<&AbilityInst, ActionError> {
        let ability = self
            .abilities
            .get(index)
            .ok_or(ActionError::InvalidAbilityIndex(index))?;

        if let Some(reason) = ability.unavailable_reason() {
            return Err(ActionError::AbilityUnavailable {
                ability: ability.name().to_string(),
                reason,
            });
        }

        if !Self::is_supported(ability.target(), ability.effect()) {
            return Err(ActionError::UnsupportedEffect {
                ability: ability.name().to_string(),
                target: ability.target(),
                effect: ability.effect(),
            });
        }

        Ok(ability)
    }

    /// Validate the ability and roll its effect without touching any state.
    pub fn plan_ability(&self, index: usize, rng: &mut TurnRng) -> BattleResult<PlannedAction> {
        let ability = self.check_ability(index)?;

        let effect = match (ability.target(), ability.effect()) {
            (TargetKind::Enemy, AbilityEffect::Damage(amount)) => ResolvedEffect::DamageEnemy(amount),
            (TargetKind::Enemy, AbilityEffect::DamageRange { min, max }) => {
                let reason = format!("{} damage", ability.name());
                ResolvedEffect::DamageEnemy(rng.roll_range(min, max, &reason)?)
            }
            (
                TargetKind::Enemy,
                AbilityEffect::Heal(_) | AbilityEffect::Protect | AbilityEffect::Rally,
            )
            | (TargetKind::User | TargetKind::Ally, _) => {
                return Err(ActionError::UnsupportedEffect {
                    ability: ability.name().to_string(),
                    target: ability.target(),
                    effect: ability.effect(),
                }
                .into());
            }
        };

        Ok(PlannedAction {
            ability_index: index,
            effect,
        })
    }

    /// Spend the planned ability and apply its effect. The used ability goes back on
    /// its full cooldown.
    pub fn apply_planned(
        &mut self,
        plan: PlannedAction,
        opponent: &mut Combatant,
    ) -> Result<ResolvedEffect, ActionError> {
        let ability = self
            .abilities
            .get_mut(plan.ability_index)
            .ok_or(ActionError::InvalidAbilityIndex(plan.ability_index))?;

        if !ability.attempt_use() {
            return Err(ActionError::AbilityUnavailable {
                ability: ability.name().to_string(),
                reason: ability
                    .unavailable_reason()
                    .unwrap_or(crate::errors::UnavailableReason::NoUsesRemaining),
            });
        }
        ability.start_cooldown();

        match plan.effect {
            ResolvedEffect::DamageEnemy(amount) => opponent.receive_damage(amount),
        }
        Ok(plan.effect)
    }

    /// Use the ability at `index` against `opponent`.
    ///
    /// Nothing changes unless the ability is ready: an unusable ability fails with
    /// `AbilityUnavailable` instead of firing anyway.
    pub fn use_ability(
        &mut self,
        index: usize,
        opponent: &mut Combatant,
        rng: &mut TurnRng,
    ) -> BattleResult<ResolvedEffect> {
        let plan = self.plan_ability(index, rng)?;
        Ok(self.apply_planned(plan, opponent)?)
    }

    pub fn receive_damage(&mut self, amount: u16) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }

    /// Tick every ability except the one just used, which already restarted its cooldown.
    pub fn tick_abilities_except(&mut self, used_index: Option<usize>) {
        for (index, ability) in self.abilities.iter_mut().enumerate() {
            if Some(index) != used_index {
                ability.tick();
            }
        }
    }

    pub fn reset(&mut self) {
        self.current_hp = self.max_hp;
        for ability in &mut self.abilities {
            ability.reset();
        }
    }

    // --- Presentation helpers ---

    pub fn health_summary(&self) -> String {
        format!("{} / {}", self.current_hp, self.max_hp)
    }

    pub fn level_summary(&self) -> String {
        format!("Lvl. {}", self.level)
    }

    pub fn image_url(&self) -> String {
        format!("{}/{}.png", SPRITE_BASE_URL, self.pokedex_number)
    }

    /// Remaining health as a fraction of max, in `0.0..=1.0`.
    pub fn health_ratio(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.current_hp as f32 / self.max_hp as f32
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) HP: {}",
            self.name,
            self.level_summary(),
            self.health_summary()
        )?;
        if f.alternate() {
            for (i, ability) in self.abilities.iter().enumerate() {
                write!(f, "\n  {}. {}", i + 1, ability)?;
            }
        }
        Ok(())
    }
}
