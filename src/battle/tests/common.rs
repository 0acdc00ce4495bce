use crate::battle::encounter::Encounter;
use crate::battle::state::TurnRng;
use crate::combatant::Combatant;
use crate::errors::BattleResult;
use schema::{AbilityData, AbilityEffect, TargetKind, Uses};

/// A builder for creating test combatants with common defaults.
///
/// # Example
/// ```
/// let combatant = TestCombatantBuilder::new("Squirtle", 90)
///     .with_ability("Bubble", Uses::Unlimited, None, AbilityEffect::DamageRange { min: 1, max: 6 })
///     .with_hp(30)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    name: String,
    pokedex_number: u16,
    max_hp: u16,
    abilities: Vec<AbilityData>,
    current_hp: Option<u16>,
}

impl TestCombatantBuilder {
    /// Creates a new builder with no abilities.
    pub fn new(name: &str, max_hp: u16) -> Self {
        Self {
            name: name.to_string(),
            pokedex_number: 0,
            max_hp,
            abilities: Vec::new(),
            current_hp: None,
        }
    }

    /// The classic player: a ranged 1-4 jolt and a fixed 10 on a 3-round cooldown.
    pub fn pikachu() -> Self {
        let mut builder = Self::new("Pikachu", 80)
            .with_ability(
                "Thunder Jolt",
                Uses::Unlimited,
                None,
                AbilityEffect::DamageRange { min: 1, max: 5 },
            )
            .with_ability("P-I-K-A-C-H-U-U-U", Uses::Unlimited, Some(3), AbilityEffect::Damage(10));
        builder.pokedex_number = 25;
        builder
    }

    /// The classic opponent: one ranged 2-5 attack.
    pub fn charmander() -> Self {
        let mut builder = Self::new("Charmander", 80).with_ability(
            "Fire Strike",
            Uses::Unlimited,
            None,
            AbilityEffect::DamageRange { min: 2, max: 6 },
        );
        builder.pokedex_number = 4;
        builder
    }

    /// Adds an enemy-targeted ability.
    pub fn with_ability(
        mut self,
        name: &str,
        uses: Uses,
        cooldown: Option<u8>,
        effect: AbilityEffect,
    ) -> Self {
        self.abilities.push(AbilityData {
            name: name.to_string(),
            uses,
            cooldown,
            target: TargetKind::Enemy,
            effect,
        });
        self
    }

    /// Adds an unlimited, cooldown-free ability with an arbitrary target.
    pub fn with_targeted_ability(mut self, name: &str, target: TargetKind, effect: AbilityEffect) -> Self {
        self.abilities.push(AbilityData {
            name: name.to_string(),
            uses: Uses::Unlimited,
            cooldown: None,
            target,
            effect,
        });
        self
    }

    /// Sets the current HP for the test combatant. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    /// Builds the `Combatant`.
    pub fn build(self) -> Combatant {
        let mut combatant = Combatant::new(self.name, self.pokedex_number, 1, self.max_hp, self.abilities);
        if let Some(hp) = self.current_hp {
            combatant.set_hp(hp);
        }
        combatant
    }
}

/// Creates a standard encounter with the default always-first opponent policy.
pub fn create_test_encounter(player: Combatant, opponent: Combatant) -> Encounter {
    Encounter::new(player, opponent).with_seed(42)
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// Useful for tests where the specific RNG outcome is not important, preventing errors from exhaustion.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Creates a `TurnRng` that replays exactly the given percent outcomes.
pub fn scripted_rng(outcomes: &[u8]) -> TurnRng {
    TurnRng::new_for_test(outcomes.to_vec())
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
