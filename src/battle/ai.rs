//! Ability-selection policies for the computer-controlled opponent.

use crate::combatant::Combatant;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A trait for any system that can pick the opponent's ability for a round.
///
/// The returned index is passed to the encounter unchecked: an out-of-range index
/// aborts the round, an unavailable ability shows up as a failed action. Any
/// randomness must come from `rng`, the encounter's generator, so a seeded
/// encounter replays the same choices.
pub trait Behavior {
    fn choose_ability(&self, actor: &Combatant, foe: &Combatant, rng: &mut StdRng) -> usize;
}

/// Always index 0. Matches the classic duel, where the opponent only ever has one move.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstAbility;

impl Behavior for FirstAbility {
    fn choose_ability(&self, _actor: &Combatant, _foe: &Combatant, _rng: &mut StdRng) -> usize {
        0
    }
}

/// The first ability that is ready and resolvable, falling back to 0.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstUsable;

impl Behavior for FirstUsable {
    fn choose_ability(&self, actor: &Combatant, _foe: &Combatant, _rng: &mut StdRng) -> usize {
        usable_indices(actor).next().unwrap_or(0)
    }
}

/// Picks the ability with the best expected damage, with a bonus for a finishing blow.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyDamage;

impl GreedyDamage {
    pub fn new() -> Self {
        Self
    }

    fn score_ability(
        &self,
        actor: &Combatant,
        index: usize,
        foe: &Combatant,
        rng: &mut StdRng,
    ) -> f32 {
        let Some(ability) = actor.ability(index) else {
            return f32::MIN;
        };
        let Some(expected) = ability.effect().expected_damage() else {
            return 0.0;
        };

        let mut score = expected;
        if expected >= foe.current_hp() as f32 {
            score += 100.0; // Knock-out beats everything else
        }

        // Break ties and keep the opponent from looking scripted.
        let random_factor = 1.0 + (rng.random::<f32>() * 0.1 - 0.05); // +/- 5%
        score * random_factor
    }
}

impl Behavior for GreedyDamage {
    fn choose_ability(&self, actor: &Combatant, foe: &Combatant, rng: &mut StdRng) -> usize {
        usable_indices(actor)
            .max_by_key(|&index| {
                ordered_float::OrderedFloat(self.score_ability(actor, index, foe, rng))
            })
            .unwrap_or(0)
    }
}

/// A uniformly random ready ability.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomChoice;

impl Behavior for RandomChoice {
    fn choose_ability(&self, actor: &Combatant, _foe: &Combatant, rng: &mut StdRng) -> usize {
        let candidates: Vec<usize> = usable_indices(actor).collect();
        candidates.choose(rng).copied().unwrap_or(0)
    }
}

fn usable_indices(actor: &Combatant) -> impl Iterator<Item = usize> + '_ {
    actor
        .abilities()
        .iter()
        .enumerate()
        .filter(|(_, ability)| {
            ability.is_usable() && Combatant::is_supported(ability.target(), ability.effect())
        })
        .map(|(index, _)| index)
}

/// Named policies, selectable from the command line or the server.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    First,
    FirstUsable,
    Greedy,
    Random,
}

impl PolicyKind {
    pub fn into_behavior(self) -> Box<dyn Behavior + Send> {
        match self {
            PolicyKind::First => Box::new(FirstAbility),
            PolicyKind::FirstUsable => Box::new(FirstUsable),
            PolicyKind::Greedy => Box::new(GreedyDamage::new()),
            PolicyKind::Random => Box::new(RandomChoice),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "first" => Ok(PolicyKind::First),
            "first_usable" | "usable" => Ok(PolicyKind::FirstUsable),
            "greedy" => Ok(PolicyKind::Greedy),
            "random" => Ok(PolicyKind::Random),
            other => Err(format!(
                "unknown policy '{}' (expected first, first-usable, greedy or random)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestCombatantBuilder;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rstest::rstest;
    use schema::{AbilityEffect, TargetKind, Uses};

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    fn mixed_kit() -> Combatant {
        TestCombatantBuilder::new("Squirtle", 90)
            .with_targeted_ability("Withdraw", TargetKind::User, AbilityEffect::Protect)
            .with_ability("Bubble", Uses::Unlimited, None, AbilityEffect::DamageRange { min: 1, max: 6 })
            .with_ability("Hydro Burst", Uses::Limited(3), None, AbilityEffect::Damage(12))
            .build()
    }

    #[test]
    fn test_first_ability_ignores_availability() {
        let actor = TestCombatantBuilder::pikachu().build();
        let foe = TestCombatantBuilder::charmander().build();
        assert_eq!(FirstAbility.choose_ability(&actor, &foe, &mut seeded()), 0);
    }

    #[test]
    fn test_first_usable_skips_unsupported_and_depleted() {
        let mut actor = mixed_kit();
        let foe = TestCombatantBuilder::charmander().build();
        assert_eq!(FirstUsable.choose_ability(&actor, &foe, &mut seeded()), 1);

        actor.ability_mut(1).unwrap().uses = Uses::Limited(0);
        assert_eq!(FirstUsable.choose_ability(&actor, &foe, &mut seeded()), 2);
    }

    #[test]
    fn test_greedy_prefers_highest_expected_damage() {
        let actor = mixed_kit();
        let foe = TestCombatantBuilder::charmander().build();
        assert_eq!(GreedyDamage::new().choose_ability(&actor, &foe, &mut seeded()), 2);
    }

    #[test]
    fn test_greedy_falls_back_to_zero_when_nothing_is_usable() {
        let actor = TestCombatantBuilder::new("Stuck", 10)
            .with_ability("Spent", Uses::Limited(0), None, AbilityEffect::Damage(3))
            .build();
        let foe = TestCombatantBuilder::charmander().build();
        assert_eq!(GreedyDamage::new().choose_ability(&actor, &foe, &mut seeded()), 0);
    }

    #[test]
    fn test_random_choice_only_picks_usable_abilities() {
        let actor = mixed_kit();
        let foe = TestCombatantBuilder::charmander().build();
        let mut rng = seeded();
        for _ in 0..50 {
            let choice = RandomChoice.choose_ability(&actor, &foe, &mut rng);
            assert!(choice == 1 || choice == 2, "picked {}", choice);
        }
    }

    #[rstest]
    #[case(PolicyKind::Greedy)]
    #[case(PolicyKind::Random)]
    fn test_same_seed_gives_same_choices(#[case] policy: PolicyKind) {
        let actor = mixed_kit();
        let foe = TestCombatantBuilder::charmander().build();
        let behavior = policy.into_behavior();

        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let first: Vec<usize> = (0..30)
            .map(|_| behavior.choose_ability(&actor, &foe, &mut a))
            .collect();
        let second: Vec<usize> = (0..30)
            .map(|_| behavior.choose_ability(&actor, &foe, &mut b))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_choice_reaches_every_usable_ability() {
        let actor = mixed_kit();
        let foe = TestCombatantBuilder::charmander().build();
        let mut rng = seeded();
        let picks: std::collections::HashSet<usize> = (0..100)
            .map(|_| RandomChoice.choose_ability(&actor, &foe, &mut rng))
            .collect();
        assert_eq!(picks, [1, 2].into_iter().collect());
    }

    #[rstest]
    #[case("first", PolicyKind::First)]
    #[case("first-usable", PolicyKind::FirstUsable)]
    #[case("GREEDY", PolicyKind::Greedy)]
    #[case("random", PolicyKind::Random)]
    fn test_policy_kind_parsing(#[case] input: &str, #[case] expected: PolicyKind) {
        assert_eq!(input.parse::<PolicyKind>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!("smart".parse::<PolicyKind>().is_err());
    }
}
