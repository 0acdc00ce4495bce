use crate::errors::UnavailableReason;
use schema::{AbilityData, AbilityEffect, TargetKind, Uses};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an ability can be used this round, derived from its two counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Available,
    Depleted,
    CoolingDown(u8),
}

/// An ability as carried by a combatant during an encounter.
///
/// The static definition lives in `data`; `uses` and `cooldown` are the
/// counters that change round to round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityInst {
    pub data: AbilityData,
    pub uses: Uses,
    pub cooldown: Option<u8>,
}

impl AbilityInst {
    /// Create an ability with full uses. Like a reset, the cooldown starts at its max.
    pub fn new(data: AbilityData) -> Self {
        AbilityInst {
            uses: data.uses,
            cooldown: data.cooldown,
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn target(&self) -> TargetKind {
        self.data.target
    }

    pub fn effect(&self) -> AbilityEffect {
        self.data.effect
    }

    pub fn max_cooldown(&self) -> Option<u8> {
        self.data.cooldown
    }

    /// Advance the cooldown by one round, floored at zero.
    pub fn tick(&mut self) {
        if let Some(cooldown) = self.cooldown.as_mut() {
            *cooldown = cooldown.saturating_sub(1);
        }
    }

    pub fn availability(&self) -> Availability {
        if self.uses.is_exhausted() {
            return Availability::Depleted;
        }
        match self.cooldown {
            Some(rounds) if rounds > 0 => Availability::CoolingDown(rounds),
            _ => Availability::Available,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.availability() == Availability::Available
    }

    /// Why the ability can't be used, or `None` when it can.
    pub fn unavailable_reason(&self) -> Option<UnavailableReason> {
        match self.availability() {
            Availability::Available => None,
            Availability::Depleted => Some(UnavailableReason::NoUsesRemaining),
            Availability::CoolingDown(rounds) => Some(UnavailableReason::OnCooldown(rounds)),
        }
    }

    /// Spend a use if the ability is ready. Returns false and changes nothing otherwise.
    pub fn attempt_use(&mut self) -> bool {
        if !self.is_usable() {
            return false;
        }
        self.uses.consume()
    }

    /// Put the ability back on its full cooldown after it was used.
    pub fn start_cooldown(&mut self) {
        self.cooldown = self.data.cooldown;
    }

    pub fn reset(&mut self) {
        self.uses = self.data.uses;
        self.cooldown = self.data.cooldown;
    }

    /// Action-button label: remaining uses and cooldown progress.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AbilityInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \u{00d7} {}", self.data.name, self.uses)?;
        if let Some(max_cooldown) = self.data.cooldown {
            write!(
                f,
                " Cooldown: {}/{}",
                self.cooldown.unwrap_or(0),
                max_cooldown
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn ability(uses: Uses, cooldown: Option<u8>) -> AbilityInst {
        AbilityInst::new(AbilityData {
            name: "Test Move".to_string(),
            uses,
            cooldown,
            target: TargetKind::Enemy,
            effect: AbilityEffect::Damage(10),
        })
    }

    #[test]
    fn test_new_ability_starts_on_full_cooldown() {
        let ability = ability(Uses::Unlimited, Some(3));
        assert_eq!(ability.cooldown, Some(3));
        assert_eq!(ability.availability(), Availability::CoolingDown(3));
        assert!(!ability.is_usable());
    }

    #[test]
    fn test_absent_cooldown_is_never_enforced() {
        let mut ability = ability(Uses::Unlimited, None);
        assert!(ability.attempt_use());
        ability.start_cooldown();
        assert!(ability.attempt_use());
        ability.tick();
        assert_eq!(ability.cooldown, None);
    }

    #[test]
    fn test_attempt_use_on_depleted_ability_changes_nothing() {
        let mut ability = ability(Uses::Limited(0), None);
        let before = ability.clone();
        assert!(!ability.attempt_use());
        assert_eq!(ability, before);
        assert_eq!(ability.unavailable_reason(), Some(UnavailableReason::NoUsesRemaining));
    }

    #[test]
    fn test_attempt_use_on_cooling_ability_changes_nothing() {
        let mut ability = ability(Uses::Limited(5), Some(2));
        assert!(!ability.attempt_use());
        assert_eq!(ability.uses, Uses::Limited(5));
        assert_eq!(ability.unavailable_reason(), Some(UnavailableReason::OnCooldown(2)));
    }

    #[test]
    fn test_describe_unbounded_without_cooldown() {
        let ability = AbilityInst::new(AbilityData {
            name: "Thunder Jolt".to_string(),
            uses: Uses::Unlimited,
            cooldown: None,
            target: TargetKind::Enemy,
            effect: AbilityEffect::DamageRange { min: 1, max: 5 },
        });
        assert_eq!(ability.describe(), "Thunder Jolt \u{00d7} \u{221e}");
    }

    #[test]
    fn test_describe_limited_with_cooldown_progress() {
        let mut ability = ability(Uses::Limited(4), Some(3));
        ability.tick();
        assert_eq!(ability.describe(), "Test Move \u{00d7} 4 Cooldown: 2/3");
    }

    #[test]
    fn test_reset_restores_uses_and_cooldown() {
        let mut ability = ability(Uses::Limited(2), Some(2));
        ability.tick();
        ability.tick();
        assert!(ability.attempt_use());
        ability.reset();
        assert_eq!(ability.uses, Uses::Limited(2));
        assert_eq!(ability.cooldown, Some(2));
    }

    proptest! {
        #[test]
        fn prop_attempt_use_succeeds_iff_ready(
            remaining in 0u32..5,
            max_cooldown in 0u8..5,
            cooldown in 0u8..5,
        ) {
            let mut ability = ability(Uses::Limited(remaining), Some(max_cooldown));
            ability.cooldown = Some(cooldown.min(max_cooldown));
            let ready = remaining > 0 && ability.cooldown == Some(0);

            let used = ability.attempt_use();

            prop_assert_eq!(used, ready);
            if used {
                prop_assert_eq!(ability.uses, Uses::Limited(remaining - 1));
            } else {
                prop_assert_eq!(ability.uses, Uses::Limited(remaining));
            }
        }

        #[test]
        fn prop_tick_floors_at_zero(max_cooldown in 0u8..10, cooldown in 0u8..10) {
            let mut ability = ability(Uses::Unlimited, Some(max_cooldown));
            let start = cooldown.min(max_cooldown);
            ability.cooldown = Some(start);

            ability.tick();

            prop_assert_eq!(ability.cooldown, Some(start.saturating_sub(1)));
        }
    }
}
