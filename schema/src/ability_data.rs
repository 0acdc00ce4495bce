use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

/// Who an ability is aimed at.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TargetKind {
    /// The combatant using the ability.
    #[strum(to_string = "self", serialize = "user")]
    User,
    Ally,
    Enemy,
}

/// What an ability does once it lands.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityEffect {
    /// A fixed amount of damage.
    Damage(u16),
    /// A uniformly rolled amount in `[min, max)`. When `min == max` the roll is always `min`.
    DamageRange { min: u16, max: u16 },
    Heal(u16),
    Protect,
    Rally,
}

impl AbilityEffect {
    /// Mean damage dealt per use, or `None` for effects that deal no damage.
    pub fn expected_damage(&self) -> Option<f32> {
        match *self {
            AbilityEffect::Damage(amount) => Some(amount as f32),
            AbilityEffect::DamageRange { min, max } if max > min => {
                // Integer rolls cover min..=max-1
                Some((min as f32 + (max - 1) as f32) / 2.0)
            }
            AbilityEffect::DamageRange { min, .. } => Some(min as f32),
            AbilityEffect::Heal(_) | AbilityEffect::Protect | AbilityEffect::Rally => None,
        }
    }
}

impl fmt::Display for AbilityEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilityEffect::Damage(amount) => write!(f, "Deals {} damage.", amount),
            AbilityEffect::DamageRange { min, max } if max > min => {
                write!(f, "Deals {}-{} damage.", min, max - 1)
            }
            AbilityEffect::DamageRange { min, .. } => write!(f, "Deals {} damage.", min),
            AbilityEffect::Heal(amount) => write!(f, "Restores {} HP.", amount),
            AbilityEffect::Protect => write!(f, "Shields against the next attack."),
            AbilityEffect::Rally => write!(f, "Rallies the team."),
        }
    }
}

/// How many times an ability may be used before a reset.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uses {
    Limited(u32),
    Unlimited,
}

impl Uses {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Uses::Limited(0))
    }

    /// Spend one use. Returns false (and changes nothing) when none are left.
    pub fn consume(&mut self) -> bool {
        match self {
            Uses::Limited(0) => false,
            Uses::Limited(remaining) => {
                *remaining -= 1;
                true
            }
            Uses::Unlimited => true,
        }
    }
}

impl fmt::Display for Uses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uses::Limited(remaining) => write!(f, "{}", remaining),
            Uses::Unlimited => write!(f, "\u{221e}"),
        }
    }
}

/// Static definition of an ability as authored in the species roster.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AbilityData {
    pub name: String,
    pub uses: Uses,
    /// Rounds the ability must rest after use. `None` means no cooldown is enforced.
    #[serde(default)]
    pub cooldown: Option<u8>,
    pub target: TargetKind,
    pub effect: AbilityEffect,
}
