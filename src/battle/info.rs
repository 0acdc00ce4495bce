//! Read-only snapshots of an encounter for observers, the text display and the server.

use crate::ability::AbilityInst;
use crate::battle::state::GameState;
use crate::combatant::Combatant;
use serde::{Deserialize, Serialize};

/// Information about the current encounter for API queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterInfo {
    pub round: u32,
    pub game_state: GameState,
    pub player: CombatantInfo,
    pub opponent: CombatantInfo,
    /// Rendered text of the latest round's events.
    pub messages: Vec<String>,
}

/// Information about one combatant, pre-rendered for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantInfo {
    pub name: String,
    pub level: u8,
    pub pokedex_number: u16,
    pub image_url: String,
    pub current_hp: u16,
    pub max_hp: u16,
    pub health_summary: String,
    pub level_summary: String,
    pub health_percent: u8,
    pub is_fainted: bool,
    pub abilities: Vec<AbilityInfo>,
}

/// One action button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityInfo {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub uses: String,
    pub cooldown: Option<u8>,
    pub max_cooldown: Option<u8>,
    pub effect_text: String,
}

impl CombatantInfo {
    pub fn from_combatant(combatant: &Combatant) -> Self {
        CombatantInfo {
            name: combatant.name.clone(),
            level: combatant.level,
            pokedex_number: combatant.pokedex_number,
            image_url: combatant.image_url(),
            current_hp: combatant.current_hp(),
            max_hp: combatant.max_hp(),
            health_summary: combatant.health_summary(),
            level_summary: combatant.level_summary(),
            health_percent: (combatant.health_ratio() * 100.0).round() as u8,
            is_fainted: combatant.is_fainted(),
            abilities: combatant
                .abilities()
                .iter()
                .enumerate()
                .map(|(index, ability)| AbilityInfo::from_ability(index, ability))
                .collect(),
        }
    }
}

impl AbilityInfo {
    pub fn from_ability(index: usize, ability: &AbilityInst) -> Self {
        AbilityInfo {
            index,
            name: ability.name().to_string(),
            description: ability.describe(),
            enabled: ability.is_usable()
                && Combatant::is_supported(ability.target(), ability.effect()),
            uses: ability.uses.to_string(),
            cooldown: ability.cooldown,
            max_cooldown: ability.max_cooldown(),
            effect_text: ability.effect().to_string(),
        }
    }
}
