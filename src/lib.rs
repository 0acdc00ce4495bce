// In: src/lib.rs

//! Pokemon Duel Battle Engine
//!
//! A small turn-based duel: two combatants trade abilities with limited uses
//! and cooldowns until one or both run out of health. Species data is compiled
//! into the library at build time and can be overridden from a RON file.

// --- MODULE DECLARATIONS ---
pub mod ability;
pub mod battle;
pub mod combatant;
pub mod display;
pub mod errors;
pub mod interface;
pub mod mcp_service;
pub mod roster;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    AbilityData, AbilityEffect, CatalogIssue, SpeciesCatalog, SpeciesData, TargetKind, Uses,
};

// --- From this crate's modules (`src/`) ---

// Core battle types.
pub use battle::ai::{Behavior, PolicyKind};
pub use battle::encounter::{BattleVerdict, Encounter, EncounterObserver, RoundOutcome};
pub use battle::info::{AbilityInfo, CombatantInfo, EncounterInfo};
pub use battle::state::{BattleEvent, GameState, Side, TurnRng};

// Runtime combatant types.
pub use ability::{AbilityInst, Availability};
pub use combatant::Combatant;

// Species access.
pub use roster::Roster;

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, RosterError, RosterResult,
    UnavailableReason,
};
