use crate::battle::state::GameState;
use schema::{AbilityEffect, CatalogIssue, TargetKind};
use thiserror::Error;

/// Main error type for the Pokemon Duel battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// Error related to species roster lookup or loading
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Error related to invalid combatant actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
}

/// Errors related to the species roster
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// The requested species is not in the roster
    #[error("Species not found: {0}")]
    SpeciesNotFound(String),
    /// The roster file could not be read
    #[error("Could not read roster file {path}: {details}")]
    Io { path: String, details: String },
    /// The roster source is not valid RON or postcard data
    #[error("Malformed roster data: {0}")]
    Parse(String),
    /// The roster parsed but breaks a combatant invariant
    #[error("Invalid roster: {0}")]
    Invalid(CatalogIssue),
}

/// Errors related to encounter state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    /// A round was requested after the encounter reached a terminal state
    #[error("The battle is over ({0:?}); start a new battle to keep playing")]
    IllegalActionInTerminalState(GameState),
    /// A round was requested while another one was still resolving
    #[error("A round is already being resolved")]
    RoundInProgress,
    /// A scripted RNG ran out of outcomes
    #[error("Turn RNG exhausted while rolling for: {0}")]
    RngExhausted(String),
}

/// Why an ability cannot be used right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    NoUsesRemaining,
    OnCooldown(u8),
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::NoUsesRemaining => write!(f, "no uses remaining"),
            UnavailableReason::OnCooldown(rounds) => write!(f, "cooling down for {} more round(s)", rounds),
        }
    }
}

/// Errors related to a combatant's chosen action
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Ability index is out of bounds
    #[error("Invalid ability index: {0}")]
    InvalidAbilityIndex(usize),
    /// The ability exists but its uses or cooldown forbid it this round
    #[error("{ability} cannot be used: {reason}")]
    AbilityUnavailable {
        ability: String,
        reason: UnavailableReason,
    },
    /// The target/effect combination has no resolution rule yet
    #[error("{ability} is not supported yet ({effect:?} on {target})")]
    UnsupportedEffect {
        ability: String,
        target: TargetKind,
        effect: AbilityEffect,
    },
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using RosterError
pub type RosterResult<T> = Result<T, RosterError>;
