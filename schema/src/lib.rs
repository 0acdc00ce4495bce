// Pokemon Duel Schema - Shared type definitions
// This crate holds the data definitions shared between the main
// pokemon-duel crate and its build script, which compiles the RON species
// roster into postcard bytes embedded in the library.

pub use ability_data::*;
pub use species_data::*;

pub mod ability_data;
pub mod species_data;
