use crate::{AbilityData, AbilityEffect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

fn default_level() -> u8 {
    1
}

/// A species template: everything needed to build a fresh combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesData {
    /// National dex number. Only used to locate the sprite.
    pub pokedex_number: u16,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u8,
    pub max_hp: u16,
    pub abilities: Vec<AbilityData>,
}

/// The full list of species available to an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCatalog {
    pub species: Vec<SpeciesData>,
}

/// A reason a catalog was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    Empty,
    DuplicateSpecies(String),
    BlankName { species_index: usize },
    NoHealth(String),
    NoAbilities(String),
    InvertedDamageRange { species: String, ability: String },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::Empty => write!(f, "catalog contains no species"),
            CatalogIssue::DuplicateSpecies(name) => write!(f, "species '{}' is defined twice", name),
            CatalogIssue::BlankName { species_index } => {
                write!(f, "species #{} (or one of its abilities) has a blank name", species_index)
            }
            CatalogIssue::NoHealth(name) => write!(f, "species '{}' has zero max HP", name),
            CatalogIssue::NoAbilities(name) => write!(f, "species '{}' has no abilities", name),
            CatalogIssue::InvertedDamageRange { species, ability } => write!(
                f,
                "ability '{}' of '{}' has a damage range whose max is below its min",
                ability, species
            ),
        }
    }
}

impl std::error::Error for CatalogIssue {}

impl SpeciesCatalog {
    /// Checks the invariants every combatant built from this catalog relies on.
    pub fn validate(&self) -> Result<(), CatalogIssue> {
        if self.species.is_empty() {
            return Err(CatalogIssue::Empty);
        }

        let mut seen = HashSet::new();
        for (species_index, species) in self.species.iter().enumerate() {
            if species.name.trim().is_empty() {
                return Err(CatalogIssue::BlankName { species_index });
            }
            if !seen.insert(species.name.to_lowercase()) {
                return Err(CatalogIssue::DuplicateSpecies(species.name.clone()));
            }
            if species.max_hp == 0 {
                return Err(CatalogIssue::NoHealth(species.name.clone()));
            }
            if species.abilities.is_empty() {
                return Err(CatalogIssue::NoAbilities(species.name.clone()));
            }
            for ability in &species.abilities {
                if ability.name.trim().is_empty() {
                    return Err(CatalogIssue::BlankName { species_index });
                }
                if let AbilityEffect::DamageRange { min, max } = ability.effect {
                    if max < min {
                        return Err(CatalogIssue::InvertedDamageRange {
                            species: species.name.clone(),
                            ability: ability.name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Case-insensitive lookup by species name.
    pub fn find(&self, name: &str) -> Option<&SpeciesData> {
        self.species
            .iter()
            .find(|species| species.name.eq_ignore_ascii_case(name))
    }

    /// Compact binary encoding embedded into the library at build time.
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}
