use crate::combatant::Combatant;
use crate::errors::{RosterError, RosterResult};
use schema::{SpeciesCatalog, SpeciesData};
use std::path::Path;
use std::sync::LazyLock;

// Include the compiled species data and name index generated by build.rs
include!(concat!(env!("OUT_DIR"), "/generated_data.rs"));

pub const DEFAULT_PLAYER: &str = "Pikachu";
pub const DEFAULT_OPPONENT: &str = "Charmander";

static BUILTIN_CATALOG: LazyLock<RosterResult<SpeciesCatalog>> = LazyLock::new(|| {
    SpeciesCatalog::from_bytes(SPECIES_BYTES).map_err(|e| RosterError::Parse(e.to_string()))
});

/// Species definitions plus a factory for fresh combatants.
///
/// Every call to `create_combatant` returns a new instance at full health, so two
/// encounters never share a combatant.
#[derive(Debug, Clone)]
pub struct Roster {
    catalog: SpeciesCatalog,
    builtin: bool,
}

impl Roster {
    /// The species compiled into the binary.
    pub fn builtin() -> RosterResult<Self> {
        let catalog = BUILTIN_CATALOG.as_ref().map_err(Clone::clone)?.clone();
        Ok(Roster {
            catalog,
            builtin: true,
        })
    }

    pub fn from_catalog(catalog: SpeciesCatalog) -> RosterResult<Self> {
        catalog.validate().map_err(RosterError::Invalid)?;
        Ok(Roster {
            catalog,
            builtin: false,
        })
    }

    pub fn from_ron_str(source: &str) -> RosterResult<Self> {
        let catalog: SpeciesCatalog =
            ron::from_str(source).map_err(|e| RosterError::Parse(e.to_string()))?;
        Self::from_catalog(catalog)
    }

    /// Load a roster override from a RON file on disk.
    pub fn load(path: impl AsRef<Path>) -> RosterResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| RosterError::Io {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        let roster = Self::from_ron_str(&source)?;
        tracing::info!(
            path = %path.display(),
            species = roster.catalog.species.len(),
            "loaded roster override"
        );
        Ok(roster)
    }

    pub fn all_species(&self) -> &[SpeciesData] {
        &self.catalog.species
    }

    /// Case-insensitive lookup.
    pub fn species(&self, name: &str) -> RosterResult<&SpeciesData> {
        let found = if self.builtin {
            SPECIES_INDEX
                .get(name.to_lowercase().as_str())
                .and_then(|&index| self.catalog.species.get(index))
        } else {
            self.catalog.find(name)
        };
        found.ok_or_else(|| RosterError::SpeciesNotFound(name.to_string()))
    }

    pub fn create_combatant(&self, name: &str) -> RosterResult<Combatant> {
        Ok(Combatant::from_species(self.species(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::{AbilityEffect, CatalogIssue};

    #[test]
    fn test_builtin_roster_has_the_classic_pair() {
        let roster = Roster::builtin().unwrap();

        let pikachu = roster.create_combatant(DEFAULT_PLAYER).unwrap();
        assert_eq!(pikachu.max_hp(), 80);
        assert_eq!(pikachu.pokedex_number, 25);
        assert_eq!(pikachu.abilities().len(), 2);
        assert_eq!(
            pikachu.ability(0).unwrap().effect(),
            AbilityEffect::DamageRange { min: 1, max: 5 }
        );
        assert_eq!(pikachu.ability(1).unwrap().max_cooldown(), Some(3));

        let charmander = roster.create_combatant(DEFAULT_OPPONENT).unwrap();
        assert_eq!(charmander.max_hp(), 80);
        assert_eq!(charmander.abilities().len(), 1);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let roster = Roster::builtin().unwrap();
        assert_eq!(roster.species("pIkAcHu").unwrap().name, "Pikachu");
    }

    #[test]
    fn test_unknown_species() {
        let roster = Roster::builtin().unwrap();
        assert_eq!(
            roster.create_combatant("Mewtwo").unwrap_err(),
            RosterError::SpeciesNotFound("Mewtwo".to_string())
        );
    }

    #[test]
    fn test_factory_returns_independent_instances() {
        let roster = Roster::builtin().unwrap();
        let mut first = roster.create_combatant("Pikachu").unwrap();
        first.receive_damage(50);

        let second = roster.create_combatant("Pikachu").unwrap();

        assert_eq!(second.current_hp(), 80);
    }

    #[test]
    fn test_ron_override() {
        let source = r#"(
            species: [
                (
                    pokedex_number: 133,
                    name: "Eevee",
                    max_hp: 60,
                    abilities: [
                        (name: "Tackle", uses: Unlimited, target: Enemy, effect: Damage(3)),
                    ],
                ),
            ],
        )"#;

        let roster = Roster::from_ron_str(source).unwrap();

        assert_eq!(roster.all_species().len(), 1);
        assert_eq!(roster.all_species()[0].name, "Eevee");
        let eevee = roster.create_combatant("eevee").unwrap();
        assert_eq!(eevee.level, 1);
        assert_eq!(eevee.ability(0).unwrap().max_cooldown(), None);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let source = r#"(species: [(pokedex_number: 1, name: "Empty", max_hp: 10, abilities: [])])"#;
        assert_eq!(
            Roster::from_ron_str(source).unwrap_err(),
            RosterError::Invalid(CatalogIssue::NoAbilities("Empty".to_string()))
        );
    }

    #[test]
    fn test_malformed_override() {
        assert!(matches!(
            Roster::from_ron_str("not ron at all ("),
            Err(RosterError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Roster::load("/definitely/not/here.ron"),
            Err(RosterError::Io { .. })
        ));
    }
}
