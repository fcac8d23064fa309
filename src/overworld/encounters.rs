//! Wild encounter tables
//!
//! Which creatures appear on which map for each way of meeting them.

use std::fs;
use std::path::Path;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::pokemon::Pokemon;

/// How a wild creature was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncounterMethod {
    Grass,
    Surf,
    OldRod,
    GoodRod,
    SuperRod,
    Headbutt,
    RockSmash,
}

/// One possible encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterEntry {
    /// Level file this entry belongs to (case-insensitive)
    pub map: String,
    pub method: EncounterMethod,
    pub species: u16,
    pub species_name: String,
    pub min_level: u8,
    pub max_level: u8,
    /// Relative weight among entries for the same map and method
    pub chance: u32,
}

/// All encounter entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncounterTable {
    pub entries: Vec<EncounterEntry>,
}

impl EncounterTable {
    pub fn new(entries: Vec<EncounterEntry>) -> Self {
        Self { entries }
    }

    /// Load from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|source| ConfigError::Ron {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from a RON file, or an empty table
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Encounter table {} not found, no wild encounters", path.display());
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{}. No wild encounters.", e);
            Self::default()
        })
    }

    /// Entries for one map and method
    pub fn entries_for<'a>(&'a self, map: &'a str, method: EncounterMethod) -> impl Iterator<Item = &'a EncounterEntry> {
        self.entries
            .iter()
            .filter(move |e| e.method == method && e.map.eq_ignore_ascii_case(map))
    }

    /// Pick a wild creature, or `None` if the map has no entries for `method`
    pub fn roll(&self, map: &str, method: EncounterMethod, rng: &mut impl Rng) -> Option<Pokemon> {
        let candidates: Vec<&EncounterEntry> = self.entries_for(map, method).collect();
        let weights = WeightedIndex::new(candidates.iter().map(|e| e.chance)).ok()?;
        let entry = candidates[weights.sample(rng)];

        let (low, high) = if entry.min_level <= entry.max_level {
            (entry.min_level, entry.max_level)
        } else {
            (entry.max_level, entry.min_level)
        };
        let level = rng.gen_range(low..=high);
        Some(Pokemon::new(entry.species, entry.species_name.clone(), level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry(map: &str, method: EncounterMethod, species: u16, chance: u32) -> EncounterEntry {
        EncounterEntry {
            map: map.to_string(),
            method,
            species,
            species_name: format!("#{}", species),
            min_level: 10,
            max_level: 14,
            chance,
        }
    }

    #[test]
    fn test_roll_respects_map_and_method() {
        let table = EncounterTable::new(vec![
            entry("route45.dat", EncounterMethod::RockSmash, 74, 1),
            entry("route45.dat", EncounterMethod::Grass, 16, 1),
            entry("route46.dat", EncounterMethod::RockSmash, 213, 1),
        ]);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            let wild = table.roll("Route45.DAT", EncounterMethod::RockSmash, &mut rng).unwrap();
            assert_eq!(wild.species, 74);
            assert!((10..=14).contains(&wild.level));
        }
        assert!(table.roll("route45.dat", EncounterMethod::Surf, &mut rng).is_none());
        assert!(table.roll("unknown.dat", EncounterMethod::RockSmash, &mut rng).is_none());
    }

    #[test]
    fn test_zero_weights_give_nothing() {
        let table = EncounterTable::new(vec![entry("a.dat", EncounterMethod::RockSmash, 74, 0)]);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(table.roll("a.dat", EncounterMethod::RockSmash, &mut rng).is_none());
    }

    #[test]
    fn test_parse_ron() {
        let ron_text = r#"(entries: [
            (map: "route45.dat", method: RockSmash, species: 74, species_name: "Geodude",
             min_level: 20, max_level: 22, chance: 90),
        ])"#;
        let table: EncounterTable = ron::from_str(ron_text).unwrap();
        assert_eq!(table.entries.len(), 1);
        assert_eq!(table.entries[0].species_name, "Geodude");
    }
}
