//! Smash-rock item table
//!
//! Plain text, one line per map: `mapfile|{id,chance}|{id,chance}...`

use std::fs;
use std::path::Path;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::config::ConfigError;

/// Item given when the map has no entries
pub const DEFAULT_SMASH_ITEM: u32 = 190;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmashRockItem {
    pub map_file: String,
    pub item_id: u32,
    pub chance: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmashRockItems {
    entries: Vec<SmashRockItem>,
}

impl SmashRockItems {
    pub fn new(entries: Vec<SmashRockItem>) -> Self {
        Self { entries }
    }

    /// Parse the table text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut entries = Vec::new();
        for (n, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split('|');
            let map_file = fields.next().unwrap_or_default().trim();
            for field in fields {
                let (item_id, chance) = parse_pair(field).ok_or_else(|| ConfigError::Parse {
                    line: n + 1,
                    reason: format!("expected {{id,chance}}, found \"{}\"", field),
                })?;
                entries.push(SmashRockItem {
                    map_file: map_file.to_string(),
                    item_id,
                    chance,
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load the table, or an empty one (every rock then gives the default item)
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Smash-rock item table {} not found", path.display());
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Failed to load {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn entries(&self) -> &[SmashRockItem] {
        &self.entries
    }

    /// Weighted pick among the map's entries
    pub fn pick(&self, map_file: &str, rng: &mut impl Rng) -> u32 {
        let matching: Vec<&SmashRockItem> = self
            .entries
            .iter()
            .filter(|e| e.map_file.eq_ignore_ascii_case(map_file))
            .collect();
        let Some(first) = matching.first() else {
            return DEFAULT_SMASH_ITEM;
        };

        match WeightedIndex::new(matching.iter().map(|e| e.chance)) {
            Ok(weights) => matching[weights.sample(rng)].item_id,
            // All chances zero
            Err(_) => first.item_id,
        }
    }
}

fn parse_pair(field: &str) -> Option<(u32, u32)> {
    let inner = field.trim().strip_prefix('{')?.strip_suffix('}')?;
    let (id, chance) = inner.split_once(',')?;
    Some((id.trim().parse().ok()?, chance.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TABLE: &str = "route45.dat|{213,0}|{92,100}\n\nmtmortar.dat|{80,1}\n";

    #[test]
    fn test_parse_lines() {
        let items = SmashRockItems::parse(TABLE).unwrap();
        assert_eq!(items.entries().len(), 3);
        assert_eq!(items.entries()[2], SmashRockItem { map_file: "mtmortar.dat".into(), item_id: 80, chance: 1 });
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = SmashRockItems::parse("a.dat|{1,2}\nb.dat|{oops}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 2, .. }), "got {:?}", err);
    }

    #[test]
    fn test_pick_weighted_and_case_insensitive() {
        let items = SmashRockItems::parse(TABLE).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            assert_eq!(items.pick("ROUTE45.dat", &mut rng), 92);
        }
        assert_eq!(items.pick("mtmortar.dat", &mut rng), 80);
    }

    #[test]
    fn test_pick_unknown_map_gives_default() {
        let items = SmashRockItems::parse(TABLE).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(items.pick("elsewhere.dat", &mut rng), DEFAULT_SMASH_ITEM);
        assert_eq!(SmashRockItems::default().pick("route45.dat", &mut rng), DEFAULT_SMASH_ITEM);
    }
}
