//! Overworld data tables
//!
//! Loaded once at startup from the paths in `GameConfig`.

use std::collections::BTreeMap;

use crate::config::GameConfig;
use crate::game::{GameContext, HmMove};

use super::encounters::EncounterTable;
use super::item_table::SmashRockItems;

/// Tables entity behaviours read from
#[derive(Debug, Clone)]
pub struct OverworldData {
    hm_badges: BTreeMap<HmMove, u8>,
    pub encounters: EncounterTable,
    pub smash_items: SmashRockItems,
}

impl OverworldData {
    pub fn new(hm_badges: BTreeMap<HmMove, u8>, encounters: EncounterTable, smash_items: SmashRockItems) -> Self {
        Self { hm_badges, encounters, smash_items }
    }

    /// Load every table named in the config, falling back to empty tables
    pub fn from_config(config: &GameConfig) -> Self {
        let encounters = EncounterTable::load_or_default(&config.encounters);
        let smash_items = SmashRockItems::load_or_default(&config.smash_rock_items);
        log::info!(
            "Loaded {} encounter entries and {} smash-rock items",
            encounters.entries.len(),
            smash_items.entries().len()
        );
        Self::new(config.hm_badges.clone(), encounters, smash_items)
    }

    /// Whether the trainer holds the badge a field move needs
    pub fn can_use_hm(&self, ctx: &GameContext, hm: HmMove) -> bool {
        match self.hm_badges.get(&hm) {
            Some(badge) => ctx.trainer.badges.has(*badge),
            None => true,
        }
    }
}

impl Default for OverworldData {
    fn default() -> Self {
        Self::new(GameConfig::default().hm_badges, EncounterTable::default(), SmashRockItems::default())
    }
}
