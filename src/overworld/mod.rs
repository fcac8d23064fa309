//! Overworld entities
//!
//! Interaction logic for level entities. Nothing here draws or animates;
//! behaviours emit action scripts, update statistics and schedule events.

pub mod components;
pub mod data;
pub mod encounters;
pub mod item_table;
pub mod level;
pub mod smash_rock;
pub mod waterfall;

pub use components::{ActionValue, Collision, EntityId, EntityKind, Removable, TilePos};
pub use data::OverworldData;
pub use encounters::{EncounterEntry, EncounterMethod, EncounterTable};
pub use item_table::{SmashRockItem, SmashRockItems, DEFAULT_SMASH_ITEM};
pub use level::Level;
pub use smash_rock::SmashOutcome;

use crate::game::{GameContext, HmMove};
use crate::script::ScriptHost;

/// Everything an entity behaviour touches
pub struct Interaction<'a> {
    pub ctx: &'a mut GameContext,
    pub level: &'a mut Level,
    pub host: &'a mut dyn ScriptHost,
    pub data: &'a OverworldData,
}

impl<'a> Interaction<'a> {
    pub fn new(
        ctx: &'a mut GameContext,
        level: &'a mut Level,
        host: &'a mut dyn ScriptHost,
        data: &'a OverworldData,
    ) -> Self {
        Self { ctx, level, host, data }
    }

    /// Debug and sandbox mode let every field move through
    fn unrestricted(&self) -> bool {
        self.ctx.debug_active || self.ctx.sandbox_mode
    }

    /// Display name and species of the first party member able to use `hm`
    fn field_move_user(&self, hm: HmMove) -> Option<(String, u16)> {
        self.ctx
            .party
            .first_with_field_move(hm.move_name())
            .map(|p| (p.display_name().to_string(), p.species))
    }
}
