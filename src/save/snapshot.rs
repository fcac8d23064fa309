//! Snapshot records
//!
//! A `SnapshotRecord` is a pure transfer object: captured from live state at
//! save time, written once, and on load copied field by field back into the
//! `GameContext`.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::game::{Badges, Direction, EventRecord, GameContext, PlayTime, Pokedex, Transform, Vec3};
use crate::items::Bag;
use crate::pokemon::{Party, StorageBoxes};

/// Complete persisted game state
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRecord {
    /// Build that wrote the snapshot
    pub build_version: String,
    /// Unix epoch milliseconds, only used for ordering
    pub time_created: u64,
    /// Name given when saving
    pub save_name: String,
    /// Scene the player was in
    pub scene_index: u32,
    pub trainer_name: String,
    pub trainer_id: u16,
    pub secret_id: u16,
    pub is_male: bool,
    pub pokedex: Pokedex,
    pub badges: Badges,
    pub playtime: PlayTime,
    pub player_position: Vec3,
    pub player_facing: Direction,
    pub follower_position: Vec3,
    pub follower_facing: Direction,
    pub party: Party,
    pub storage: StorageBoxes,
    pub bag: Bag,
    /// Sorted ascending by trigger time
    pub scheduled_events: Vec<EventRecord>,
}

impl SnapshotRecord {
    /// Gather the current game state
    pub fn capture(ctx: &GameContext, save_name: &str, build_version: &str) -> Self {
        Self {
            build_version: build_version.to_string(),
            time_created: now_millis(),
            save_name: save_name.to_string(),
            scene_index: ctx.active_scene(),
            trainer_name: ctx.trainer.name.clone(),
            trainer_id: ctx.trainer.trainer_id,
            secret_id: ctx.trainer.secret_id,
            is_male: ctx.trainer.is_male,
            pokedex: ctx.trainer.pokedex.clone(),
            badges: ctx.trainer.badges.clone(),
            playtime: ctx.trainer.playtime,
            player_position: ctx.player.position,
            player_facing: ctx.player.facing,
            follower_position: ctx.follower.position,
            follower_facing: ctx.follower.facing,
            party: ctx.party.clone(),
            storage: ctx.storage.clone(),
            bag: ctx.bag.clone(),
            scheduled_events: ctx.events.to_vec(),
        }
    }

    /// Copy every field into live state
    pub fn apply_to(self, ctx: &mut GameContext) {
        ctx.trainer.name = self.trainer_name;
        ctx.trainer.trainer_id = self.trainer_id;
        ctx.trainer.secret_id = self.secret_id;
        ctx.trainer.is_male = self.is_male;
        ctx.trainer.pokedex = self.pokedex;
        ctx.trainer.badges = self.badges;
        ctx.trainer.playtime = self.playtime;

        ctx.party = self.party;
        ctx.storage = self.storage;
        ctx.bag = self.bag;

        ctx.player = Transform::new(self.player_position, self.player_facing);
        ctx.follower = Transform::new(self.follower_position, self.follower_facing);

        ctx.events.replace(self.scheduled_events);
    }
}

/// Milliseconds since the Unix epoch (0 if the clock is before it)
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::test_support::sample_context;

    #[test]
    fn test_capture_then_apply_restores_state() {
        let source = sample_context();
        let record = SnapshotRecord::capture(&source, "route 27", "0.0.1");
        assert_eq!(record.save_name, "route 27");
        assert_eq!(record.scene_index, source.active_scene());
        assert!(record.time_created > 0);

        let mut target = GameContext::default();
        record.apply_to(&mut target);

        assert_eq!(target.trainer, source.trainer);
        assert_eq!(target.party, source.party);
        assert_eq!(target.storage, source.storage);
        assert_eq!(target.bag, source.bag);
        assert_eq!(target.player, source.player);
        assert_eq!(target.follower, source.follower);
        assert_eq!(target.events, source.events);
    }
}
