//! Save/load manager
//!
//! Ties the snapshot store to live game state: capture on save, restore on
//! load, enumeration, and the scheduled-event API used by overworld entities.

use std::path::PathBuf;

use crate::config::GameConfig;
use crate::game::{EventRecord, GameContext};

use super::error::SaveError;
use super::snapshot::SnapshotRecord;
use super::store::SnapshotStore;

/// What a successful load did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Everything was copied into live state
    Applied,
    /// The snapshot belongs to another scene. A scene change was requested and
    /// the rest of the restore waits for `SaveManager::resume_pending`.
    SceneChange { scene_index: u32 },
}

/// Saves, loads and lists snapshots for one save directory
#[derive(Debug, Clone)]
pub struct SaveManager {
    store: SnapshotStore,
}

impl SaveManager {
    pub fn new(store: SnapshotStore) -> Self {
        Self { store }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(SnapshotStore::from_config(config))
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Save the current game state under the next free number
    pub fn save(&self, ctx: &GameContext, name: &str) -> Result<PathBuf, SaveError> {
        let record = SnapshotRecord::capture(ctx, name, self.store.build_version());
        self.store.write(&record).map_err(|e| {
            log::error!("Failed to save \"{}\": {}", name, e);
            e
        })
    }

    /// Load `Save<index>` into the game state
    ///
    /// A missing file is reported as `SaveError::NotFound` and leaves `ctx`
    /// untouched.
    pub fn load(&self, ctx: &mut GameContext, index: u32) -> Result<LoadOutcome, SaveError> {
        let record = self.store.read(index).map_err(|e| {
            match &e {
                SaveError::NotFound(path) => log::info!("Couldn't find \"{}\"", path.display()),
                other => log::error!("Failed to load save {}: {}", index, other),
            }
            e
        })?;
        log::info!("Loaded save {} (\"{}\")", index, record.save_name);
        Ok(self.restore(ctx, record))
    }

    /// Apply an already decoded snapshot (used by the background worker)
    pub fn restore(&self, ctx: &mut GameContext, record: SnapshotRecord) -> LoadOutcome {
        if record.build_version != self.store.build_version() {
            log::warn!(
                "Loading snapshot from build {} into build {}",
                record.build_version,
                self.store.build_version()
            );
        }

        // Encountered events are taken over even when the scene has to change first
        ctx.events.replace(record.scheduled_events.clone());

        if record.scene_index != ctx.active_scene() {
            let scene_index = record.scene_index;
            ctx.request_scene(scene_index);
            ctx.park_restore(record);
            return LoadOutcome::SceneChange { scene_index };
        }

        record.apply_to(ctx);
        LoadOutcome::Applied
    }

    /// Finish a load that was waiting for a scene change
    ///
    /// Returns `None` when nothing is pending or the player is still in the
    /// wrong scene (the snapshot stays parked in that case).
    pub fn resume_pending(&self, ctx: &mut GameContext) -> Option<LoadOutcome> {
        let record = ctx.take_pending_restore()?;
        if record.scene_index != ctx.active_scene() {
            ctx.park_restore(record);
            return None;
        }
        log::info!("Resuming load of \"{}\" in scene {}", record.save_name, record.scene_index);
        record.apply_to(ctx);
        Some(LoadOutcome::Applied)
    }

    /// Snapshots of the current build, oldest first, at most `limit` (0 = all)
    pub fn list_snapshots(&self, limit: usize) -> Result<Vec<SnapshotRecord>, SaveError> {
        self.store.list(limit)
    }

    /// Delete `Save<index>`; false if it did not exist
    pub fn delete(&self, index: u32) -> Result<bool, SaveError> {
        self.store.delete(index)
    }

    /// Register a scheduled event
    pub fn register_event(&self, ctx: &mut GameContext, event: EventRecord) {
        ctx.register_event(event);
    }

    /// Scheduled events for one scene
    pub fn relevant_events<'a>(&self, ctx: &'a GameContext, scene_index: u32) -> Vec<&'a EventRecord> {
        ctx.events.relevant(scene_index)
    }

    /// Current build version
    pub fn build_version(&self) -> &str {
        self.store.build_version()
    }
}
