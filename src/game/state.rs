//! Live game state
//!
//! `GameContext` holds everything the overworld and the save system read and
//! write. It is passed by reference instead of living in process-wide
//! singletons.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::items::Bag;
use crate::pokemon::{Party, StorageBoxes};
use crate::save::SnapshotRecord;

use super::events::{EventRecord, EventSchedule};
use super::statistics::Statistics;
use super::trainer::TrainerProfile;
use super::transform::Transform;

/// The main game state passed into save/load and entity interactions
pub struct GameContext {
    /// Trainer card, pokedex, badges and play time
    pub trainer: TrainerProfile,
    /// Party creatures
    pub party: Party,
    /// PC storage boxes
    pub storage: StorageBoxes,
    /// Bag contents
    pub bag: Bag,
    /// Player placement
    pub player: Transform,
    /// Follower placement
    pub follower: Transform,
    /// Scheduled world events, sorted by trigger time
    pub events: EventSchedule,
    /// Usage counters
    pub statistics: Statistics,
    /// Debug mode lets every field move through
    pub debug_active: bool,
    /// Sandbox mode lets every field move through
    pub sandbox_mode: bool,
    /// Whether a text box is currently open
    pub text_box_showing: bool,
    /// Scene the player is currently in
    active_scene: u32,
    /// Scene change requested from the embedding application
    scene_request: Option<u32>,
    /// Loaded snapshot waiting for its scene to finish loading
    pending_restore: Option<SnapshotRecord>,
    /// Random number generator for encounters and loot
    rng: StdRng,
}

impl GameContext {
    /// Create a fresh game in the given scene
    pub fn new(trainer: TrainerProfile, active_scene: u32) -> Self {
        Self::with_rng(trainer, active_scene, StdRng::from_entropy())
    }

    /// Create a game with a fixed seed (reproducible encounters)
    pub fn with_seed(trainer: TrainerProfile, active_scene: u32, seed: u64) -> Self {
        Self::with_rng(trainer, active_scene, StdRng::seed_from_u64(seed))
    }

    fn with_rng(trainer: TrainerProfile, active_scene: u32, rng: StdRng) -> Self {
        Self {
            trainer,
            party: Party::new(),
            storage: StorageBoxes::new(),
            bag: Bag::new(),
            player: Transform::default(),
            follower: Transform::default(),
            events: EventSchedule::new(),
            statistics: Statistics::new(),
            debug_active: false,
            sandbox_mode: false,
            text_box_showing: false,
            active_scene,
            scene_request: None,
            pending_restore: None,
            rng,
        }
    }

    /// Advance play time by a frame delta
    pub fn update(&mut self, delta: Duration) {
        self.trainer.playtime.update(delta);
    }

    /// Game clock in whole seconds, used for event trigger times
    pub fn clock(&self) -> u64 {
        self.trainer.playtime.as_secs()
    }

    /// Get the random number generator
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Scene the player is in
    pub fn active_scene(&self) -> u32 {
        self.active_scene
    }

    /// Ask the embedding application to switch scenes
    pub fn request_scene(&mut self, scene_index: u32) {
        log::info!("Requesting scene change {} -> {}", self.active_scene, scene_index);
        self.scene_request = Some(scene_index);
    }

    /// Pending scene request, if any
    pub fn scene_request(&self) -> Option<u32> {
        self.scene_request
    }

    /// Called by the embedding application once a scene has loaded
    pub fn finish_scene_transition(&mut self, scene_index: u32) {
        self.active_scene = scene_index;
        if self.scene_request == Some(scene_index) {
            self.scene_request = None;
        }
    }

    /// Register a scheduled event
    pub fn register_event(&mut self, event: EventRecord) {
        self.events.register(event);
    }

    pub(crate) fn park_restore(&mut self, record: SnapshotRecord) {
        self.pending_restore = Some(record);
    }

    pub(crate) fn take_pending_restore(&mut self) -> Option<SnapshotRecord> {
        self.pending_restore.take()
    }

    /// Whether a loaded snapshot is waiting for a scene change
    pub fn has_pending_restore(&self) -> bool {
        self.pending_restore.is_some()
    }
}

impl Default for GameContext {
    fn default() -> Self {
        Self::new(TrainerProfile::default(), 0)
    }
}
