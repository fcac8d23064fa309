//! Shared fixtures for save tests

use std::path::PathBuf;

use tempfile::TempDir;

use crate::game::{Direction, EventPayload, EventRecord, GameContext, PlayTime, TrainerProfile, Transform, Vec3};
use crate::pokemon::Pokemon;

use super::snapshot::SnapshotRecord;

/// Temporary root plus a `Saves` path inside it that is not created yet.
/// Both go away when the `TempDir` drops, so keep it bound for the whole test.
pub fn save_dir() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("tempdir");
    let dir = temp.path().join("Saves");
    (temp, dir)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A mid-game context with party, storage, bag and events filled in
pub fn sample_context() -> GameContext {
    let mut trainer = TrainerProfile::new("Ethan", 31_337, 4_242, true);
    trainer.pokedex.mark_caught(155);
    trainer.pokedex.mark_seen(16);
    trainer.badges.award(1);
    trainer.badges.award(8);
    trainer.playtime = PlayTime::from_secs(5 * 3600 + 12 * 60);

    let mut ctx = GameContext::with_seed(trainer, 12, 99);
    ctx.party
        .add(Pokemon::new(157, "Typhlosion", 36).with_nickname("Blaze").with_move("Rock Smash", 15))
        .unwrap();
    ctx.party
        .add(Pokemon::new(130, "Gyarados", 33).with_move("Waterfall", 15).with_move("Surf", 15))
        .unwrap();
    ctx.party.add(Pokemon::egg(175, "Togepi")).unwrap();

    ctx.storage.set(0, 3, Some(Pokemon::new(19, "Rattata", 4)));
    ctx.storage.set(5, 29, Some(Pokemon::new(41, "Zubat", 9)));

    ctx.bag.add(4, 12);
    ctx.bag.add(17, 3);
    ctx.bag.add(190, 1);

    ctx.player = Transform::new(Vec3::new(12.0, 0.0, -7.25), Direction::Left);
    ctx.follower = Transform::new(Vec3::new(13.0, 0.0, -7.25), Direction::Left);

    ctx.register_event(EventRecord::new(12, 300, EventPayload::EntityRemoved { entity_id: "rock_3".into() }));
    ctx.register_event(EventRecord::new(4, 120, EventPayload::ItemCollected { item_id: 17 }));
    ctx.register_event(EventRecord::new(12, 60, EventPayload::FlagSet { key: "met_rival".into(), value: true }));
    ctx
}

pub fn sample_record(ctx: &GameContext, build_version: &str) -> SnapshotRecord {
    SnapshotRecord::capture(ctx, "test save", build_version)
}
