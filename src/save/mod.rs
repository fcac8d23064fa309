//! Save/load system
//!
//! Snapshots of the game state written to `Save<N>.<ext>` files, listed,
//! and restored into a `GameContext`.

pub mod atomic_write;
pub mod codec;
pub mod error;
pub mod manager;
pub mod snapshot;
pub mod store;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::SaveError;
pub use manager::{LoadOutcome, SaveManager};
pub use snapshot::{now_millis, SnapshotRecord};
pub use store::SnapshotStore;
pub use worker::{SaveWorker, WorkerEvent};
