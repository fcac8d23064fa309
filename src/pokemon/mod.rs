//! Creatures: individual records, the party and PC storage

pub mod creature;
pub mod party;
pub mod storage;

pub use creature::{Move, Pokemon, MAX_MOVES};
pub use party::{Party, PARTY_SIZE};
pub use storage::{StorageBoxes, BOX_CAPACITY, BOX_COUNT};
