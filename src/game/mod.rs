//! Game module - live game state shared by the save system and the overworld

mod state;
mod time;
pub mod events;
pub mod statistics;
pub mod trainer;
pub mod transform;

pub use state::GameContext;
pub use time::PlayTime;
pub use events::{EventPayload, EventRecord, EventSchedule};
pub use statistics::Statistics;
pub use trainer::{Badges, HmMove, Pokedex, TrainerProfile};
pub use transform::{Direction, Transform, Vec3};
