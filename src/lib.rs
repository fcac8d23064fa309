//! Pokeunity - overworld state and save system
//!
//! Game state, save/load of snapshots, and the action scripts overworld
//! entities hand to the script interpreter.

pub mod config;
pub mod game;
pub mod items;
pub mod overworld;
pub mod pokemon;
pub mod save;
pub mod script;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use game::GameContext;
pub use save::{LoadOutcome, SaveError, SaveManager};
pub use script::{ActionScript, ScriptHost};
