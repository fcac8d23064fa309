//! Overworld components
//!
//! Tile entities in a level's `hecs::World`.

use serde::{Deserialize, Serialize};

/// Tile coordinate in a level. `y` is height; waterfalls stack along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl TilePos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The tile directly above
    pub fn above(&self) -> Self {
        Self { y: self.y + 1, ..*self }
    }

    /// The tile directly below
    pub fn below(&self) -> Self {
        Self { y: self.y - 1, ..*self }
    }
}

/// What behaviour a tile entity has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    SmashRock,
    Waterfall,
    /// Scenery without behaviour
    Prop,
}

/// Level-unique id, used to remember removed entities across saves
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether the tile blocks movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision(pub bool);

/// Per-entity setting from the level file (1 disables a waterfall)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionValue(pub i32);

/// The entity may be despawned at the end of the frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removable(pub bool);
