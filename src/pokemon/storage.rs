//! PC storage boxes
//!
//! A fixed `BOX_COUNT` x `BOX_CAPACITY` grid of optional creatures. The
//! dimensions are part of the save schema and are validated when decoding.

use serde::{Deserialize, Serialize};

use super::creature::Pokemon;

/// Number of storage boxes
pub const BOX_COUNT: usize = 18;
/// Slots per box
pub const BOX_CAPACITY: usize = 30;

/// The PC storage grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<Pokemon>>>", into = "Vec<Vec<Option<Pokemon>>>")]
pub struct StorageBoxes {
    boxes: Vec<Vec<Option<Pokemon>>>,
}

impl StorageBoxes {
    /// Create an empty grid
    pub fn new() -> Self {
        Self { boxes: vec![vec![None; BOX_CAPACITY]; BOX_COUNT] }
    }

    /// Get the creature at a box/slot
    pub fn get(&self, box_index: usize, slot: usize) -> Option<&Pokemon> {
        self.boxes.get(box_index)?.get(slot)?.as_ref()
    }

    /// Replace a box/slot, returning what was there
    /// Out-of-range positions hand the value back untouched
    pub fn set(&mut self, box_index: usize, slot: usize, pokemon: Option<Pokemon>) -> Option<Pokemon> {
        match self.boxes.get_mut(box_index).and_then(|b| b.get_mut(slot)) {
            Some(entry) => std::mem::replace(entry, pokemon),
            None => pokemon,
        }
    }

    /// Store a creature in the first free slot, scanning box by box
    /// Returns the creature back if every box is full
    pub fn deposit(&mut self, pokemon: Pokemon) -> Result<(usize, usize), Pokemon> {
        for (box_index, slots) in self.boxes.iter_mut().enumerate() {
            if let Some(slot) = slots.iter().position(Option::is_none) {
                slots[slot] = Some(pokemon);
                return Ok((box_index, slot));
            }
        }
        Err(pokemon)
    }

    /// Take a creature out of storage
    pub fn withdraw(&mut self, box_index: usize, slot: usize) -> Option<Pokemon> {
        self.boxes.get_mut(box_index)?.get_mut(slot)?.take()
    }

    /// One box's slots
    pub fn box_slots(&self, box_index: usize) -> Option<&[Option<Pokemon>]> {
        self.boxes.get(box_index).map(Vec::as_slice)
    }

    /// Number of stored creatures
    pub fn count(&self) -> usize {
        self.boxes.iter().flatten().filter(|slot| slot.is_some()).count()
    }
}

impl Default for StorageBoxes {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Vec<Option<Pokemon>>>> for StorageBoxes {
    type Error = String;

    fn try_from(boxes: Vec<Vec<Option<Pokemon>>>) -> Result<Self, Self::Error> {
        if boxes.len() != BOX_COUNT {
            return Err(format!("expected {} storage boxes, found {}", BOX_COUNT, boxes.len()));
        }
        if let Some((i, b)) = boxes.iter().enumerate().find(|(_, b)| b.len() != BOX_CAPACITY) {
            return Err(format!(
                "storage box {} has {} slots, expected {}",
                i, b.len(), BOX_CAPACITY
            ));
        }
        Ok(Self { boxes })
    }
}

impl From<StorageBoxes> for Vec<Vec<Option<Pokemon>>> {
    fn from(storage: StorageBoxes) -> Self {
        storage.boxes
    }
}
