//! The trainer's party
//!
//! Six fixed slots; empty slots are kept in place so slot indices stay stable
//! across saves.

use serde::{Deserialize, Serialize};

use super::creature::Pokemon;

/// Number of party slots
pub const PARTY_SIZE: usize = 6;

/// Up to six creatures travelling with the player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    slots: [Option<Pokemon>; PARTY_SIZE],
}

impl Party {
    /// Create an empty party
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a creature in the first free slot
    /// Returns the creature back if the party is full
    pub fn add(&mut self, pokemon: Pokemon) -> Result<usize, Pokemon> {
        match self.slots.iter().position(Option::is_none) {
            Some(slot) => {
                self.slots[slot] = Some(pokemon);
                Ok(slot)
            }
            None => Err(pokemon),
        }
    }

    /// Replace a slot, returning what was there
    /// Out-of-range slots leave the party untouched and hand the value back
    pub fn set(&mut self, slot: usize, pokemon: Option<Pokemon>) -> Option<Pokemon> {
        match self.slots.get_mut(slot) {
            Some(entry) => std::mem::replace(entry, pokemon),
            None => pokemon,
        }
    }

    /// Take a creature out of a slot
    pub fn remove(&mut self, slot: usize) -> Option<Pokemon> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Get the creature in a slot
    pub fn get(&self, slot: usize) -> Option<&Pokemon> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// All slots, including empty ones
    pub fn slots(&self) -> &[Option<Pokemon>; PARTY_SIZE] {
        &self.slots
    }

    /// Occupied slots in order
    pub fn iter(&self) -> impl Iterator<Item = &Pokemon> {
        self.slots.iter().flatten()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// First hatched creature that knows the named field move
    pub fn first_with_field_move(&self, move_name: &str) -> Option<&Pokemon> {
        self.iter().find(|p| p.can_use_field_move(move_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mon(species: u16) -> Pokemon {
        Pokemon::new(species, format!("Species{}", species), 10)
    }

    #[test]
    fn test_add_until_full() {
        let mut party = Party::new();
        for i in 0..PARTY_SIZE {
            assert_eq!(party.add(mon(i as u16 + 1)), Ok(i));
        }
        assert!(party.is_full());
        let extra = party.add(mon(99));
        assert!(extra.is_err());
        assert_eq!(party.len(), PARTY_SIZE);
    }

    #[test]
    fn test_remove_leaves_gap() {
        let mut party = Party::new();
        party.add(mon(1)).unwrap();
        party.add(mon(2)).unwrap();
        party.add(mon(3)).unwrap();

        let removed = party.remove(1);
        assert_eq!(removed.map(|p| p.species), Some(2));
        assert!(party.get(1).is_none());
        assert_eq!(party.get(2).map(|p| p.species), Some(3));

        // The gap is refilled first
        assert_eq!(party.add(mon(4)), Ok(1));
    }

    #[test]
    fn test_set_out_of_range_returns_value() {
        let mut party = Party::new();
        let back = party.set(PARTY_SIZE, Some(mon(5)));
        assert_eq!(back.map(|p| p.species), Some(5));
        assert!(party.is_empty());
    }

    #[test]
    fn test_first_with_field_move_skips_eggs() {
        let mut party = Party::new();
        let mut egg = Pokemon::egg(130, "Gyarados");
        egg.moves.push(crate::pokemon::Move::new("Waterfall", 15));
        party.add(egg).unwrap();
        party.add(mon(7)).unwrap();
        party.add(Pokemon::new(130, "Gyarados", 30).with_move("Waterfall", 15)).unwrap();

        let user = party.first_with_field_move("waterfall");
        assert_eq!(user.map(|p| p.level), Some(30));
    }
}
