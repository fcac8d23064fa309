//! Trainer profile: identity, pokedex, badges and play time

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::time::PlayTime;

/// Field moves gated behind gym badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HmMove {
    Cut,
    Flash,
    Surf,
    Strength,
    RockSmash,
    Whirlpool,
    Waterfall,
    RockClimb,
}

impl HmMove {
    /// Move name as it appears in a creature's move list
    pub fn move_name(self) -> &'static str {
        match self {
            HmMove::Cut => "Cut",
            HmMove::Flash => "Flash",
            HmMove::Surf => "Surf",
            HmMove::Strength => "Strength",
            HmMove::RockSmash => "Rock Smash",
            HmMove::Whirlpool => "Whirlpool",
            HmMove::Waterfall => "Waterfall",
            HmMove::RockClimb => "Rock Climb",
        }
    }
}

/// Species the player has seen and caught
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokedex {
    seen: BTreeSet<u16>,
    caught: BTreeSet<u16>,
}

impl Pokedex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_seen(&mut self, species: u16) {
        self.seen.insert(species);
    }

    /// Catching a species also marks it seen
    pub fn mark_caught(&mut self, species: u16) {
        self.seen.insert(species);
        self.caught.insert(species);
    }

    pub fn has_seen(&self, species: u16) -> bool {
        self.seen.contains(&species)
    }

    pub fn has_caught(&self, species: u16) -> bool {
        self.caught.contains(&species)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn caught_count(&self) -> usize {
        self.caught.len()
    }
}

/// Gym badges obtained, by badge id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badges(BTreeSet<u8>);

impl Badges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn award(&mut self, badge: u8) -> bool {
        self.0.insert(badge)
    }

    pub fn has(&self, badge: u8) -> bool {
        self.0.contains(&badge)
    }

    pub fn count(&self) -> usize {
        self.0.len()
    }
}

/// The player's trainer card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerProfile {
    pub name: String,
    pub trainer_id: u16,
    pub secret_id: u16,
    pub is_male: bool,
    pub pokedex: Pokedex,
    pub badges: Badges,
    pub playtime: PlayTime,
}

impl TrainerProfile {
    pub fn new(name: impl Into<String>, trainer_id: u16, secret_id: u16, is_male: bool) -> Self {
        Self {
            name: name.into(),
            trainer_id,
            secret_id,
            is_male,
            pokedex: Pokedex::new(),
            badges: Badges::new(),
            playtime: PlayTime::default(),
        }
    }
}

impl Default for TrainerProfile {
    fn default() -> Self {
        Self::new("Gold", 0, 0, true)
    }
}
