//! Creature records

use serde::{Deserialize, Serialize};

/// Most moves a creature can know at once
pub const MAX_MOVES: usize = 4;

/// A learned move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    pub pp: u8,
    pub max_pp: u8,
}

impl Move {
    pub fn new(name: impl Into<String>, max_pp: u8) -> Self {
        Self { name: name.into(), pp: max_pp, max_pp }
    }

    /// Case-insensitive name match
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A single creature, in the party or in storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    /// National dex number
    pub species: u16,
    pub species_name: String,
    pub nickname: Option<String>,
    pub level: u8,
    pub is_egg: bool,
    pub moves: Vec<Move>,
    pub held_item: Option<u32>,
}

impl Pokemon {
    pub fn new(species: u16, species_name: impl Into<String>, level: u8) -> Self {
        Self {
            species,
            species_name: species_name.into(),
            nickname: None,
            level,
            is_egg: false,
            moves: Vec::new(),
            held_item: None,
        }
    }

    pub fn egg(species: u16, species_name: impl Into<String>) -> Self {
        Self { is_egg: true, ..Self::new(species, species_name, 1) }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Learn a move; the oldest move is forgotten when the list is full
    pub fn with_move(mut self, name: impl Into<String>, max_pp: u8) -> Self {
        if self.moves.len() >= MAX_MOVES {
            self.moves.remove(0);
        }
        self.moves.push(Move::new(name, max_pp));
        self
    }

    /// Nickname if set, species name otherwise
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.species_name)
    }

    pub fn knows_move(&self, name: &str) -> bool {
        self.moves.iter().any(|m| m.is(name))
    }

    /// Eggs cannot use moves outside of battle
    pub fn can_use_field_move(&self, name: &str) -> bool {
        !self.is_egg && self.knows_move(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_nickname() {
        let geodude = Pokemon::new(74, "Geodude", 12);
        assert_eq!(geodude.display_name(), "Geodude");
        let rocky = geodude.with_nickname("Rocky");
        assert_eq!(rocky.display_name(), "Rocky");
    }

    #[test]
    fn test_field_move_ignores_case_and_eggs() {
        let mon = Pokemon::new(74, "Geodude", 12).with_move("rock smash", 15);
        assert!(mon.can_use_field_move("Rock Smash"));

        let mut egg = Pokemon::egg(74, "Geodude");
        egg.moves.push(Move::new("Rock Smash", 15));
        assert!(egg.knows_move("Rock Smash"));
        assert!(!egg.can_use_field_move("Rock Smash"));
    }

    #[test]
    fn test_move_list_capped() {
        let mon = Pokemon::new(1, "Bulbasaur", 5)
            .with_move("Tackle", 35)
            .with_move("Growl", 40)
            .with_move("Vine Whip", 25)
            .with_move("Leech Seed", 10)
            .with_move("Cut", 30);
        assert_eq!(mon.moves.len(), MAX_MOVES);
        assert!(!mon.knows_move("Tackle"));
        assert!(mon.knows_move("Cut"));
    }
}
