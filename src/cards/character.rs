//! The eight fixed characters.
//!
//! Characters are chosen secretly each round and determine turn order.
//! The set is closed, so it is an enum rather than data-driven like districts.

use serde::{Deserialize, Serialize};

use super::district::Color;

/// A character card, identified by its turn order (1-8).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Character {
    Assassin = 1,
    Thief = 2,
    Magician = 3,
    King = 4,
    Bishop = 5,
    Merchant = 6,
    Architect = 7,
    Warlord = 8,
}

impl Character {
    /// All characters in turn order.
    pub const ALL: [Character; 8] = [
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::King,
        Character::Bishop,
        Character::Merchant,
        Character::Architect,
        Character::Warlord,
    ];

    /// Turn order (1-8).
    #[must_use]
    pub const fn turn_order(self) -> u8 {
        self as u8
    }

    /// Look up a character by turn order.
    #[must_use]
    pub fn from_turn_order(order: u8) -> Option<Self> {
        match order {
            1..=8 => Some(Self::ALL[order as usize - 1]),
            _ => None,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Character::Assassin => "Assassin",
            Character::Thief => "Thief",
            Character::Magician => "Magician",
            Character::King => "King",
            Character::Bishop => "Bishop",
            Character::Merchant => "Merchant",
            Character::Architect => "Architect",
            Character::Warlord => "Warlord",
        }
    }

    /// Rules text.
    #[must_use]
    pub const fn ability(self) -> &'static str {
        match self {
            Character::Assassin => "Kill another character.",
            Character::Thief => "Steal gold from another character.",
            Character::Magician => "Exchange hand or redraw cards.",
            Character::King => "Gain gold for yellow districts and receive the crown.",
            Character::Bishop => "Gain gold for blue districts and protect city.",
            Character::Merchant => "Gain gold for green districts and earn 1 extra gold.",
            Character::Architect => "Draw 2 extra cards and build up to 3 districts.",
            Character::Warlord => "Gain gold for red districts and destroy buildings.",
        }
    }

    /// District color this character collects gold for, if any.
    #[must_use]
    pub const fn bonus_color(self) -> Option<Color> {
        match self {
            Character::King => Some(Color::Yellow),
            Character::Bishop => Some(Color::Blue),
            Character::Merchant => Some(Color::Green),
            Character::Warlord => Some(Color::Red),
            _ => None,
        }
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.turn_order(), self.name())
    }
}

/// Immutable lookup over the eight characters.
///
/// ```
/// use citadels::cards::{Character, CharacterRegistry};
///
/// assert_eq!(CharacterRegistry::by_turn_order(4), Some(Character::King));
/// assert_eq!(CharacterRegistry::by_name("warlord"), Some(Character::Warlord));
/// assert_eq!(CharacterRegistry::all().len(), 8);
/// ```
pub struct CharacterRegistry;

impl CharacterRegistry {
    /// All characters, in turn order.
    #[must_use]
    pub fn all() -> &'static [Character; 8] {
        &Character::ALL
    }

    /// Character holding the given turn order.
    #[must_use]
    pub fn by_turn_order(order: u8) -> Option<Character> {
        Character::from_turn_order(order)
    }

    /// Case-insensitive lookup by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Character> {
        let name = name.trim();
        Character::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_order_round_trip() {
        for (i, character) in Character::ALL.iter().enumerate() {
            assert_eq!(character.turn_order() as usize, i + 1);
            assert_eq!(Character::from_turn_order(i as u8 + 1), Some(*character));
        }
        assert_eq!(Character::from_turn_order(0), None);
        assert_eq!(Character::from_turn_order(9), None);
    }

    #[test]
    fn test_bonus_colors() {
        assert_eq!(Character::King.bonus_color(), Some(Color::Yellow));
        assert_eq!(Character::Bishop.bonus_color(), Some(Color::Blue));
        assert_eq!(Character::Merchant.bonus_color(), Some(Color::Green));
        assert_eq!(Character::Warlord.bonus_color(), Some(Color::Red));
        assert_eq!(Character::Architect.bonus_color(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Character::Magician.to_string(), "3. Magician");
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(CharacterRegistry::by_name(" Bishop "), Some(Character::Bishop));
        assert_eq!(CharacterRegistry::by_name("Wizard"), None);
    }
}
