//! District cards.
//!
//! Districts are the buildings players put into their cities. Cards are
//! plain values: several copies of the same template can live in different
//! hands, decks and cities at the same time, and two cards are equal when
//! their name, color and cost match.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// District color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl Color {
    /// All five colors.
    pub const ALL: [Color; 5] =
        [Color::Red, Color::Yellow, Color::Green, Color::Blue, Color::Purple];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a color name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown district color '{0}'")]
pub struct UnknownColor(pub String);

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Color::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// Names of districts with special rules.
pub mod names {
    pub const ARMORY: &str = "Armory";
    pub const BELL_TOWER: &str = "Bell Tower";
    pub const DRAGON_GATE: &str = "Dragon Gate";
    pub const FACTORY: &str = "Factory";
    pub const GRAVEYARD: &str = "Graveyard";
    pub const GREAT_WALL: &str = "Great Wall";
    pub const HAUNTED_CITY: &str = "Haunted City";
    pub const HOSPITAL: &str = "Hospital";
    pub const IMPERIAL_TREASURY: &str = "Imperial Treasury";
    pub const KEEP: &str = "Keep";
    pub const LABORATORY: &str = "Laboratory";
    pub const LIBRARY: &str = "Library";
    pub const LIGHTHOUSE: &str = "Lighthouse";
    pub const MAP_ROOM: &str = "Map Room";
    pub const MUSEUM: &str = "Museum";
    pub const OBSERVATORY: &str = "Observatory";
    pub const PARK: &str = "Park";
    pub const POOR_HOUSE: &str = "Poor House";
    pub const QUARRY: &str = "Quarry";
    pub const SCHOOL_OF_MAGIC: &str = "School of Magic";
    pub const SMITHY: &str = "Smithy";
    pub const THRONE_ROOM: &str = "Throne Room";
    pub const UNIVERSITY: &str = "University";
    pub const WISHING_WELL: &str = "Wishing Well";
}

/// A district card.
///
/// ```
/// use citadels::cards::{Color, DistrictCard};
///
/// let keep = DistrictCard::new("Keep", Color::Purple, 3);
/// assert!(keep.is("keep"));
/// assert!(!keep.is_built());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DistrictCard {
    pub name: String,
    pub color: Color,
    pub cost: u32,
    pub ability: Option<String>,
    /// Round the card entered a city, `None` while it is not built.
    pub built_round: Option<u32>,
}

impl DistrictCard {
    /// Create an unbuilt district without ability text.
    pub fn new(name: impl Into<String>, color: Color, cost: u32) -> Self {
        Self {
            name: name.into(),
            color,
            cost,
            ability: None,
            built_round: None,
        }
    }

    /// Set the ability text.
    #[must_use]
    pub fn with_ability(mut self, ability: impl Into<String>) -> Self {
        let ability = ability.into();
        self.ability = if ability.trim().is_empty() { None } else { Some(ability) };
        self
    }

    /// Case-insensitive name check.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built_round.is_some()
    }

    #[must_use]
    pub fn is_purple(&self) -> bool {
        self.color == Color::Purple
    }
}

impl PartialEq for DistrictCard {
    fn eq(&self, other: &Self) -> bool {
        self.is(&other.name) && self.color == other.color && self.cost == other.cost
    }
}

impl Eq for DistrictCard {}

impl std::fmt::Display for DistrictCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}{}]", self.name, self.color, self.cost)?;
        if let Some(ability) = &self.ability {
            write!(f, " ({ability})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse() {
        assert_eq!("Red".parse::<Color>(), Ok(Color::Red));
        assert_eq!(" purple ".parse::<Color>(), Ok(Color::Purple));
        assert!("orange".parse::<Color>().is_err());
    }

    #[test]
    fn test_equality_ignores_build_state_and_ability() {
        let mut built = DistrictCard::new("Temple", Color::Blue, 1);
        built.built_round = Some(3);
        let fresh = DistrictCard::new("temple", Color::Blue, 1).with_ability("ignored");

        assert_eq!(built, fresh);
        assert_ne!(fresh, DistrictCard::new("Temple", Color::Blue, 2));
        assert_ne!(fresh, DistrictCard::new("Temple", Color::Red, 1));
    }

    #[test]
    fn test_blank_ability_is_none() {
        let card = DistrictCard::new("Tavern", Color::Green, 1).with_ability("  ");
        assert!(card.ability.is_none());
        assert_eq!(card.to_string(), "Tavern [green1]");
    }
}
