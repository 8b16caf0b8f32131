//! Built districts per player.
//!
//! The ledger only stores cities. Build legality (duplicates, completion,
//! gold) is decided in `effects`; the ledger is the raw storage those rules
//! read and write.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Color, DistrictCard};
use crate::core::player::{PlayerId, PlayerMap};

/// Each player's city, in build order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityLedger {
    cities: PlayerMap<Vector<DistrictCard>>,
}

impl CityLedger {
    /// Empty cities for every seat.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            cities: PlayerMap::new(player_count, |_| Vector::new()),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.cities.player_count()
    }

    /// A player's city.
    #[must_use]
    pub fn city(&self, player: PlayerId) -> &Vector<DistrictCard> {
        &self.cities[player]
    }

    /// Number of districts in a player's city.
    #[must_use]
    pub fn size(&self, player: PlayerId) -> usize {
        self.cities[player].len()
    }

    /// Whether the player has built a district with this name.
    #[must_use]
    pub fn has(&self, player: PlayerId, name: &str) -> bool {
        self.cities[player].iter().any(|d| d.is(name))
    }

    /// How many districts with this name the player has built.
    #[must_use]
    pub fn count_named(&self, player: PlayerId, name: &str) -> usize {
        self.cities[player].iter().filter(|d| d.is(name)).count()
    }

    /// How many districts of this color the player has built.
    #[must_use]
    pub fn count_color(&self, player: PlayerId, color: Color) -> usize {
        self.cities[player].iter().filter(|d| d.color == color).count()
    }

    /// Position of the first district with this name.
    #[must_use]
    pub fn position(&self, player: PlayerId, name: &str) -> Option<usize> {
        self.cities[player].iter().position(|d| d.is(name))
    }

    /// Whether any district name appears more than once in the city.
    #[must_use]
    pub fn has_duplicate(&self, player: PlayerId) -> bool {
        let city = &self.cities[player];
        city.iter()
            .enumerate()
            .any(|(i, d)| city.iter().skip(i + 1).any(|other| other.is(&d.name)))
    }

    /// Append a district.
    pub fn add(&mut self, player: PlayerId, card: DistrictCard) {
        self.cities[player].push_back(card);
    }

    /// Remove the district at `index`.
    pub fn remove_at(&mut self, player: PlayerId, index: usize) -> Option<DistrictCard> {
        let city = &mut self.cities[player];
        if index < city.len() {
            Some(city.remove(index))
        } else {
            None
        }
    }

    /// Remove the first district with this name.
    pub fn remove_named(&mut self, player: PlayerId, name: &str) -> Option<DistrictCard> {
        let index = self.position(player, name)?;
        self.remove_at(player, index)
    }

    /// Iterate over (player, city) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &Vector<DistrictCard>)> {
        self.cities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temple() -> DistrictCard {
        DistrictCard::new("Temple", Color::Blue, 1)
    }

    #[test]
    fn test_add_and_query() {
        let mut ledger = CityLedger::new(4);
        let p = PlayerId::new(2);

        ledger.add(p, temple());
        ledger.add(p, DistrictCard::new("Prison", Color::Red, 2));

        assert_eq!(ledger.size(p), 2);
        assert_eq!(ledger.size(PlayerId::new(0)), 0);
        assert!(ledger.has(p, "temple"));
        assert_eq!(ledger.count_color(p, Color::Red), 1);
        assert_eq!(ledger.position(p, "Prison"), Some(1));
    }

    #[test]
    fn test_duplicate_detection() {
        let mut ledger = CityLedger::new(4);
        let p = PlayerId::new(0);

        ledger.add(p, temple());
        assert!(!ledger.has_duplicate(p));
        ledger.add(p, temple());
        assert!(ledger.has_duplicate(p));
        assert_eq!(ledger.count_named(p, "Temple"), 2);
    }

    #[test]
    fn test_remove() {
        let mut ledger = CityLedger::new(4);
        let p = PlayerId::new(1);
        ledger.add(p, temple());

        assert!(ledger.remove_at(p, 3).is_none());
        assert_eq!(ledger.remove_named(p, "TEMPLE"), Some(temple()));
        assert_eq!(ledger.size(p), 0);
    }
}
