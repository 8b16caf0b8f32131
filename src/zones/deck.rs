//! Ordered draw pile.
//!
//! Index 0 is the top of the deck. Cards are drawn from the top and returned
//! to the bottom. Backed by `im::Vector` so game states clone cheaply.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::rng::GameRng;

/// An ordered sequence of cards.
///
/// ```
/// use citadels::zones::Deck;
///
/// let mut deck: Deck<u32> = Deck::from_cards(vec![1, 2, 3]);
/// assert_eq!(deck.draw(), Some(1));
///
/// deck.add_to_bottom([9]);
/// assert_eq!(deck.peek_all().iter().copied().collect::<Vec<_>>(), vec![2, 3, 9]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct Deck<T: Clone> {
    cards: Vector<T>,
}

impl<T: Clone> Default for Deck<T> {
    fn default() -> Self {
        Self { cards: Vector::new() }
    }
}

impl<T: Clone> Deck<T> {
    /// Create an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deck with the given cards, first card on top.
    pub fn from_cards(cards: impl IntoIterator<Item = T>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Take the top card.
    pub fn draw(&mut self) -> Option<T> {
        self.cards.pop_front()
    }

    /// Take up to `count` cards from the top.
    pub fn draw_many(&mut self, count: usize) -> Vec<T> {
        let mut drawn = Vec::with_capacity(count);
        while drawn.len() < count {
            match self.draw() {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        drawn
    }

    /// Shuffle in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<T> = self.cards.iter().cloned().collect();
        rng.shuffle(&mut cards);
        self.cards = cards.into_iter().collect();
    }

    /// All cards, top first.
    #[must_use]
    pub fn peek_all(&self) -> &Vector<T> {
        &self.cards
    }

    /// Put cards underneath the deck, preserving their order.
    pub fn add_to_bottom(&mut self, cards: impl IntoIterator<Item = T>) {
        self.cards.extend(cards);
    }

    /// Remove and return the card at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    /// Remove the first card equal to `card`. Returns `false` if absent.
    pub fn remove(&mut self, card: &T) -> bool
    where
        T: PartialEq,
    {
        match self.cards.iter().position(|c| c == card) {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the whole contents.
    pub fn replace(&mut self, cards: impl IntoIterator<Item = T>) {
        self.cards = cards.into_iter().collect();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
