//! Card locations outside of hands.
//!
//! ## Key Types
//!
//! - `Deck`: Ordered draw pile (top = index 0)
//! - `CityLedger`: Each player's built districts

pub mod city;
pub mod deck;

pub use city::CityLedger;
pub use deck::Deck;
