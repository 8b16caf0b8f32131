//! Round flow and scoring.
//!
//! - `selection`: crown, character deal, picks
//! - `turn`: the 1-8 character sweep and each player's turn
//! - `scoring`: final scores and the winner
//! - `engine`: `Game`, the phase state machine tying them together
//!
//! The rules never know what kind of player sits in a seat; every decision
//! goes through `agents::PlayerAgent`.

pub mod engine;
pub mod scoring;
pub mod selection;
mod table;
pub mod turn;

pub use engine::Game;
pub use scoring::{calculate_scores, determine_winner, ScoreResult};
pub use selection::SelectionProtocol;
pub use table::Table;
pub use turn::TurnEngine;
