//! Core engine types: players, state, decisions, errors, RNG, configuration.
//!
//! Nothing in here knows how a turn is played. The rules in `effects` and
//! `rules` read and write these types.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{AbilityCommand, ActionRecord, GameEvent, IncomeChoice, TurnAction};
pub use config::{GameBuilder, GameConfig, Thresholds, MAX_PLAYERS, MIN_PLAYERS};
pub use error::{Advisory, ConfigError, Outcome, PersistError};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, Phase, PlayerState, RoundState, RoundWarning};
