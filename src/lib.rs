//! # citadels-engine
//!
//! A rules engine for Citadels, the city-building card game for 4-7 players.
//!
//! ## Design Principles
//!
//! 1. **Validate, then commit**: every rule operation either applies its whole
//!    effect or returns an `Advisory` and leaves the state exactly as it was.
//!
//! 2. **Seats, not people**: the engine drives every seat through the
//!    `PlayerAgent` trait and never knows whether a human or a computer is
//!    playing.
//!
//! 3. **Deterministic**: all randomness comes from a seeded `GameRng` owned by
//!    the state, so a seed and the agents' decisions reproduce a game.
//!
//! ## Architecture
//!
//! - **Plain-data state**: `GameState` holds everything and serializes as a
//!   whole, so any point between phases can be saved and resumed.
//!
//! - **Persistent Data Structures**: hands, cities and the deck use `im`
//!   vectors, so snapshots and clones are cheap.
//!
//! ## Modules
//!
//! - `core`: players, state, decisions, errors, RNG, configuration
//! - `cards`: characters and districts
//! - `zones`: the district deck and the cities
//! - `effects`: character abilities, district passives, destruction
//! - `rules`: selection, turns, scoring and the `Game` state machine
//! - `agents`: the `PlayerAgent` trait and its implementations
//! - `persist`: JSON and bincode snapshots

pub mod agents;
pub mod cards;
pub mod core;
pub mod effects;
pub mod persist;
pub mod rules;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    AbilityCommand, ActionRecord, Advisory, ConfigError, GameBuilder, GameConfig, GameEvent,
    GameRng, GameState, IncomeChoice, Outcome, PersistError, Phase, PlayerId, PlayerMap,
    PlayerState, RoundState, RoundWarning, TurnAction,
};

pub use crate::cards::{Character, CharacterRegistry, Color, DistrictCard, DistrictRegistry};

pub use crate::zones::{CityLedger, Deck};

pub use crate::effects::{AbilityResolver, Destruction};

pub use crate::rules::{Game, ScoreResult, SelectionProtocol, TurnEngine};

pub use crate::agents::{
    ActionLoop, AutoAcknowledge, Decision, HeuristicAgent, PlayerAgent, ScriptHandle, ScriptedAgent,
};
