//! Error types.
//!
//! ## Advisory
//!
//! A rule said no. The reason is shown to whoever made the request and the
//! game state is left exactly as it was. Agents are expected to try again.
//!
//! ## ConfigError / PersistError
//!
//! Setup and restore failures. A failed restore never touches the running
//! game.

use crate::cards::Character;
use crate::core::player::PlayerId;
use crate::core::state::Phase;

/// Result of a rule operation.
pub type Outcome<T = ()> = Result<T, Advisory>;

/// Recoverable rule rejection.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Advisory {
    #[error("invalid card index {index}: hand has {len} cards")]
    InvalidHandIndex { index: usize, len: usize },

    #[error("invalid district index {index}: city has {len} districts")]
    InvalidCityIndex { index: usize, len: usize },

    #[error("invalid deck index {index}: deck has {len} cards")]
    InvalidDeckIndex { index: usize, len: usize },

    #[error("card index {0} listed more than once")]
    RepeatedIndex(usize),

    #[error("not enough gold: need {needed}, have {available}")]
    InsufficientGold { needed: u32, available: u32 },

    #[error("{0} has already been used this turn")]
    AlreadyUsed(&'static str),

    #[error("cannot build another {name}")]
    DuplicateDistrict { name: String },

    #[error("cannot build more than {limit} districts this turn")]
    BuildLimitReached { limit: u32 },

    #[error("the Keep cannot be destroyed")]
    Keep,

    #[error("{target} is under Bishop protection")]
    BishopProtection { target: PlayerId },

    #[error("{player}'s city is already complete")]
    CityComplete { player: PlayerId },

    #[error("only the {0} can do that")]
    WrongCharacter(Character),

    #[error("{0} is not built")]
    DistrictMissing(&'static str),

    #[error("cannot target yourself")]
    SelfTarget,

    #[error("the {0} cannot be targeted")]
    InvalidTarget(Character),

    #[error("no character has turn order {0}")]
    UnknownCharacter(u8),

    #[error("{0} is not available to choose")]
    CharacterUnavailable(Character),

    #[error("no such player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("turn already completed")]
    TurnCompleted,

    #[error("{0} was killed this round")]
    Killed(Character),

    #[error("no character has been chosen")]
    NoCharacter,

    #[error("not allowed during the {0:?} phase")]
    WrongPhase(Phase),
}

/// Invalid game configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("player count must be between 4 and 7, got {0}")]
    PlayerCount(usize),

    #[error("expected {expected} player agents, got {actual}")]
    AgentCount { expected: usize, actual: usize },

    #[error("expected {expected} player names, got {actual}")]
    NameCount { expected: usize, actual: usize },

    #[error("player name '{0}' is used more than once")]
    DuplicateName(String),

    #[error("the district catalogue is empty")]
    EmptyCatalogue,

    #[error("the district catalogue has {available} cards but setup needs {needed}")]
    CatalogueTooSmall { needed: usize, available: usize },

    #[error("completion threshold must be at least 1")]
    ZeroThreshold,
}

/// Structural failure while restoring a saved game.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("could not load game: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not load game: {0}")]
    Binary(#[from] bincode::Error),

    #[error("could not load game: saved game has {found} players, expected {expected}")]
    PlayerCount { expected: usize, found: usize },

    #[error("could not load game: {0}")]
    Invalid(String),
}
