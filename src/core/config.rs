//! Game configuration.
//!
//! `GameConfig` carries every tunable of a game: table size, seed, starting
//! resources, completion thresholds, agent retry limits and the district
//! catalogue. Build one with `GameBuilder`:
//!
//! ```
//! use citadels::core::GameBuilder;
//!
//! let config = GameBuilder::new()
//!     .player_count(5)
//!     .seed(7)
//!     .build_config()
//!     .unwrap();
//!
//! assert_eq!(config.player_count, 5);
//! assert_eq!(config.starting_gold, 2);
//! assert_eq!(config.player_names[0], "Player 1");
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::cards::DistrictRegistry;

/// Supported table sizes.
pub const MIN_PLAYERS: usize = 4;
pub const MAX_PLAYERS: usize = 7;

/// City sizes that end the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Normal completion size.
    pub completion: usize,
    /// Completion size while the Bell Tower is active.
    pub bell_tower: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            completion: 8,
            bell_tower: 7,
        }
    }
}

impl Thresholds {
    /// The threshold in force.
    #[must_use]
    pub fn active(&self, bell_tower_active: bool) -> usize {
        if bell_tower_active {
            self.bell_tower
        } else {
            self.completion
        }
    }
}

/// Full game configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    pub player_count: usize,
    pub seed: u64,
    pub player_names: Vec<String>,
    pub starting_gold: u32,
    pub starting_hand_size: usize,
    pub thresholds: Thresholds,

    /// Rejected decisions tolerated before the engine falls back.
    pub max_agent_retries: u32,

    /// Upper bound on build-step actions in one turn.
    pub max_actions_per_turn: u32,

    pub districts: DistrictRegistry,
}

impl GameConfig {
    /// Check the configuration is playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigError::PlayerCount(self.player_count));
        }
        if self.player_names.len() != self.player_count {
            return Err(ConfigError::NameCount {
                expected: self.player_count,
                actual: self.player_names.len(),
            });
        }
        for (i, name) in self.player_names.iter().enumerate() {
            if self.player_names[..i].iter().any(|n| n == name) {
                return Err(ConfigError::DuplicateName(name.clone()));
            }
        }
        if self.thresholds.completion == 0 || self.thresholds.bell_tower == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.districts.is_empty() {
            return Err(ConfigError::EmptyCatalogue);
        }
        let needed = self.player_count * self.starting_hand_size;
        if self.districts.deck_size() < needed {
            return Err(ConfigError::CatalogueTooSmall {
                needed,
                available: self.districts.deck_size(),
            });
        }
        Ok(())
    }
}

/// Builder for `GameConfig` and `Game`.
#[derive(Clone, Debug)]
pub struct GameBuilder {
    player_count: usize,
    seed: u64,
    player_names: Option<Vec<String>>,
    starting_gold: u32,
    starting_hand_size: usize,
    thresholds: Thresholds,
    max_agent_retries: u32,
    max_actions_per_turn: u32,
    districts: Option<DistrictRegistry>,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self {
            player_count: 4,
            seed: 0,
            player_names: None,
            starting_gold: 2,
            starting_hand_size: 4,
            thresholds: Thresholds::default(),
            max_agent_retries: 8,
            max_actions_per_turn: 64,
            districts: None,
        }
    }
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_count(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn player_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.player_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn starting_gold(mut self, gold: u32) -> Self {
        self.starting_gold = gold;
        self
    }

    pub fn starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    pub fn completion_threshold(mut self, size: usize) -> Self {
        self.thresholds.completion = size;
        self
    }

    pub fn bell_tower_threshold(mut self, size: usize) -> Self {
        self.thresholds.bell_tower = size;
        self
    }

    pub fn max_agent_retries(mut self, retries: u32) -> Self {
        self.max_agent_retries = retries;
        self
    }

    pub fn max_actions_per_turn(mut self, actions: u32) -> Self {
        self.max_actions_per_turn = actions;
        self
    }

    pub fn districts(mut self, registry: DistrictRegistry) -> Self {
        self.districts = Some(registry);
        self
    }

    /// Assemble and validate the configuration.
    pub fn build_config(self) -> Result<GameConfig, ConfigError> {
        let player_names = self.player_names.unwrap_or_else(|| {
            (1..=self.player_count).map(|i| format!("Player {i}")).collect()
        });

        let config = GameConfig {
            player_count: self.player_count,
            seed: self.seed,
            player_names,
            starting_gold: self.starting_gold,
            starting_hand_size: self.starting_hand_size,
            thresholds: self.thresholds,
            max_agent_retries: self.max_agent_retries,
            max_actions_per_turn: self.max_actions_per_turn,
            districts: self.districts.unwrap_or_else(DistrictRegistry::standard),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameBuilder::new().build_config().unwrap();
        assert_eq!(config.player_count, 4);
        assert_eq!(config.starting_hand_size, 4);
        assert_eq!(config.thresholds.active(false), 8);
        assert_eq!(config.thresholds.active(true), 7);
        assert!(!config.districts.is_empty());
    }

    #[test]
    fn test_player_count_bounds() {
        assert_eq!(
            GameBuilder::new().player_count(3).build_config().unwrap_err(),
            ConfigError::PlayerCount(3)
        );
        assert_eq!(
            GameBuilder::new().player_count(8).build_config().unwrap_err(),
            ConfigError::PlayerCount(8)
        );
        assert!(GameBuilder::new().player_count(7).build_config().is_ok());
    }

    #[test]
    fn test_names_must_match_and_be_unique() {
        let err = GameBuilder::new().player_names(["a", "b"]).build_config().unwrap_err();
        assert_eq!(err, ConfigError::NameCount { expected: 4, actual: 2 });

        let err = GameBuilder::new()
            .player_names(["a", "b", "c", "a"])
            .build_config()
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateName("a".into()));
    }

    #[test]
    fn test_empty_catalogue_rejected() {
        let err = GameBuilder::new()
            .districts(DistrictRegistry::new())
            .build_config()
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyCatalogue);
    }
}
