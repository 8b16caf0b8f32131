//! The game engine.
//!
//! `Game` owns the state, one agent per seat and the action loop, and drives
//! the round state machine:
//!
//! ```text
//! Selection -> Turn -> Selection -> ... -> Turn -> End
//! ```
//!
//! Selection moves to Turn once every player holds a character. Turn moves
//! to End after character 8 if the end trigger fired this round, and back to
//! Selection (next round) otherwise. End is terminal and scores are computed
//! once, on entry.
//!
//! ## Example
//!
//! ```
//! use citadels::agents::{AutoAcknowledge, HeuristicAgent, PlayerAgent};
//! use citadels::core::{GameBuilder, GameRng};
//!
//! let agents: Vec<Box<dyn PlayerAgent>> = (0..4)
//!     .map(|i| Box::new(HeuristicAgent::new(GameRng::new(i))) as Box<dyn PlayerAgent>)
//!     .collect();
//! let mut game = GameBuilder::new()
//!     .seed(7)
//!     .build(agents, Box::new(AutoAcknowledge))
//!     .unwrap();
//!
//! game.run_phase();
//! assert!(game.state().players.values().all(|p| p.chosen.is_some()));
//! ```

use im::Vector;
use tracing::{debug, info};

use crate::agents::{ActionLoop, PlayerAgent};
use crate::cards::{Character, DistrictCard};
use crate::core::{
    Advisory, ConfigError, GameBuilder, GameConfig, GameState, Outcome, PersistError, Phase,
    PlayerId, PlayerMap,
};
use crate::effects::AbilityResolver;
use crate::persist;

use super::scoring::{self, ScoreResult};
use super::selection::SelectionProtocol;
use super::table::Table;
use super::turn::TurnEngine;

/// A game in progress.
pub struct Game {
    state: GameState,
    agents: Vec<Box<dyn PlayerAgent>>,
    action_loop: Box<dyn ActionLoop>,
    config: GameConfig,
}

impl Game {
    /// Set up a new game. Needs exactly one agent per seat.
    pub fn new(
        config: GameConfig,
        agents: Vec<Box<dyn PlayerAgent>>,
        action_loop: Box<dyn ActionLoop>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if agents.len() != config.player_count {
            return Err(ConfigError::AgentCount {
                expected: config.player_count,
                actual: agents.len(),
            });
        }

        let state = GameState::new(&config);
        Ok(Self { state, agents, action_loop, config })
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    fn table(&mut self) -> Table<'_> {
        Table::new(
            &mut self.state,
            &mut self.agents,
            self.action_loop.as_mut(),
            self.config.max_agent_retries,
            self.config.max_actions_per_turn,
        )
    }

    // === Phase control ===

    /// Run the current phase to completion. Returns the phase that follows.
    pub fn run_phase(&mut self) -> Phase {
        match self.state.phase() {
            Phase::Selection => SelectionProtocol::run(&mut self.table()),
            Phase::Turn => TurnEngine::run(&mut self.table()),
            Phase::End => {}
        }
        self.state.phase()
    }

    /// Play phases until the game ends. Returns the winner.
    pub fn run_to_completion(&mut self) -> Option<PlayerId> {
        while !self.state.is_over() {
            self.run_phase();
        }
        self.state.winner
    }

    /// Run character selection for a new round.
    pub fn start_character_selection_phase(&mut self) -> Outcome {
        self.require_phase(Phase::Selection)?;
        SelectionProtocol::run(&mut self.table());
        Ok(())
    }

    /// Call the characters, resuming after the last slot already played.
    pub fn start_turn_phase(&mut self) -> Outcome {
        self.require_phase(Phase::Turn)?;
        TurnEngine::run(&mut self.table());
        Ok(())
    }

    fn require_phase(&self, expected: Phase) -> Outcome {
        let phase = self.state.phase();
        if phase == expected {
            Ok(())
        } else {
            debug!(?phase, ?expected, "phase requested out of order");
            Err(Advisory::WrongPhase(phase))
        }
    }

    // === Table operations ===

    /// Kill the character with this turn order for the rest of the round.
    pub fn mark_character_killed(&mut self, turn_order: u8) -> Outcome {
        let character =
            Character::from_turn_order(turn_order).ok_or(Advisory::UnknownCharacter(turn_order))?;
        if character == Character::Assassin {
            return Err(Advisory::InvalidTarget(character));
        }
        AbilityResolver::mark_killed(&mut self.state, character);
        info!(%character, "character killed");
        Ok(())
    }

    /// Seat holding the character with this turn order.
    #[must_use]
    pub fn player_by_character_number(&self, turn_order: u8) -> Option<PlayerId> {
        Character::from_turn_order(turn_order).and_then(|c| self.state.holder_of(c))
    }

    #[must_use]
    pub fn city_for_player(&self, player: PlayerId) -> Option<&Vector<DistrictCard>> {
        self.state.players.contains(player).then(|| self.state.cities.city(player))
    }

    /// Put a district straight into a city, bypassing cost and build limits.
    /// The duplicate rule still applies.
    pub fn add_district_to_city(
        &mut self,
        player: PlayerId,
        mut district: DistrictCard,
    ) -> Outcome {
        if !self.state.players.contains(player) {
            return Err(Advisory::UnknownPlayer(player));
        }
        if self.state.is_city_complete(player) {
            return Err(Advisory::CityComplete { player });
        }
        AbilityResolver::check_duplicate(&self.state, player, &district)?;

        district.built_round = Some(self.state.round.round);
        info!(%player, district = %district.name, "district placed");
        self.state.cities.add(player, district);
        self.state.check_end_trigger();
        Ok(())
    }

    pub fn activate_bell_tower(&mut self) {
        self.state.activate_bell_tower();
    }

    pub fn deactivate_bell_tower(&mut self) {
        self.state.deactivate_bell_tower();
    }

    // === Scoring ===

    /// Scores as they stand now.
    #[must_use]
    pub fn calculate_scores(&self) -> PlayerMap<ScoreResult> {
        scoring::calculate_scores(&self.state)
    }

    #[must_use]
    pub fn determine_winner(&self, scores: &PlayerMap<ScoreResult>) -> Option<PlayerId> {
        scoring::determine_winner(&self.state, scores)
    }

    // === Persistence ===

    pub fn save_json(&self) -> Result<String, PersistError> {
        persist::to_json(&self.state)
    }

    /// Replace the state with a saved one. On error the game is unchanged.
    pub fn restore_json(&mut self, json: &str) -> Result<(), PersistError> {
        self.state = persist::from_json(json, self.config.player_count)?;
        info!(round = self.state.round.round, phase = ?self.state.phase(), "game restored");
        Ok(())
    }

    pub fn save_bincode(&self) -> Result<Vec<u8>, PersistError> {
        persist::to_bincode(&self.state)
    }

    /// Replace the state with a saved one. On error the game is unchanged.
    pub fn restore_bincode(&mut self, bytes: &[u8]) -> Result<(), PersistError> {
        self.state = persist::from_bincode(bytes, self.config.player_count)?;
        info!(round = self.state.round.round, phase = ?self.state.phase(), "game restored");
        Ok(())
    }
}

impl GameBuilder {
    /// Validate the configuration and set up the game.
    pub fn build(
        self,
        agents: Vec<Box<dyn PlayerAgent>>,
        action_loop: Box<dyn ActionLoop>,
    ) -> Result<Game, ConfigError> {
        Game::new(self.build_config()?, agents, action_loop)
    }
}
