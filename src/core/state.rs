//! Game state.
//!
//! ## RoundState
//!
//! Table-wide information for the current round: phase, round number, crown,
//! end-of-game trigger, Bell Tower, and where each of the eight characters
//! currently is (face-down discard, face-up discards, selectable pool).
//!
//! ## PlayerState
//!
//! One seat's gold, hand, chosen character and the per-round and per-turn
//! flags the rules consult.
//!
//! ## GameState
//!
//! Everything needed to continue a game: round and player state, cities,
//! the district deck, the RNG and the event history. It is plain data and
//! serializes as a whole (see `persist`).

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{info, warn};

use super::action::{ActionRecord, GameEvent};
use super::config::{GameConfig, Thresholds};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{Character, DistrictCard};
use crate::rules::scoring::ScoreResult;
use crate::zones::{CityLedger, Deck};

/// Round phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Players are choosing characters.
    Selection,
    /// Characters are being called 1-8.
    Turn,
    /// Game over, scores are final.
    End,
}

/// Noteworthy but legal situations recorded during play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundWarning {
    /// Nobody held the King last round, so the crown stayed put.
    NoKingChosen { round: u32 },
    /// An agent kept submitting rejected decisions and the engine chose for it.
    AgentFallback { round: u32, player: PlayerId, decision: String },
}

impl std::fmt::Display for RoundWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundWarning::NoKingChosen { round } => {
                write!(f, "round {round}: no one chose the King, the crown stays")
            }
            RoundWarning::AgentFallback { round, player, decision } => {
                write!(f, "round {round}: {player} ran out of retries choosing {decision}")
            }
        }
    }
}

/// Table-wide round state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: Phase,

    /// Round number, starting at 1.
    pub round: u32,

    pub crown_holder: PlayerId,

    /// Round in which the game end was triggered.
    pub final_round: Option<u32>,

    /// Set once, when the first city reaches the completion threshold.
    pub end_triggered: bool,

    pub first_to_finish: Option<PlayerId>,

    pub bell_tower_active: bool,

    // === Characters ===
    pub face_down: Option<Character>,
    pub face_up: SmallVec<[Character; 2]>,

    /// Characters still selectable (and, after selection, those nobody took).
    pub pool: SmallVec<[Character; 8]>,

    /// Character named by the Assassin this round.
    pub killed: Option<Character>,

    /// Character named by the Thief this round.
    pub robbed: Option<Character>,

    /// Turn order currently being played. 0 before the turn phase starts.
    pub active_slot: u8,

    /// Warnings raised since this round's selection began.
    pub warnings: Vec<RoundWarning>,
}

impl RoundState {
    /// State for the first round.
    #[must_use]
    pub fn new(crown_holder: PlayerId) -> Self {
        Self {
            phase: Phase::Selection,
            round: 1,
            crown_holder,
            final_round: None,
            end_triggered: false,
            first_to_finish: None,
            bell_tower_active: false,
            face_down: None,
            face_up: SmallVec::new(),
            pool: SmallVec::new(),
            killed: None,
            robbed: None,
            active_slot: 0,
            warnings: Vec::new(),
        }
    }

    /// Forget last round's characters and warnings.
    pub fn clear_characters(&mut self) {
        self.warnings.clear();
        self.face_down = None;
        self.face_up.clear();
        self.pool.clear();
        self.killed = None;
        self.robbed = None;
        self.active_slot = 0;
    }
}

/// One seat's state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub gold: u32,
    pub hand: Vector<DistrictCard>,

    // === Per round ===
    pub chosen: Option<Character>,
    pub killed: bool,
    pub stolen: bool,
    /// The Thief's seat while a theft is pending.
    pub robbed_by: Option<PlayerId>,
    pub turn_completed: bool,
    pub max_builds_per_turn: u32,

    // === Per turn ===
    pub builds_this_turn: u32,
    /// Assassin, Thief, Magician or Warlord ability already used.
    pub used_ability: bool,
    pub used_laboratory: bool,
    pub used_smithy: bool,
    pub used_museum: bool,

    /// Income cards drawn and waiting for a keep decision.
    pub drawn: Vector<DistrictCard>,

    /// Cards placed under the Museum.
    pub museum_stored: Vector<DistrictCard>,
}

impl PlayerState {
    #[must_use]
    pub fn new(name: impl Into<String>, gold: u32) -> Self {
        Self {
            name: name.into(),
            gold,
            hand: Vector::new(),
            chosen: None,
            killed: false,
            stolen: false,
            robbed_by: None,
            turn_completed: false,
            max_builds_per_turn: 1,
            builds_this_turn: 0,
            used_ability: false,
            used_laboratory: false,
            used_smithy: false,
            used_museum: false,
            drawn: Vector::new(),
            museum_stored: Vector::new(),
        }
    }

    /// Clear everything tied to last round's character.
    pub fn reset_for_round(&mut self) {
        self.chosen = None;
        self.killed = false;
        self.stolen = false;
        self.robbed_by = None;
        self.turn_completed = false;
        self.max_builds_per_turn = 1;
        self.reset_for_turn();
    }

    /// Clear once-per-turn flags.
    pub fn reset_for_turn(&mut self) {
        self.builds_this_turn = 0;
        self.used_ability = false;
        self.used_laboratory = false;
        self.used_smithy = false;
        self.used_museum = false;
    }
}

/// Complete game state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub round: RoundState,
    pub players: PlayerMap<PlayerState>,
    pub cities: CityLedger,
    pub districts: Deck<DistrictCard>,
    pub thresholds: Thresholds,
    pub rng: GameRng,
    pub history: Vector<ActionRecord>,

    /// Final scores, filled exactly once when the game ends.
    pub scores: Option<PlayerMap<ScoreResult>>,
    pub winner: Option<PlayerId>,
}

impl GameState {
    /// Set up a new game: shuffle the catalogue, deal hands and gold, and
    /// hand the crown to a random player.
    ///
    /// The configuration is assumed to be validated.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let root = GameRng::new(config.seed);
        let player_count = config.player_count;

        let mut districts = Deck::from_cards(config.districts.expand());
        districts.shuffle(&mut root.for_context("districts"));

        let mut players = PlayerMap::new(player_count, |p| {
            PlayerState::new(config.player_names[p.index()].clone(), config.starting_gold)
        });
        for (_, player) in players.iter_mut() {
            player.hand = districts.draw_many(config.starting_hand_size).into_iter().collect();
        }

        let crown = PlayerId::new(root.for_context("crown").gen_range_usize(0..player_count) as u8);

        let mut state = Self {
            round: RoundState::new(crown),
            players,
            cities: CityLedger::new(player_count),
            districts,
            thresholds: config.thresholds,
            rng: root.for_context("characters"),
            history: Vector::new(),
            scores: None,
            winner: None,
        };
        info!(players = player_count, crown = %crown, "game set up");
        state.record(None, GameEvent::CrownAssigned { to: crown });
        state
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.player_count())
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.round.phase
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.round.phase == Phase::End
    }

    /// Seat holding this character this round.
    #[must_use]
    pub fn holder_of(&self, character: Character) -> Option<PlayerId> {
        let mut holders = self
            .players
            .iter()
            .filter(|(_, p)| p.chosen == Some(character))
            .map(|(id, _)| id);
        let holder = holders.next();
        assert!(holders.next().is_none(), "{character} held by more than one player");
        holder
    }

    /// Whether a player has built the named district.
    #[must_use]
    pub fn has_built(&self, player: PlayerId, name: &str) -> bool {
        self.cities.has(player, name)
    }

    /// City size that currently ends the game.
    #[must_use]
    pub fn completion_threshold(&self) -> usize {
        self.thresholds.active(self.round.bell_tower_active)
    }

    #[must_use]
    pub fn is_city_complete(&self, player: PlayerId) -> bool {
        self.cities.size(player) >= self.completion_threshold()
    }

    /// Characters publicly discarded this round.
    #[must_use]
    pub fn face_up_discards(&self) -> &[Character] {
        &self.round.face_up
    }

    pub fn activate_bell_tower(&mut self) {
        if !self.round.bell_tower_active {
            self.round.bell_tower_active = true;
            info!(threshold = self.thresholds.bell_tower, "bell tower activated");
            self.record(None, GameEvent::BellTowerActivated);
        }
    }

    pub fn deactivate_bell_tower(&mut self) {
        if self.round.bell_tower_active {
            self.round.bell_tower_active = false;
            info!(threshold = self.thresholds.completion, "bell tower deactivated");
            self.record(None, GameEvent::BellTowerDeactivated);
        }
    }

    /// Fire the end trigger for the first city (in seat order) at or past the
    /// threshold. Fires at most once per game.
    pub fn check_end_trigger(&mut self) -> Option<PlayerId> {
        if self.round.end_triggered {
            return None;
        }
        let finisher = self.player_ids().find(|&p| self.is_city_complete(p))?;

        self.round.end_triggered = true;
        self.round.first_to_finish = Some(finisher);
        self.round.final_round = Some(self.round.round);
        info!(player = %finisher, round = self.round.round, "city complete, final round");
        self.record(Some(finisher), GameEvent::EndTriggered);
        Some(finisher)
    }

    /// Append to the history.
    pub fn record(&mut self, player: Option<PlayerId>, event: GameEvent) {
        let round = self.round.round;
        self.history.push_back(ActionRecord::new(round, player, event));
    }

    /// Record and log a round warning.
    pub fn push_warning(&mut self, warning: RoundWarning) {
        warn!(%warning, "round warning");
        self.round.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Color, DistrictCard};
    use crate::core::config::GameBuilder;

    fn new_state(players: usize, seed: u64) -> GameState {
        let config = GameBuilder::new()
            .player_count(players)
            .seed(seed)
            .build_config()
            .unwrap();
        GameState::new(&config)
    }

    #[test]
    fn test_setup_deals_gold_and_hands() {
        let state = new_state(5, 1);
        let config = GameBuilder::new().player_count(5).build_config().unwrap();

        for (_, player) in state.players.iter() {
            assert_eq!(player.gold, 2);
            assert_eq!(player.hand.len(), 4);
        }
        assert_eq!(state.districts.len(), config.districts.deck_size() - 20);
        assert_eq!(state.phase(), Phase::Selection);
        assert_eq!(state.round.round, 1);
    }

    #[test]
    fn test_setup_is_deterministic() {
        let a = new_state(4, 99);
        let b = new_state(4, 99);
        assert_eq!(a.round.crown_holder, b.round.crown_holder);
        assert_eq!(a.players, b.players);
        assert_eq!(a.districts, b.districts);
    }

    #[test]
    fn test_end_trigger_fires_once() {
        let mut state = new_state(4, 3);
        let first = PlayerId::new(2);
        let second = PlayerId::new(0);

        for i in 0..8 {
            state.cities.add(first, DistrictCard::new(format!("D{i}"), Color::Red, 1));
        }
        assert_eq!(state.check_end_trigger(), Some(first));

        for i in 0..8 {
            state.cities.add(second, DistrictCard::new(format!("D{i}"), Color::Red, 1));
        }
        assert_eq!(state.check_end_trigger(), None);
        assert_eq!(state.round.first_to_finish, Some(first));
        assert_eq!(state.round.final_round, Some(1));
    }

    #[test]
    fn test_bell_tower_lowers_threshold() {
        let mut state = new_state(4, 3);
        assert_eq!(state.completion_threshold(), 8);
        state.activate_bell_tower();
        assert_eq!(state.completion_threshold(), 7);
        state.deactivate_bell_tower();
        assert_eq!(state.completion_threshold(), 8);
    }

    #[test]
    fn test_holder_of() {
        let mut state = new_state(4, 3);
        state.players[PlayerId::new(3)].chosen = Some(Character::Bishop);
        assert_eq!(state.holder_of(Character::Bishop), Some(PlayerId::new(3)));
        assert_eq!(state.holder_of(Character::King), None);
    }
}
