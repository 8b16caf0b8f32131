//! Player decision-making.
//!
//! The engine never branches on who is playing. Every seat is driven through
//! the `PlayerAgent` trait, and the surrounding loop (a UI, a test, a
//! simulation harness) is reached through `ActionLoop`:
//! - `HeuristicAgent`: computer player
//! - `ScriptedAgent`: plays decisions queued by a UI or a test
//!
//! Agents see the whole `GameState` read-only and answer with decisions. The
//! engine validates and commits them; a rejected decision is reported through
//! `on_rejected` and the agent is asked again.

mod heuristic;
mod scripted;

pub use heuristic::HeuristicAgent;
pub use scripted::{Decision, ScriptHandle, ScriptedAgent};

use crate::cards::{Character, DistrictCard};
use crate::core::{AbilityCommand, Advisory, GameState, IncomeChoice, PlayerId, TurnAction};

// =============================================================================
// Player Agent
// =============================================================================

/// Decisions one seat makes during a game.
pub trait PlayerAgent {
    /// Pick a character. `available` is never empty.
    fn choose_character(
        &mut self,
        state: &GameState,
        me: PlayerId,
        available: &[Character],
    ) -> Character;

    /// Gold or cards.
    fn choose_income(&mut self, state: &GameState, me: PlayerId) -> IncomeChoice;

    /// Index into `drawn` of the income card to keep.
    fn choose_card_to_keep(
        &mut self,
        state: &GameState,
        me: PlayerId,
        drawn: &[DistrictCard],
    ) -> usize;

    /// Active character ability to use, if any. Asked once per turn before
    /// income; `None` skips it.
    fn use_ability(&mut self, state: &GameState, me: PlayerId) -> Option<AbilityCommand>;

    /// Next build-step action. The turn ends on `TurnAction::EndTurn`.
    fn next_action(&mut self, state: &GameState, me: PlayerId) -> TurnAction;

    /// Pay 1 gold to take a district the Warlord just destroyed.
    fn accept_graveyard(
        &mut self,
        state: &GameState,
        me: PlayerId,
        destroyed: &DistrictCard,
    ) -> bool;

    /// Activate the Bell Tower just built.
    fn activate_bell_tower(&mut self, state: &GameState, me: PlayerId) -> bool;

    /// Lighthouse: index into `deck` of the card to take.
    fn choose_lighthouse_card(
        &mut self,
        state: &GameState,
        me: PlayerId,
        deck: &[DistrictCard],
    ) -> Option<usize>;

    /// Called after one of this agent's districts is built.
    fn on_district_built(&mut self, _state: &GameState, _me: PlayerId, _district: &DistrictCard) {}

    /// Called when a decision is rejected, before the agent is asked again.
    fn on_rejected(&mut self, _advisory: &Advisory) {}
}

// =============================================================================
// Action Loop
// =============================================================================

/// The loop driving the engine.
///
/// Both calls are synchronous: the engine does not continue until they return.
pub trait ActionLoop {
    /// A character nobody holds was called.
    fn acknowledge_null_turn(&mut self, state: &GameState, character: Character);

    /// A player finished their turn.
    fn turn_completed(&mut self, _state: &GameState, _player: PlayerId) {}
}

/// Acknowledges every null turn immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoAcknowledge;

impl ActionLoop for AutoAcknowledge {
    fn acknowledge_null_turn(&mut self, _state: &GameState, _character: Character) {}
}
