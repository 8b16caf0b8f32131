//! The turn phase.
//!
//! Characters are called in turn order 1-8. For each one:
//!
//! - nobody holds it: a null turn, acknowledged by the action loop
//! - its holder already finished: skipped (a resumed phase)
//! - otherwise its holder plays a turn
//!
//! ## Turn sequence
//!
//! 1. Death: a killed player plays only the income step if they own a
//!    Hospital, and nothing otherwise
//! 2. Theft: a robbed player's gold goes to the Thief
//! 3. Character gold and passives, then the active ability
//! 4. Income: 2 gold, or draw and keep cards
//! 5. Build step: builds and purple district actions until the player ends
//!    the turn
//! 6. Poor House and Park
//! 7. End trigger check
//!
//! After character 8 the game ends if the trigger fired this round;
//! otherwise the next round starts with selection.

use tracing::{debug, info, warn};

use crate::cards::{names, Character, DistrictCard};
use crate::core::{
    Advisory, GameEvent, GameState, IncomeChoice, Outcome, Phase, PlayerId, RoundWarning,
    TurnAction,
};
use crate::effects::{AbilityResolver, Destruction};

use super::scoring;
use super::table::Table;

/// Runs the turn phase.
pub struct TurnEngine;

impl TurnEngine {
    /// Call every remaining character, then close the round.
    ///
    /// Resumes from `RoundState::active_slot`.
    pub fn run(table: &mut Table<'_>) {
        debug_assert_eq!(table.state.phase(), Phase::Turn);

        let start = table.state.round.active_slot.max(1);
        for slot in start..=8 {
            table.state.round.active_slot = slot;
            let Some(character) = Character::from_turn_order(slot) else {
                continue;
            };
            Self::call_character(table, character);
        }

        Self::finish_round(table.state);
    }

    /// Resolve one character slot.
    pub fn call_character(table: &mut Table<'_>, character: Character) {
        match table.state.holder_of(character) {
            None => {
                debug!(%character, "null turn");
                table.state.record(None, GameEvent::NullTurn { character });
                table.action_loop.acknowledge_null_turn(&*table.state, character);
            }
            Some(player) if table.state.player(player).turn_completed => {
                debug!(%player, %character, "turn already completed");
            }
            Some(player) => Self::play_turn(table, player, character),
        }
    }

    /// Play one player's turn.
    pub fn play_turn(table: &mut Table<'_>, player: PlayerId, character: Character) {
        table.state.player_mut(player).reset_for_turn();

        if table.state.player(player).killed {
            if table.state.has_built(player, names::HOSPITAL) {
                info!(%player, %character, "killed, hospital income only");
                table.state.record(Some(player), GameEvent::TurnStarted { character });
                Self::take_income(table, player);
            } else {
                info!(%player, %character, "killed, turn skipped");
                table.state.record(Some(player), GameEvent::TurnSkipped { character });
            }
            Self::complete_turn(table, player);
            return;
        }

        info!(%player, %character, "turn started");
        table.state.record(Some(player), GameEvent::TurnStarted { character });

        if let Some((thief, amount)) = AbilityResolver::resolve_theft(table.state, player) {
            info!(from = %player, to = %thief, amount, "gold stolen");
        }

        AbilityResolver::apply_character_passive(table.state, player);
        Self::use_ability(table, player);
        Self::take_income(table, player);
        Self::build_step(table, player);

        AbilityResolver::apply_end_of_turn(table.state, player);
        Self::complete_turn(table, player);
    }

    fn complete_turn(table: &mut Table<'_>, player: PlayerId) {
        table.state.check_end_trigger();
        table.state.player_mut(player).turn_completed = true;
        table.state.record(Some(player), GameEvent::TurnEnded);
        table.action_loop.turn_completed(&*table.state, player);
    }

    // === Ability ===

    fn use_ability(table: &mut Table<'_>, player: PlayerId) {
        let destroyed = table.negotiate(
            player,
            "ability",
            |agent, state| agent.use_ability(state, player),
            |state, command| match command {
                Some(command) => AbilityResolver::apply_ability(state, player, &command),
                None => Ok(None),
            },
        );

        if let Some(Some(district)) = destroyed {
            Self::offer_graveyard(table, player, district);
        }
    }

    /// Offer a district the Warlord destroyed to Graveyard owners in seat
    /// order. The first to accept takes it.
    pub fn offer_graveyard(table: &mut Table<'_>, destroyer: PlayerId, district: DistrictCard) {
        for candidate in Destruction::graveyard_candidates(table.state, destroyer) {
            let accepted = table.agents[candidate.index()].accept_graveyard(
                &*table.state,
                candidate,
                &district,
            );
            if !accepted {
                continue;
            }
            match Destruction::claim_graveyard(table.state, candidate, district.clone()) {
                Ok(()) => {
                    info!(
                        player = %candidate,
                        district = %district.name,
                        "district recovered from graveyard"
                    );
                    return;
                }
                Err(advisory) => table.agents[candidate.index()].on_rejected(&advisory),
            }
        }
    }

    // === Income ===

    fn take_income(table: &mut Table<'_>, player: PlayerId) {
        let choice = table.agents[player.index()].choose_income(&*table.state, player);

        if choice == IncomeChoice::Cards {
            if AbilityResolver::draw_income(table.state, player) > 0 {
                Self::keep_drawn(table, player);
                return;
            }
            debug!(%player, "district deck empty, taking gold");
        }
        AbilityResolver::take_gold(table.state, player);
    }

    fn keep_drawn(table: &mut Table<'_>, player: PlayerId) {
        if table.state.player(player).drawn.is_empty() {
            return;
        }

        let kept = table.negotiate(
            player,
            "card to keep",
            |agent, state| {
                let drawn: Vec<DistrictCard> = state.player(player).drawn.iter().cloned().collect();
                agent.choose_card_to_keep(state, player, &drawn)
            },
            |state, index| AbilityResolver::keep_drawn(state, player, index),
        );
        if kept.is_none() {
            let committed = AbilityResolver::keep_drawn(table.state, player, 0);
            debug_assert!(committed.is_ok(), "drawn cards pending");
        }
    }

    // === Build step ===

    fn build_step(table: &mut Table<'_>, player: PlayerId) {
        let mut rejections = 0;

        for _ in 0..table.max_actions_per_turn {
            let action = table.agents[player.index()].next_action(&*table.state, player);
            if action == TurnAction::EndTurn {
                return;
            }

            match Self::apply_action(table, player, action) {
                Ok(()) => rejections = 0,
                Err(advisory) => {
                    debug!(%player, ?action, %advisory, "action rejected");
                    table.agents[player.index()].on_rejected(&advisory);
                    rejections += 1;
                    if rejections > table.max_agent_retries {
                        Self::give_up(table, player, "build action");
                        return;
                    }
                }
            }
        }

        warn!(%player, limit = table.max_actions_per_turn, "action limit reached, ending turn");
    }

    fn give_up(table: &mut Table<'_>, player: PlayerId, decision: &str) {
        warn!(%player, decision, "agent out of retries, ending turn");
        let round = table.state.round.round;
        table.state.push_warning(RoundWarning::AgentFallback {
            round,
            player,
            decision: decision.to_string(),
        });
    }

    /// Apply one build-step action.
    pub fn apply_action(table: &mut Table<'_>, player: PlayerId, action: TurnAction) -> Outcome {
        match action {
            TurnAction::Build(index) => {
                let district = AbilityResolver::build(table.state, player, index)?;
                Self::after_build(table, player, &district);
                Ok(())
            }
            TurnAction::Laboratory(index) => {
                AbilityResolver::laboratory(table.state, player, index)
            }
            TurnAction::Smithy => AbilityResolver::smithy(table.state, player).map(|_| ()),
            TurnAction::Museum(index) => AbilityResolver::museum(table.state, player, index),
            TurnAction::Armory { target, index } => {
                Destruction::armory(table.state, player, target, index).map(|_| ())
            }
            TurnAction::EndTurn => Err(Advisory::TurnCompleted),
        }
    }

    /// On-build hooks, then the end trigger.
    fn after_build(table: &mut Table<'_>, player: PlayerId, district: &DistrictCard) {
        if district.is(names::BELL_TOWER)
            && table.agents[player.index()].activate_bell_tower(&*table.state, player)
        {
            table.state.activate_bell_tower();
        }

        if district.is(names::LIGHTHOUSE) && !table.state.districts.is_empty() {
            table.negotiate(
                player,
                "lighthouse card",
                |agent, state| {
                    let deck: Vec<DistrictCard> =
                        state.districts.peek_all().iter().cloned().collect();
                    agent.choose_lighthouse_card(state, player, &deck)
                },
                |state, choice| match choice {
                    Some(index) => {
                        AbilityResolver::take_from_deck(state, player, index).map(|_| ())
                    }
                    None => Ok(()),
                },
            );
        }

        table.agents[player.index()].on_district_built(&*table.state, player, district);
        table.state.check_end_trigger();
    }

    // === Round end ===

    /// Close the turn phase: score and end the game if the trigger fired,
    /// otherwise start the next round.
    pub fn finish_round(state: &mut GameState) {
        if state.round.end_triggered {
            Self::end_game(state);
        } else {
            state.round.round += 1;
            state.round.phase = Phase::Selection;
            state.round.active_slot = 0;
            debug!(round = state.round.round, "next round");
        }
    }

    /// Enter the end phase and score the game. Scores are computed once.
    pub fn end_game(state: &mut GameState) {
        state.round.phase = Phase::End;
        if state.scores.is_some() {
            return;
        }

        let scores = scoring::calculate_scores(state);
        let winner = scoring::determine_winner(state, &scores);
        for (player, score) in scores.iter() {
            info!(%player, total = score.total, "final score");
        }
        info!(winner = ?winner, "game over");

        state.scores = Some(scores);
        state.winner = winner;
        state.record(winner, GameEvent::GameOver { winner });
    }
}
