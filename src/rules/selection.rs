//! Character selection.
//!
//! ## Round start
//!
//! 1. The crown moves to whoever held the King last round. Throne Room owners
//!    collect 1 gold when it moves (from round 2 on).
//! 2. All eight characters are shuffled. One is set aside face down, and
//!    depending on the table size up to two more are discarded face up.
//! 3. The King may never be discarded face up. If it is, every discard goes
//!    back, the pool is reshuffled and the whole discard step is dealt again.
//!
//! ## Picks
//!
//! Starting with the crown holder and going clockwise, each player takes one
//! character from the pool. The last player may also take the face-down card.

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::cards::{names, Character};
use crate::core::{Advisory, GameEvent, GameState, Outcome, Phase, PlayerId, RoundWarning};

use super::table::Table;

/// Character selection rules.
pub struct SelectionProtocol;

impl SelectionProtocol {
    /// Face-up discards for a table size.
    #[must_use]
    pub fn face_up_count(player_count: usize) -> usize {
        match player_count {
            0..=4 => 2,
            5 => 1,
            _ => 0,
        }
    }

    /// Move the crown to last round's King and reset everyone for the new
    /// round. Returns the crown holder.
    pub fn resolve_crown(state: &mut GameState) -> PlayerId {
        let previous = state.round.crown_holder;
        let round = state.round.round;
        state.round.clear_characters();

        match state.holder_of(Character::King) {
            Some(king) if king != previous => {
                state.round.crown_holder = king;
                info!(from = %previous, to = %king, "crown passed");
                state.record(Some(king), GameEvent::CrownPassed { from: previous, to: king });

                if round > 1 {
                    let owners: Vec<PlayerId> = state
                        .player_ids()
                        .filter(|&p| state.has_built(p, names::THRONE_ROOM))
                        .collect();
                    for owner in owners {
                        state.player_mut(owner).gold += 1;
                        state.record(Some(owner), GameEvent::ThroneRoomIncome);
                    }
                }
            }
            Some(_) => {}
            None => state.push_warning(RoundWarning::NoKingChosen { round }),
        }

        for (_, player) in state.players.iter_mut() {
            player.reset_for_round();
        }
        state.round.crown_holder
    }

    /// Shuffle the eight characters and make the discards.
    ///
    /// Redeals until the King is not among the face-up discards.
    pub fn deal(state: &mut GameState) {
        let face_up = Self::face_up_count(state.player_count());
        let mut pool: SmallVec<[Character; 8]> = Character::ALL.iter().copied().collect();

        let (face_down, face_up) = loop {
            state.rng.shuffle(&mut pool);
            let face_down = pool.remove(0);
            let discarded: SmallVec<[Character; 2]> = pool.drain(..face_up).collect();

            if !discarded.contains(&Character::King) {
                break (face_down, discarded);
            }
            debug!("king dealt face up, redealing");
            pool.push(face_down);
            pool.extend(discarded);
        };

        info!(face_up = ?face_up, "characters dealt");
        state.record(None, GameEvent::CharactersDealt { face_up: face_up.to_vec() });
        state.round.face_down = Some(face_down);
        state.round.face_up = face_up;
        state.round.pool = pool;
    }

    /// Seats in pick order, starting with the crown holder.
    #[must_use]
    pub fn pick_order(state: &GameState) -> Vec<PlayerId> {
        PlayerId::clockwise_from(state.round.crown_holder, state.player_count()).collect()
    }

    /// Characters a player may take.
    #[must_use]
    pub fn available_for(state: &GameState, is_last: bool) -> SmallVec<[Character; 8]> {
        let mut available = state.round.pool.clone();
        if is_last {
            available.extend(state.round.face_down);
        }
        available
    }

    /// Give `character` to `player`.
    pub fn commit_pick(
        state: &mut GameState,
        player: PlayerId,
        character: Character,
        is_last: bool,
    ) -> Outcome {
        if !state.players.contains(player) {
            return Err(Advisory::UnknownPlayer(player));
        }

        if let Some(pos) = state.round.pool.iter().position(|&c| c == character) {
            state.round.pool.remove(pos);
        } else if is_last && state.round.face_down == Some(character) {
            state.round.face_down = None;
        } else {
            return Err(Advisory::CharacterUnavailable(character));
        }

        state.player_mut(player).chosen = Some(character);
        debug!(%player, %character, "character chosen");
        state.record(Some(player), GameEvent::CharacterChosen);
        Ok(())
    }

    /// Run a whole selection phase and move to the turn phase.
    pub fn run(table: &mut Table<'_>) {
        debug_assert_eq!(table.state.phase(), Phase::Selection);

        let crown = Self::resolve_crown(table.state);
        Self::deal(table.state);
        info!(round = table.state.round.round, crown = %crown, "selection started");

        let order = Self::pick_order(table.state);
        let last = order.len() - 1;
        for (i, player) in order.into_iter().enumerate() {
            let is_last = i == last;
            let available = Self::available_for(table.state, is_last);

            let picked = table.negotiate(
                player,
                "character",
                |agent, state| agent.choose_character(state, player, &available),
                |state, character| Self::commit_pick(state, player, character, is_last),
            );
            if picked.is_none() {
                let committed = Self::commit_pick(table.state, player, available[0], is_last);
                debug_assert!(committed.is_ok(), "first available character must be pickable");
            }
        }

        table.state.round.phase = Phase::Turn;
        table.state.round.active_slot = 1;
    }
}
