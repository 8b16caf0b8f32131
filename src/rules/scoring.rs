//! End-of-game scoring.
//!
//! ## Score
//!
//! - **Base**: sum of district costs in the city
//! - **Diversity**: 3 if all five colors are present. An eligible Haunted City
//!   (not built in the final round) counts as whichever color is missing,
//!   otherwise as purple
//! - **Completion**: 4 for the first player to finish, 2 for any other
//!   complete city
//! - **Extra**: Dragon Gate and University +2 each, Wishing Well +1 per other
//!   purple district, Imperial Treasury +1 per gold, Map Room +1 per hand
//!   card, Museum +1 per stored card
//!
//! ## Winner
//!
//! Highest total. Ties go to the higher character turn order held in the
//! final round.

use serde::{Deserialize, Serialize};

use crate::cards::names;
use crate::core::{GameState, PlayerId, PlayerMap};

/// Diversity bonus for all five colors.
pub const DIVERSITY_BONUS: u32 = 3;
/// Completion bonus for the first to finish.
pub const FIRST_COMPLETION_BONUS: u32 = 4;
/// Completion bonus for other complete cities.
pub const COMPLETION_BONUS: u32 = 2;

/// A player's final score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub base: u32,
    pub diversity_bonus: u32,
    pub completion_bonus: u32,
    pub extra_points: u32,
    pub total: u32,
}

impl ScoreResult {
    #[must_use]
    pub fn new(base: u32, diversity_bonus: u32, completion_bonus: u32, extra_points: u32) -> Self {
        Self {
            base,
            diversity_bonus,
            completion_bonus,
            extra_points,
            total: base + diversity_bonus + completion_bonus + extra_points,
        }
    }
}

/// Whether the city earns the diversity bonus.
#[must_use]
pub fn has_all_colors(state: &GameState, player: PlayerId) -> bool {
    let final_round = state.round.final_round;
    let mut present = [false; 5];
    let mut wildcard = false;

    for district in state.cities.city(player) {
        let flexible = district.is(names::HAUNTED_CITY)
            && (final_round.is_none() || district.built_round != final_round);
        if flexible && !wildcard {
            wildcard = true;
        } else {
            present[district.color as usize] = true;
        }
    }

    let missing = present.iter().filter(|&&p| !p).count();
    missing == 0 || (missing == 1 && wildcard)
}

/// Special-district points.
#[must_use]
pub fn extra_points(state: &GameState, player: PlayerId) -> u32 {
    let city = state.cities.city(player);
    let p = state.player(player);
    let mut points = 0;

    for (i, district) in city.iter().enumerate() {
        if district.is(names::DRAGON_GATE) || district.is(names::UNIVERSITY) {
            points += 2;
        } else if district.is(names::WISHING_WELL) {
            points += city
                .iter()
                .enumerate()
                .filter(|&(j, other)| j != i && other.is_purple())
                .count() as u32;
        } else if district.is(names::IMPERIAL_TREASURY) {
            points += p.gold;
        } else if district.is(names::MAP_ROOM) {
            points += p.hand.len() as u32;
        } else if district.is(names::MUSEUM) {
            points += p.museum_stored.len() as u32;
        }
    }

    points
}

/// Score one player.
#[must_use]
pub fn score_player(state: &GameState, player: PlayerId) -> ScoreResult {
    let base = state.cities.city(player).iter().map(|d| d.cost).sum();

    let diversity = if has_all_colors(state, player) { DIVERSITY_BONUS } else { 0 };

    let completion = if state.round.first_to_finish == Some(player) {
        FIRST_COMPLETION_BONUS
    } else if state.is_city_complete(player) {
        COMPLETION_BONUS
    } else {
        0
    };

    ScoreResult::new(base, diversity, completion, extra_points(state, player))
}

/// Score every player.
#[must_use]
pub fn calculate_scores(state: &GameState) -> PlayerMap<ScoreResult> {
    PlayerMap::new(state.player_count(), |p| score_player(state, p))
}

/// Highest total wins; ties go to the higher character turn order.
#[must_use]
pub fn determine_winner(state: &GameState, scores: &PlayerMap<ScoreResult>) -> Option<PlayerId> {
    scores
        .iter()
        .max_by_key(|(p, score)| {
            let order = state.player(*p).chosen.map_or(0, |c| c.turn_order());
            (score.total, order)
        })
        .map(|(p, _)| p)
}
