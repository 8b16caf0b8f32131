//! Saving and restoring games.
//!
//! A snapshot is the whole `GameState`, as JSON (readable, for saves and
//! debugging) or bincode (compact). Restoring decodes and then checks the
//! decoded state before anything uses it; a snapshot that decodes but breaks
//! an invariant is rejected the same way as one that does not decode.

use crate::cards::Character;
use crate::core::{GameState, PersistError, Phase, PlayerId};

/// Serialize to JSON.
pub fn to_json(state: &GameState) -> Result<String, PersistError> {
    Ok(serde_json::to_string(state)?)
}

/// Restore from JSON, checking the table size.
pub fn from_json(json: &str, expected_players: usize) -> Result<GameState, PersistError> {
    let state: GameState = serde_json::from_str(json)?;
    validate(&state, expected_players)?;
    Ok(state)
}

/// Serialize to bincode.
pub fn to_bincode(state: &GameState) -> Result<Vec<u8>, PersistError> {
    Ok(bincode::serialize(state)?)
}

/// Restore from bincode, checking the table size.
pub fn from_bincode(bytes: &[u8], expected_players: usize) -> Result<GameState, PersistError> {
    let state: GameState = bincode::deserialize(bytes)?;
    validate(&state, expected_players)?;
    Ok(state)
}

/// Check a decoded state is one the engine could have produced.
pub fn validate(state: &GameState, expected_players: usize) -> Result<(), PersistError> {
    let found = state.players.player_count();
    if found != expected_players {
        return Err(PersistError::PlayerCount { expected: expected_players, found });
    }
    if state.cities.player_count() != found {
        return Err(PersistError::Invalid(format!(
            "{} cities for {found} players",
            state.cities.player_count()
        )));
    }

    let in_range = |p: PlayerId| p.index() < found;
    let round = &state.round;
    if !in_range(round.crown_holder) {
        let holder = round.crown_holder;
        return Err(PersistError::Invalid(format!("crown holder {holder} out of range")));
    }
    if round.first_to_finish.is_some_and(|p| !in_range(p)) {
        return Err(PersistError::Invalid("first finisher out of range".into()));
    }
    if round.active_slot > 8 {
        let slot = round.active_slot;
        return Err(PersistError::Invalid(format!("character slot {slot} out of range")));
    }
    if round.round == 0 {
        return Err(PersistError::Invalid("round 0".into()));
    }
    let trigger = [
        round.end_triggered,
        round.final_round.is_some(),
        round.first_to_finish.is_some(),
    ];
    if trigger.contains(&true) && trigger.contains(&false) {
        return Err(PersistError::Invalid("end trigger only partly recorded".into()));
    }

    validate_cities(state)?;

    let mut seen = [false; 9];
    let mut mark = |character: Character| -> Result<(), PersistError> {
        let slot = &mut seen[character.turn_order() as usize];
        if *slot {
            return Err(PersistError::Invalid(format!("{character} appears more than once")));
        }
        *slot = true;
        Ok(())
    };

    for (player, p) in state.players.iter() {
        if p.robbed_by.is_some_and(|t| !in_range(t)) {
            return Err(PersistError::Invalid(format!("{player} robbed by an unknown player")));
        }
        if let Some(character) = p.chosen {
            mark(character)?;
        }
    }
    for &character in round.face_down.iter().chain(&round.face_up).chain(&round.pool) {
        mark(character)?;
    }

    // Once selection is over every seat holds a character and the eight are
    // all accounted for. The face-down card is only absent when the last
    // picker took it, which keeps the count at eight.
    if round.phase != Phase::Selection {
        if let Some((player, _)) = state.players.iter().find(|(_, p)| p.chosen.is_none()) {
            return Err(PersistError::Invalid(format!(
                "{player} holds no character during the {:?} phase",
                round.phase
            )));
        }
        if let Some(missing) = Character::ALL.iter().find(|c| !seen[c.turn_order() as usize]) {
            return Err(PersistError::Invalid(format!("{missing} is missing from the round")));
        }
    }

    Ok(())
}

/// No name three times, at most one name twice.
fn validate_cities(state: &GameState) -> Result<(), PersistError> {
    for (player, city) in state.cities.iter() {
        let mut duplicated: Option<&str> = None;
        for (i, district) in city.iter().enumerate() {
            let copies = city.iter().filter(|d| d.is(&district.name)).count();
            if copies > 2 {
                return Err(PersistError::Invalid(format!(
                    "{player} has {copies} copies of {}",
                    district.name
                )));
            }
            let first = city.iter().position(|d| d.is(&district.name)) == Some(i);
            if copies == 2 && first {
                if let Some(other) = duplicated {
                    return Err(PersistError::Invalid(format!(
                        "{player} has both {other} and {} twice",
                        district.name
                    )));
                }
                duplicated = Some(&district.name);
            }
        }
    }
    Ok(())
}
