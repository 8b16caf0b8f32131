//! Character selection tests.

use proptest::prelude::*;

use citadels::agents::{AutoAcknowledge, HeuristicAgent, PlayerAgent, ScriptedAgent};
use citadels::cards::{Character, DistrictCard};
use citadels::core::{
    AbilityCommand, GameBuilder, GameRng, GameState, IncomeChoice, Phase, PlayerId, RoundWarning,
    TurnAction,
};
use citadels::rules::{SelectionProtocol, Table};

fn state(players: usize, seed: u64) -> GameState {
    let config = GameBuilder::new().player_count(players).seed(seed).build_config().unwrap();
    GameState::new(&config)
}

fn heuristic_agents(players: usize, seed: u64) -> Vec<Box<dyn PlayerAgent>> {
    (0..players as u64)
        .map(|i| {
            Box::new(HeuristicAgent::new(GameRng::new(seed ^ (i + 1)))) as Box<dyn PlayerAgent>
        })
        .collect()
}

fn select(state: &mut GameState, agents: &mut [Box<dyn PlayerAgent>]) {
    SelectionProtocol::run(&mut Table::new(state, agents, &mut AutoAcknowledge, 8, 64));
}

/// Always takes the last character offered.
struct TakeLast;

impl PlayerAgent for TakeLast {
    fn choose_character(
        &mut self,
        _state: &GameState,
        _me: PlayerId,
        available: &[Character],
    ) -> Character {
        available[available.len() - 1]
    }

    fn choose_income(&mut self, _state: &GameState, _me: PlayerId) -> IncomeChoice {
        IncomeChoice::Gold
    }

    fn choose_card_to_keep(
        &mut self,
        _state: &GameState,
        _me: PlayerId,
        _drawn: &[DistrictCard],
    ) -> usize {
        0
    }

    fn use_ability(&mut self, _state: &GameState, _me: PlayerId) -> Option<AbilityCommand> {
        None
    }

    fn next_action(&mut self, _state: &GameState, _me: PlayerId) -> TurnAction {
        TurnAction::EndTurn
    }

    fn accept_graveyard(
        &mut self,
        _state: &GameState,
        _me: PlayerId,
        _destroyed: &DistrictCard,
    ) -> bool {
        false
    }

    fn activate_bell_tower(&mut self, _state: &GameState, _me: PlayerId) -> bool {
        false
    }

    fn choose_lighthouse_card(
        &mut self,
        _state: &GameState,
        _me: PlayerId,
        _deck: &[DistrictCard],
    ) -> Option<usize> {
        None
    }
}

#[test]
fn test_round_one_records_missing_king() {
    let mut state = state(4, 12);
    let crown = state.round.crown_holder;
    let mut agents = heuristic_agents(4, 12);

    select(&mut state, &mut agents);

    assert_eq!(state.round.crown_holder, crown);
    assert!(state.round.warnings.contains(&RoundWarning::NoKingChosen { round: 1 }));
    assert_eq!(state.phase(), Phase::Turn);
    assert_eq!(state.round.active_slot, 1);
}

#[test]
fn test_last_picker_can_take_face_down() {
    let mut state = state(6, 4);
    let mut agents: Vec<Box<dyn PlayerAgent>> =
        (0..6).map(|_| Box::new(TakeLast) as Box<dyn PlayerAgent>).collect();

    select(&mut state, &mut agents);

    let last = SelectionProtocol::pick_order(&state)[5];
    assert_eq!(state.round.face_down, None);
    assert!(state.round.face_up.is_empty());
    assert!(state.player(last).chosen.is_some());
    assert_eq!(state.round.pool.len(), 2);
}

#[test]
fn test_empty_script_takes_first_available() {
    let mut state = state(4, 9);
    let mut agents: Vec<Box<dyn PlayerAgent>> = (0..4)
        .map(|_| Box::new(ScriptedAgent::new()) as Box<dyn PlayerAgent>)
        .collect();

    select(&mut state, &mut agents);

    assert!(state.players.values().all(|p| p.chosen.is_some()));
    assert!(state.round.warnings.iter().all(|w| matches!(w, RoundWarning::NoKingChosen { .. })));
}

fn characters_accounted_for(state: &GameState) -> Vec<Character> {
    let mut all: Vec<Character> = state.players.values().filter_map(|p| p.chosen).collect();
    all.extend(state.round.face_down);
    all.extend(state.round.face_up.iter().copied());
    all.extend(state.round.pool.iter().copied());
    all.sort();
    all
}

proptest! {
    #[test]
    fn prop_selection_partitions_characters(players in 4usize..=7, seed in any::<u64>()) {
        let mut state = state(players, seed);
        let mut agents = heuristic_agents(players, seed);

        select(&mut state, &mut agents);

        prop_assert_eq!(characters_accounted_for(&state), Character::ALL.to_vec());
        prop_assert!(!state.round.face_up.contains(&Character::King));
        prop_assert_eq!(state.round.face_up.len(), SelectionProtocol::face_up_count(players));
        prop_assert!(state.players.values().all(|p| p.chosen.is_some()));
    }

    #[test]
    fn prop_deal_never_discards_king_face_up(seed in any::<u64>()) {
        let mut state = state(4, seed);
        SelectionProtocol::deal(&mut state);

        prop_assert!(!state.round.face_up.contains(&Character::King));
        prop_assert_eq!(characters_accounted_for(&state), Character::ALL.to_vec());
    }
}
