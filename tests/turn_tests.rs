//! Turn phase tests.
//!
//! Each test seats scripted agents, hands out characters directly and runs
//! one turn phase through `TurnEngine`.

use citadels::agents::{
    ActionLoop, AutoAcknowledge, Decision, PlayerAgent, ScriptHandle, ScriptedAgent,
};
use citadels::cards::{names, Character, Color, DistrictCard};
use citadels::core::{
    AbilityCommand, Advisory, GameBuilder, GameEvent, GameState, IncomeChoice, Phase, PlayerId,
    RoundWarning, TurnAction,
};
use citadels::rules::{Table, TurnEngine};

fn p(i: u8) -> PlayerId {
    PlayerId::new(i)
}

/// Four seats holding the given characters, ready for the turn phase.
fn turn_state(chosen: [Character; 4]) -> GameState {
    let config = GameBuilder::new().seed(17).build_config().unwrap();
    let mut state = GameState::new(&config);
    state.round.phase = Phase::Turn;
    state.round.active_slot = 1;
    for (i, character) in chosen.into_iter().enumerate() {
        state.players[p(i as u8)].chosen = Some(character);
    }
    state
}

fn scripted() -> (Vec<Box<dyn PlayerAgent>>, Vec<ScriptHandle>) {
    let agents: Vec<ScriptedAgent> = (0..4).map(|_| ScriptedAgent::new()).collect();
    let handles = agents.iter().map(ScriptedAgent::handle).collect();
    let agents = agents.into_iter().map(|a| Box::new(a) as Box<dyn PlayerAgent>).collect();
    (agents, handles)
}

fn run(
    state: &mut GameState,
    agents: &mut [Box<dyn PlayerAgent>],
    action_loop: &mut dyn ActionLoop,
) {
    TurnEngine::run(&mut Table::new(state, agents, action_loop, 8, 64));
}

fn district(name: &str, color: Color, cost: u32) -> DistrictCard {
    DistrictCard::new(name, color, cost)
}

fn fill_city(state: &mut GameState, player: PlayerId, count: usize) {
    for i in 0..count {
        let mut card = district(&format!("Filler {}-{i}", player.0), Color::Red, 1);
        card.built_round = Some(1);
        state.cities.add(player, card);
    }
}

/// Records every null turn it is asked to acknowledge.
#[derive(Default)]
struct NullTurnLog {
    acknowledged: Vec<Character>,
    completed: Vec<PlayerId>,
}

impl ActionLoop for NullTurnLog {
    fn acknowledge_null_turn(&mut self, _state: &GameState, character: Character) {
        self.acknowledged.push(character);
    }

    fn turn_completed(&mut self, _state: &GameState, player: PlayerId) {
        self.completed.push(player);
    }
}

#[test]
fn test_null_turns_are_acknowledged_in_order() {
    let mut state = turn_state([
        Character::Thief,
        Character::King,
        Character::Merchant,
        Character::Warlord,
    ]);
    let (mut agents, _) = scripted();
    let mut log = NullTurnLog::default();

    run(&mut state, &mut agents, &mut log);

    assert_eq!(
        log.acknowledged,
        vec![Character::Assassin, Character::Magician, Character::Bishop, Character::Architect]
    );
    assert_eq!(log.completed, vec![p(0), p(1), p(2), p(3)]);
    assert_eq!(state.phase(), Phase::Selection);
    assert_eq!(state.round.round, 2);
}

#[test]
fn test_killed_player_skips_whole_turn() {
    let mut state = turn_state([
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::King,
    ]);
    let (mut agents, handles) = scripted();
    handles[0].push(Decision::Ability(Some(AbilityCommand::Kill(Character::Magician))));
    handles[2].extend([
        Decision::Income(IncomeChoice::Cards),
        Decision::Action(TurnAction::Build(0)),
    ]);
    let hand = state.player(p(2)).hand.clone();

    run(&mut state, &mut agents, &mut AutoAcknowledge);

    let victim = state.player(p(2));
    assert!(victim.killed);
    assert_eq!(victim.gold, 2);
    assert_eq!(victim.hand, hand);
    assert_eq!(state.cities.size(p(2)), 0);
    assert_eq!(handles[2].pending(), 2);
    assert!(state
        .history
        .iter()
        .any(|r| r.event == GameEvent::TurnSkipped { character: Character::Magician }));
}

#[test]
fn test_hospital_keeps_income_for_killed_player() {
    let mut state = turn_state([
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::King,
    ]);
    state.cities.add(p(2), district(names::HOSPITAL, Color::Purple, 6));
    let (mut agents, handles) = scripted();
    handles[0].push(Decision::Ability(Some(AbilityCommand::Kill(Character::Magician))));

    run(&mut state, &mut agents, &mut AutoAcknowledge);

    assert!(state.player(p(2)).killed);
    assert_eq!(state.player(p(2)).gold, 4);
}

#[test]
fn test_theft_happens_before_income() {
    let mut state = turn_state([
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::King,
    ]);
    state.players[p(3)].gold = 5;
    let (mut agents, handles) = scripted();
    handles[1].push(Decision::Ability(Some(AbilityCommand::Rob(Character::King))));

    run(&mut state, &mut agents, &mut AutoAcknowledge);

    assert_eq!(state.player(p(3)).gold, 2);
    assert_eq!(state.player(p(1)).gold, 2 + 2 + 5);
    assert!(state
        .history
        .iter()
        .any(|r| r.event == GameEvent::GoldStolen { from: p(3), amount: 5 }));
}

#[test]
fn test_card_income_keeps_one() {
    let mut state = turn_state([
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::Bishop,
    ]);
    let (mut agents, handles) = scripted();
    handles[3].extend([Decision::Income(IncomeChoice::Cards), Decision::Keep(1)]);
    let deck = state.districts.len();
    let second = state.districts.peek_all()[1].clone();

    run(&mut state, &mut agents, &mut AutoAcknowledge);

    let hand = &state.player(p(3)).hand;
    assert_eq!(hand.len(), 5);
    assert_eq!(hand.back(), Some(&second));
    assert_eq!(state.districts.len(), deck - 1);
    assert_eq!(state.player(p(3)).gold, 2);
}

#[test]
fn test_empty_deck_falls_back_to_gold() {
    let mut state = turn_state([
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::Bishop,
    ]);
    state.districts.replace(Vec::new());
    let (mut agents, handles) = scripted();
    handles[3].push(Decision::Income(IncomeChoice::Cards));

    run(&mut state, &mut agents, &mut AutoAcknowledge);

    assert_eq!(state.player(p(3)).gold, 4);
    assert_eq!(state.player(p(3)).hand.len(), 4);
}

#[test]
fn test_rejected_build_is_reported_and_retried() {
    let mut state = turn_state([
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::King,
    ]);
    state.players[p(3)].hand = vec![district("Manor", Color::Yellow, 3)].into_iter().collect();
    let (mut agents, handles) = scripted();
    handles[3].extend([
        Decision::Action(TurnAction::Build(4)),
        Decision::Action(TurnAction::Build(0)),
    ]);

    run(&mut state, &mut agents, &mut AutoAcknowledge);

    assert_eq!(handles[3].rejections(), vec![Advisory::InvalidHandIndex { index: 4, len: 1 }]);
    assert_eq!(handles[3].built(), vec!["Manor".to_string()]);
    assert_eq!(state.player(p(3)).gold, 1);
}

#[test]
fn test_architect_builds_three() {
    let mut state = turn_state([
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::Architect,
    ]);
    state.players[p(3)].gold = 10;
    state.players[p(3)].hand = vec![
        district("Temple", Color::Blue, 1),
        district("Tavern", Color::Green, 1),
        district("Watchtower", Color::Red, 1),
        district("Prison", Color::Red, 2),
    ]
    .into_iter()
    .collect();
    let (mut agents, handles) = scripted();
    handles[3].extend((0..4).map(|_| Decision::Action(TurnAction::Build(0))));

    run(&mut state, &mut agents, &mut AutoAcknowledge);

    assert_eq!(state.cities.size(p(3)), 3);
    assert_eq!(handles[3].rejections(), vec![Advisory::BuildLimitReached { limit: 3 }]);
}

#[test]
fn test_eighth_district_triggers_end_once() {
    let mut state = turn_state([
        Character::Assassin,
        Character::King,
        Character::Magician,
        Character::Warlord,
    ]);
    for seat in [p(1), p(3)] {
        fill_city(&mut state, seat, 7);
        state.players[seat].gold = 5;
        state.players[seat].hand = vec![district("Palace", Color::Yellow, 5)].into_iter().collect();
    }
    let (mut agents, handles) = scripted();
    handles[1].push(Decision::Action(TurnAction::Build(0)));
    handles[3].push(Decision::Action(TurnAction::Build(0)));

    run(&mut state, &mut agents, &mut AutoAcknowledge);

    assert!(state.round.end_triggered);
    assert_eq!(state.round.first_to_finish, Some(p(1)));
    assert_eq!(state.round.final_round, Some(1));
    assert_eq!(state.cities.size(p(3)), 8);
    assert_eq!(state.phase(), Phase::End);

    let scores = state.scores.as_ref().unwrap();
    assert_eq!(scores[p(1)].completion_bonus, 4);
    assert_eq!(scores[p(3)].completion_bonus, 2);
}

#[test]
fn test_bell_tower_lowers_threshold() {
    let mut state = turn_state([
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::King,
    ]);
    fill_city(&mut state, p(3), 6);
    state.players[p(3)].gold = 5;
    state.players[p(3)].hand =
        vec![district(names::BELL_TOWER, Color::Purple, 5)].into_iter().collect();
    let (mut agents, handles) = scripted();
    handles[3].extend([Decision::Action(TurnAction::Build(0)), Decision::BellTower(true)]);

    run(&mut state, &mut agents, &mut AutoAcknowledge);

    assert!(state.round.bell_tower_active);
    assert_eq!(state.round.first_to_finish, Some(p(3)));
    assert_eq!(state.phase(), Phase::End);
}

#[test]
fn test_graveyard_recovers_destroyed_district() {
    let mut state = turn_state([
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::Warlord,
    ]);
    state.cities.add(p(1), district("Tavern", Color::Green, 1));
    state.cities.add(p(2), district(names::GRAVEYARD, Color::Purple, 5));
    let (mut agents, handles) = scripted();
    handles[2].push(Decision::Graveyard(true));
    handles[3].push(Decision::Ability(Some(AbilityCommand::Destroy { target: p(1), index: 0 })));

    run(&mut state, &mut agents, &mut AutoAcknowledge);

    assert_eq!(state.cities.size(p(1)), 0);
    let claimant = state.player(p(2));
    assert!(claimant.hand.iter().any(|c| c.name == "Tavern"));
    assert_eq!(claimant.gold, 2 + 2 - 1);
}

#[test]
fn test_lighthouse_takes_card_from_deck() {
    let mut state = turn_state([
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::King,
    ]);
    state.players[p(3)].gold = 3;
    state.players[p(3)].hand =
        vec![district(names::LIGHTHOUSE, Color::Purple, 3)].into_iter().collect();
    let wanted = state.districts.peek_all()[5].clone();
    let deck = state.districts.len();
    let (mut agents, handles) = scripted();
    handles[3].extend([Decision::Action(TurnAction::Build(0)), Decision::Lighthouse(Some(5))]);

    run(&mut state, &mut agents, &mut AutoAcknowledge);

    assert_eq!(state.player(p(3)).hand.iter().cloned().collect::<Vec<_>>(), vec![wanted]);
    assert_eq!(state.districts.len(), deck - 1);
}

#[test]
fn test_out_of_retries_records_warning() {
    let mut state = turn_state([
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::King,
    ]);
    let (mut agents, handles) = scripted();
    handles[0].push(Decision::Ability(Some(AbilityCommand::Kill(Character::Assassin))));

    TurnEngine::run(&mut Table::new(&mut state, &mut agents, &mut AutoAcknowledge, 0, 64));

    assert_eq!(
        state.round.warnings,
        vec![RoundWarning::AgentFallback { round: 1, player: p(0), decision: "ability".into() }]
    );
    assert!(!state.player(p(0)).used_ability);
}

#[test]
fn test_resume_skips_completed_turns() {
    let mut state = turn_state([
        Character::Assassin,
        Character::Thief,
        Character::Magician,
        Character::King,
    ]);
    state.round.active_slot = 3;
    state.players[p(0)].turn_completed = true;
    state.players[p(1)].turn_completed = true;
    let (mut agents, _) = scripted();

    run(&mut state, &mut agents, &mut AutoAcknowledge);

    assert_eq!(state.player(p(0)).gold, 2);
    assert_eq!(state.player(p(1)).gold, 2);
    assert_eq!(state.player(p(2)).gold, 4);
    assert_eq!(state.player(p(3)).gold, 4);
}
