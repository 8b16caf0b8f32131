//! Destruction through full turns: Warlord, Armory, Bishop and Keep.

use citadels::agents::{AutoAcknowledge, Decision, PlayerAgent, ScriptHandle, ScriptedAgent};
use citadels::cards::{names, Character, Color, DistrictCard};
use citadels::core::{AbilityCommand, Advisory, GameBuilder, GameState, Phase, PlayerId, TurnAction};
use citadels::rules::{Table, TurnEngine};

fn p(i: u8) -> PlayerId {
    PlayerId::new(i)
}

/// Seats hold Thief, Bishop, King and Warlord.
fn setup() -> (GameState, Vec<Box<dyn PlayerAgent>>, Vec<ScriptHandle>) {
    let config = GameBuilder::new().seed(33).build_config().unwrap();
    let mut state = GameState::new(&config);
    state.round.phase = Phase::Turn;
    state.round.active_slot = 1;
    let chosen = [Character::Thief, Character::Bishop, Character::King, Character::Warlord];
    for (i, character) in chosen.into_iter().enumerate() {
        state.players[p(i as u8)].chosen = Some(character);
    }

    let agents: Vec<ScriptedAgent> = (0..4).map(|_| ScriptedAgent::new()).collect();
    let handles = agents.iter().map(ScriptedAgent::handle).collect();
    let agents = agents.into_iter().map(|a| Box::new(a) as Box<dyn PlayerAgent>).collect();
    (state, agents, handles)
}

fn run(state: &mut GameState, agents: &mut [Box<dyn PlayerAgent>]) {
    TurnEngine::run(&mut Table::new(state, agents, &mut AutoAcknowledge, 8, 64));
}

fn build(state: &mut GameState, player: PlayerId, name: &str, color: Color, cost: u32) {
    let mut card = DistrictCard::new(name, color, cost);
    card.built_round = Some(1);
    state.cities.add(player, card);
}

#[test]
fn test_bishop_blocks_warlord_regardless_of_gold() {
    let (mut state, mut agents, handles) = setup();
    build(&mut state, p(1), "Temple", Color::Blue, 1);
    state.players[p(3)].gold = 50;
    handles[3].push(Decision::Ability(Some(AbilityCommand::Destroy { target: p(1), index: 0 })));

    run(&mut state, &mut agents);

    assert_eq!(handles[3].rejections(), vec![Advisory::BishopProtection { target: p(1) }]);
    assert_eq!(state.cities.size(p(1)), 1);
    assert_eq!(state.player(p(3)).gold, 52);
}

#[test]
fn test_keep_survives_both_paths() {
    let (mut state, mut agents, handles) = setup();
    build(&mut state, p(0), names::KEEP, Color::Purple, 3);
    build(&mut state, p(2), names::ARMORY, Color::Purple, 3);
    handles[2].push(Decision::Action(TurnAction::Armory { target: p(0), index: 0 }));
    handles[3].push(Decision::Ability(Some(AbilityCommand::Destroy { target: p(0), index: 0 })));

    run(&mut state, &mut agents);

    assert_eq!(handles[2].rejections(), vec![Advisory::Keep]);
    assert_eq!(handles[3].rejections(), vec![Advisory::Keep]);
    assert!(state.has_built(p(0), names::KEEP));
    assert!(state.has_built(p(2), names::ARMORY));
}

#[test]
fn test_armory_is_free_and_skips_graveyard() {
    let (mut state, mut agents, handles) = setup();
    build(&mut state, p(0), "Cathedral", Color::Blue, 5);
    build(&mut state, p(2), names::ARMORY, Color::Purple, 3);
    build(&mut state, p(3), names::GRAVEYARD, Color::Purple, 5);
    handles[2].push(Decision::Action(TurnAction::Armory { target: p(0), index: 0 }));
    handles[3].push(Decision::Graveyard(true));

    run(&mut state, &mut agents);

    assert_eq!(state.cities.size(p(0)), 0);
    assert!(!state.has_built(p(2), names::ARMORY));
    assert_eq!(state.player(p(2)).gold, 4);
    assert_eq!(handles[3].pending(), 1);
    assert!(state.player(p(3)).hand.iter().all(|c| c.name != "Cathedral"));
}

#[test]
fn test_warlord_destroys_and_pays() {
    let (mut state, mut agents, handles) = setup();
    build(&mut state, p(2), "Palace", Color::Yellow, 5);
    build(&mut state, p(3), "Fortress", Color::Red, 5);
    state.players[p(3)].gold = 3;
    handles[3].push(Decision::Ability(Some(AbilityCommand::Destroy { target: p(2), index: 0 })));

    run(&mut state, &mut agents);

    assert_eq!(state.cities.size(p(2)), 0);
    // 3 + 1 red district - 4 to destroy + 2 income
    assert_eq!(state.player(p(3)).gold, 2);
}
