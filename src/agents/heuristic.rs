//! Rule-of-thumb computer player.
//!
//! ## Characters
//!
//! Each available character gets a score from the seat's situation:
//! - small hand: Magician, Architect
//! - large hand: Architect, Warlord
//! - low gold: Thief, Merchant; high gold: Assassin, Thief, Architect, Warlord
//! - behind on districts: Assassin, Thief, Warlord; close to finishing: Bishop
//! - one point per built district of the character's color
//!
//! Ties go to the later character.
//!
//! ## Targets
//!
//! Assassin and Thief targets are drawn at random with fixed weights, shifted
//! toward cheap characters early and strong ones late. Characters discarded
//! face up are never named.

use crate::cards::{names, Character, DistrictCard};
use crate::core::{AbilityCommand, GameRng, GameState, IncomeChoice, PlayerId, TurnAction};
use crate::effects::{AbilityResolver, Destruction};

use super::PlayerAgent;

/// Assassin target weights by turn order.
const ASSASSIN_WEIGHTS: [(Character, u32); 7] = [
    (Character::Thief, 3),
    (Character::Magician, 3),
    (Character::King, 3),
    (Character::Bishop, 2),
    (Character::Merchant, 4),
    (Character::Architect, 5),
    (Character::Warlord, 4),
];

/// Thief target weights by turn order.
const THIEF_WEIGHTS: [(Character, u32); 6] = [
    (Character::Magician, 2),
    (Character::King, 5),
    (Character::Bishop, 3),
    (Character::Merchant, 6),
    (Character::Architect, 4),
    (Character::Warlord, 5),
];

/// Gold at or above which a seat counts as rich.
const RICH: u32 = 6;

/// Heuristic computer player.
#[derive(Clone, Debug)]
pub struct HeuristicAgent {
    rng: GameRng,
}

impl HeuristicAgent {
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }

    fn opponents(state: &GameState, me: PlayerId) -> impl Iterator<Item = PlayerId> + '_ {
        state.player_ids().filter(move |&p| p != me)
    }

    // === Characters ===

    fn character_score(state: &GameState, me: PlayerId, character: Character) -> i32 {
        use Character::*;

        let p = state.player(me);
        let hand = p.hand.len();
        let city = state.cities.size(me);
        let threshold = state.completion_threshold();
        let leader = Self::opponents(state, me).map(|o| state.cities.size(o)).max().unwrap_or(0);
        let trailer = Self::opponents(state, me).map(|o| state.cities.size(o)).min().unwrap_or(0);
        let biggest_hand = Self::opponents(state, me)
            .map(|o| state.player(o).hand.len())
            .max()
            .unwrap_or(0);

        let mut score = 0;
        if matches!(character, Assassin | Thief | King) {
            score += 1;
        }

        if hand <= 1 && matches!(character, Magician | Architect) {
            score += 3;
        }
        if hand >= 5 && matches!(character, Architect | Warlord) {
            score += 2;
        }
        if character == Magician && biggest_hand >= hand + 3 {
            score += 3;
        }

        if p.gold <= 1 && matches!(character, Thief | Merchant) {
            score += 2;
        }
        if p.gold >= RICH && matches!(character, Assassin | Thief | Architect | Warlord) {
            score += 2;
        }

        if city <= trailer && matches!(character, Thief | Warlord) {
            score += 1;
        }
        if city + 1 >= threshold && character == Architect {
            score -= 2;
        }
        if city + 2 >= threshold && character == Bishop {
            score += 3;
        }
        if leader >= city + 2 && matches!(character, Assassin | Thief | Warlord) {
            score += 2;
        }
        if city >= 6 && matches!(character, Assassin | King) {
            score += 2;
        }

        if let Some(color) = character.bonus_color() {
            score += state.cities.count_color(me, color) as i32;
        }
        score
    }

    fn weighted_target(
        &mut self,
        state: &GameState,
        weights: &[(Character, u32)],
        boosted: &[Character],
    ) -> Option<Character> {
        let candidates: Vec<(Character, u32)> = weights
            .iter()
            .filter(|(c, _)| {
                !state.face_up_discards().contains(c) && state.round.killed != Some(*c)
            })
            .map(|&(c, w)| (c, if boosted.contains(&c) { w + 1 } else { w }))
            .collect();
        let weights: Vec<u32> = candidates.iter().map(|&(_, w)| w).collect();
        self.rng.choose_weighted(&weights).map(|i| candidates[i].0)
    }

    fn assassin_target(&mut self, state: &GameState) -> Option<Character> {
        let boosted: &[Character] = match state.round.round {
            0..=3 => &[Character::Magician, Character::King],
            4..=6 => &[],
            _ => &[Character::Architect, Character::Warlord],
        };
        self.weighted_target(state, &ASSASSIN_WEIGHTS, boosted)
    }

    fn thief_target(&mut self, state: &GameState) -> Option<Character> {
        let boosted: &[Character] = match state.round.round {
            0..=3 => &[Character::Magician, Character::King],
            4..=6 => &[],
            _ => &[Character::Merchant, Character::Architect],
        };
        self.weighted_target(state, &THIEF_WEIGHTS, boosted)
    }

    // === Abilities ===

    fn magician_command(state: &GameState, me: PlayerId) -> Option<AbilityCommand> {
        let hand = state.player(me).hand.len();
        let richest = Self::opponents(state, me).max_by_key(|&o| state.player(o).hand.len())?;
        if state.player(richest).hand.len() > hand + 1 {
            return Some(AbilityCommand::SwapHands(richest));
        }

        let junk: Vec<usize> = state
            .player(me)
            .hand
            .iter()
            .enumerate()
            .filter(|(_, card)| state.has_built(me, &card.name))
            .map(|(i, _)| i)
            .collect();
        (!junk.is_empty()).then_some(AbilityCommand::Redraw(junk))
    }

    /// Cheapest affordable district of the opponent with the biggest city.
    fn warlord_command(state: &GameState, me: PlayerId) -> Option<AbilityCommand> {
        let gold = state.player(me).gold;
        let target = Self::opponents(state, me)
            .filter(|&o| !Destruction::is_protected(state, o) && !state.is_city_complete(o))
            .max_by_key(|&o| state.cities.size(o))?;

        let (index, _) = (0..state.cities.size(target))
            .filter(|&i| Destruction::check_target(state, me, target, i).is_ok())
            .filter_map(|i| Destruction::warlord_cost(state, target, i).map(|cost| (i, cost)))
            .filter(|&(_, cost)| cost <= gold)
            .min_by_key(|&(_, cost)| cost)?;
        Some(AbilityCommand::Destroy { target, index })
    }

    // === Building ===

    fn district_score(state: &GameState, me: PlayerId, card: &DistrictCard) -> i32 {
        let mut score = card.cost as i32;
        if card.is_purple() {
            score += 1;
        }
        if state.cities.count_color(me, card.color) == 0 {
            score += 2;
            if state.cities.size(me) >= 4 {
                score += 2;
            }
        }
        if card.is(names::DRAGON_GATE) || card.is(names::UNIVERSITY) {
            score += 3;
        }
        if state.has_built(me, &card.name) {
            score -= 10;
        }
        score
    }

    fn best_build(state: &GameState, me: PlayerId) -> Option<usize> {
        let hand = &state.player(me).hand;
        (0..hand.len())
            .filter(|&i| AbilityResolver::check_build(state, me, i).is_ok())
            .max_by_key(|&i| Self::district_score(state, me, &hand[i]))
    }

    fn junk_card(state: &GameState, me: PlayerId) -> Option<usize> {
        state.player(me).hand.iter().position(|card| state.has_built(me, &card.name))
    }

    fn worst_card(state: &GameState, me: PlayerId) -> Option<usize> {
        let hand = &state.player(me).hand;
        (0..hand.len()).min_by_key(|&i| Self::district_score(state, me, &hand[i]))
    }
}

impl PlayerAgent for HeuristicAgent {
    fn choose_character(
        &mut self,
        state: &GameState,
        me: PlayerId,
        available: &[Character],
    ) -> Character {
        available
            .iter()
            .copied()
            .max_by_key(|&c| (Self::character_score(state, me, c), c.turn_order()))
            .unwrap_or(Character::Assassin)
    }

    fn choose_income(&mut self, state: &GameState, me: PlayerId) -> IncomeChoice {
        let p = state.player(me);
        if state.districts.is_empty() {
            return IncomeChoice::Gold;
        }
        if p.hand.is_empty() {
            return IncomeChoice::Cards;
        }

        let mut gold_score = p.hand.len() as i32 * 2;
        let mut cards_score = p.gold as i32;
        match p.chosen {
            Some(Character::Architect | Character::Warlord) => gold_score += 3,
            Some(Character::Thief | Character::Merchant) => cards_score += 3,
            _ => {}
        }
        if AbilityResolver::keeps_all_drawn(state, me) {
            cards_score += 6;
        }

        if gold_score >= cards_score {
            IncomeChoice::Gold
        } else {
            IncomeChoice::Cards
        }
    }

    fn choose_card_to_keep(
        &mut self,
        state: &GameState,
        me: PlayerId,
        drawn: &[DistrictCard],
    ) -> usize {
        (0..drawn.len())
            .max_by_key(|&i| Self::district_score(state, me, &drawn[i]))
            .unwrap_or(0)
    }

    fn use_ability(&mut self, state: &GameState, me: PlayerId) -> Option<AbilityCommand> {
        match state.player(me).chosen? {
            Character::Assassin => self.assassin_target(state).map(AbilityCommand::Kill),
            Character::Thief => self.thief_target(state).map(AbilityCommand::Rob),
            Character::Magician => Self::magician_command(state, me),
            Character::Warlord => Self::warlord_command(state, me),
            _ => None,
        }
    }

    fn next_action(&mut self, state: &GameState, me: PlayerId) -> TurnAction {
        let p = state.player(me);

        if state.has_built(me, names::LABORATORY) && !p.used_laboratory {
            if let Some(index) = Self::junk_card(state, me) {
                return TurnAction::Laboratory(index);
            }
        }
        if let Some(index) = Self::best_build(state, me) {
            return TurnAction::Build(index);
        }
        if state.has_built(me, names::SMITHY)
            && !p.used_smithy
            && p.gold >= 4
            && p.hand.len() <= 1
        {
            return TurnAction::Smithy;
        }
        if state.has_built(me, names::MUSEUM) && !p.used_museum && p.hand.len() >= 4 {
            if let Some(index) = Self::worst_card(state, me) {
                return TurnAction::Museum(index);
            }
        }
        TurnAction::EndTurn
    }

    fn accept_graveyard(
        &mut self,
        _state: &GameState,
        _me: PlayerId,
        _destroyed: &DistrictCard,
    ) -> bool {
        true
    }

    fn activate_bell_tower(&mut self, _state: &GameState, _me: PlayerId) -> bool {
        true
    }

    fn choose_lighthouse_card(
        &mut self,
        state: &GameState,
        me: PlayerId,
        deck: &[DistrictCard],
    ) -> Option<usize> {
        (0..deck.len())
            .filter(|&i| !state.has_built(me, &deck[i].name))
            .max_by_key(|&i| (deck[i].cost, deck[i].is_purple()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Color;
    use crate::core::{GameBuilder, Phase};

    fn p(i: u8) -> PlayerId {
        PlayerId::new(i)
    }

    fn state() -> GameState {
        let config = GameBuilder::new().seed(21).build_config().unwrap();
        let mut state = GameState::new(&config);
        state.round.phase = Phase::Turn;
        state
    }

    fn agent() -> HeuristicAgent {
        HeuristicAgent::new(GameRng::new(1))
    }

    #[test]
    fn test_picks_magician_with_empty_hand() {
        let mut state = state();
        state.players[p(0)].hand.clear();
        let offered = [Character::King, Character::Magician, Character::Bishop];
        let choice = agent().choose_character(&state, p(0), &offered);
        assert_eq!(choice, Character::Magician);
    }

    #[test]
    fn test_assassin_never_names_face_up() {
        let mut state = state();
        state.round.face_up = [Character::Architect, Character::Merchant].into_iter().collect();
        state.players[p(0)].chosen = Some(Character::Assassin);

        let mut agent = agent();
        for _ in 0..50 {
            match agent.use_ability(&state, p(0)) {
                Some(AbilityCommand::Kill(target)) => {
                    assert!(target != Character::Architect && target != Character::Merchant);
                    assert_ne!(target, Character::Assassin);
                }
                other => panic!("unexpected command {other:?}"),
            }
        }
    }

    #[test]
    fn test_thief_skips_killed_character() {
        let mut state = state();
        state.round.killed = Some(Character::Merchant);
        state.players[p(1)].chosen = Some(Character::Thief);

        let mut agent = agent();
        for _ in 0..50 {
            if let Some(AbilityCommand::Rob(target)) = agent.use_ability(&state, p(1)) {
                assert_ne!(target, Character::Merchant);
            }
        }
    }

    #[test]
    fn test_warlord_targets_cheapest_in_leading_city() {
        let mut state = state();
        state.players[p(0)].chosen = Some(Character::Warlord);
        state.players[p(0)].gold = 3;
        state.cities.add(p(2), DistrictCard::new("Palace", Color::Yellow, 5));
        state.cities.add(p(2), DistrictCard::new("Tavern", Color::Green, 1));
        state.cities.add(p(2), DistrictCard::new(names::KEEP, Color::Purple, 3));

        assert_eq!(
            agent().use_ability(&state, p(0)),
            Some(AbilityCommand::Destroy { target: p(2), index: 1 })
        );
    }

    #[test]
    fn test_builds_best_affordable() {
        let mut state = state();
        state.players[p(3)].chosen = Some(Character::King);
        state.players[p(3)].gold = 3;
        state.players[p(3)].hand = vec![
            DistrictCard::new("Tavern", Color::Green, 1),
            DistrictCard::new("Manor", Color::Yellow, 3),
            DistrictCard::new("Palace", Color::Yellow, 5),
        ]
        .into_iter()
        .collect();

        assert_eq!(agent().next_action(&state, p(3)), TurnAction::Build(1));
    }

    #[test]
    fn test_empty_hand_takes_cards() {
        let mut state = state();
        state.players[p(0)].hand.clear();
        assert_eq!(agent().choose_income(&state, p(0)), IncomeChoice::Cards);
    }

    #[test]
    fn test_lighthouse_takes_most_expensive() {
        let state = state();
        let deck = vec![
            DistrictCard::new("Tavern", Color::Green, 1),
            DistrictCard::new("Cathedral", Color::Blue, 5),
            DistrictCard::new("Temple", Color::Blue, 1),
        ];
        assert_eq!(agent().choose_lighthouse_card(&state, p(0), &deck), Some(1));
    }
}
