//! Queue-driven agent.
//!
//! `ScriptedAgent` plays whatever decisions have been queued on its
//! `ScriptHandle`. A UI pushes the human's choices; tests push a fixed script.
//! When the next queued decision does not answer the current question (or the
//! queue is empty) the agent falls back to a passive default: first
//! character, gold income, first card, no ability, end turn.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::cards::{Character, DistrictCard};
use crate::core::{AbilityCommand, Advisory, GameState, IncomeChoice, PlayerId, TurnAction};

use super::PlayerAgent;

/// One queued answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Character(Character),
    Income(IncomeChoice),
    Keep(usize),
    Ability(Option<AbilityCommand>),
    Action(TurnAction),
    Graveyard(bool),
    BellTower(bool),
    Lighthouse(Option<usize>),
}

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<Decision>,
    rejections: Vec<Advisory>,
    built: Vec<String>,
}

/// Shared handle to a scripted agent's queue.
#[derive(Clone, Debug, Default)]
pub struct ScriptHandle {
    inner: Rc<RefCell<Script>>,
}

impl ScriptHandle {
    /// Queue a decision.
    pub fn push(&self, decision: Decision) {
        self.inner.borrow_mut().queue.push_back(decision);
    }

    /// Queue several decisions in order.
    pub fn extend(&self, decisions: impl IntoIterator<Item = Decision>) {
        self.inner.borrow_mut().queue.extend(decisions);
    }

    /// Decisions not yet consumed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Every rejection reported to the agent so far.
    #[must_use]
    pub fn rejections(&self) -> Vec<Advisory> {
        self.inner.borrow().rejections.clone()
    }

    /// Names of the districts this agent has built, in order.
    #[must_use]
    pub fn built(&self) -> Vec<String> {
        self.inner.borrow().built.clone()
    }
}

/// Agent that replays queued decisions.
#[derive(Clone, Debug, Default)]
pub struct ScriptedAgent {
    script: ScriptHandle,
}

impl ScriptedAgent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Agent reading from an existing handle.
    #[must_use]
    pub fn with_handle(script: ScriptHandle) -> Self {
        Self { script }
    }

    #[must_use]
    pub fn handle(&self) -> ScriptHandle {
        self.script.clone()
    }

    /// Pop the next decision if `extract` accepts it.
    fn next<T>(&self, extract: impl FnOnce(&Decision) -> Option<T>) -> Option<T> {
        let mut script = self.script.inner.borrow_mut();
        let value = extract(script.queue.front()?)?;
        script.queue.pop_front();
        Some(value)
    }
}

impl PlayerAgent for ScriptedAgent {
    fn choose_character(
        &mut self,
        _state: &GameState,
        _me: PlayerId,
        available: &[Character],
    ) -> Character {
        self.next(|d| match d {
            Decision::Character(c) => Some(*c),
            _ => None,
        })
        .or_else(|| available.first().copied())
        .unwrap_or(Character::Assassin)
    }

    fn choose_income(&mut self, _state: &GameState, _me: PlayerId) -> IncomeChoice {
        self.next(|d| match d {
            Decision::Income(choice) => Some(*choice),
            _ => None,
        })
        .unwrap_or(IncomeChoice::Gold)
    }

    fn choose_card_to_keep(
        &mut self,
        _state: &GameState,
        _me: PlayerId,
        _drawn: &[DistrictCard],
    ) -> usize {
        self.next(|d| match d {
            Decision::Keep(index) => Some(*index),
            _ => None,
        })
        .unwrap_or(0)
    }

    fn use_ability(&mut self, _state: &GameState, _me: PlayerId) -> Option<AbilityCommand> {
        self.next(|d| match d {
            Decision::Ability(command) => Some(command.clone()),
            _ => None,
        })
        .flatten()
    }

    fn next_action(&mut self, _state: &GameState, _me: PlayerId) -> TurnAction {
        self.next(|d| match d {
            Decision::Action(action) => Some(*action),
            _ => None,
        })
        .unwrap_or(TurnAction::EndTurn)
    }

    fn accept_graveyard(
        &mut self,
        _state: &GameState,
        _me: PlayerId,
        _destroyed: &DistrictCard,
    ) -> bool {
        self.next(|d| match d {
            Decision::Graveyard(accept) => Some(*accept),
            _ => None,
        })
        .unwrap_or(false)
    }

    fn activate_bell_tower(&mut self, _state: &GameState, _me: PlayerId) -> bool {
        self.next(|d| match d {
            Decision::BellTower(activate) => Some(*activate),
            _ => None,
        })
        .unwrap_or(false)
    }

    fn choose_lighthouse_card(
        &mut self,
        _state: &GameState,
        _me: PlayerId,
        _deck: &[DistrictCard],
    ) -> Option<usize> {
        self.next(|d| match d {
            Decision::Lighthouse(index) => Some(*index),
            _ => None,
        })
        .flatten()
    }

    fn on_district_built(&mut self, _state: &GameState, _me: PlayerId, district: &DistrictCard) {
        self.script.inner.borrow_mut().built.push(district.name.clone());
    }

    fn on_rejected(&mut self, advisory: &Advisory) {
        self.script.inner.borrow_mut().rejections.push(advisory.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameBuilder;

    #[test]
    fn test_replays_in_order_and_falls_back() {
        let config = GameBuilder::new().build_config().unwrap();
        let state = GameState::new(&config);
        let me = PlayerId::new(0);

        let mut agent = ScriptedAgent::new();
        let handle = agent.handle();
        handle.extend([
            Decision::Income(IncomeChoice::Cards),
            Decision::Action(TurnAction::Build(2)),
        ]);

        assert_eq!(agent.next_action(&state, me), TurnAction::EndTurn);
        assert_eq!(handle.pending(), 2);
        assert_eq!(agent.choose_income(&state, me), IncomeChoice::Cards);
        assert_eq!(agent.next_action(&state, me), TurnAction::Build(2));
        assert_eq!(agent.choose_income(&state, me), IncomeChoice::Gold);
        assert_eq!(handle.pending(), 0);
    }

    #[test]
    fn test_records_rejections() {
        let mut agent = ScriptedAgent::new();
        agent.on_rejected(&Advisory::Keep);
        assert_eq!(agent.handle().rejections(), vec![Advisory::Keep]);
    }
}
