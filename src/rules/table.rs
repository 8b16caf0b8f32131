//! Borrowed view of a running game: state plus the seats' agents.
//!
//! `Table` is what the selection and turn logic work on. It owns nothing;
//! `Game` lends it its fields for the length of one phase.

use tracing::{debug, warn};

use crate::agents::{ActionLoop, PlayerAgent};
use crate::core::{GameState, Outcome, PlayerId, RoundWarning};

/// State, agents and limits for one phase.
pub struct Table<'a> {
    pub state: &'a mut GameState,
    pub agents: &'a mut [Box<dyn PlayerAgent>],
    pub action_loop: &'a mut dyn ActionLoop,
    pub max_agent_retries: u32,
    pub max_actions_per_turn: u32,
}

impl<'a> Table<'a> {
    #[must_use]
    pub fn new(
        state: &'a mut GameState,
        agents: &'a mut [Box<dyn PlayerAgent>],
        action_loop: &'a mut dyn ActionLoop,
        max_agent_retries: u32,
        max_actions_per_turn: u32,
    ) -> Self {
        Self { state, agents, action_loop, max_agent_retries, max_actions_per_turn }
    }

    /// Ask `player` for a decision and apply it, asking again after each
    /// rejection. Gives up after `max_agent_retries` rejections, records an
    /// `AgentFallback` warning and returns `None`; the caller then applies
    /// its fallback.
    pub fn negotiate<T, R>(
        &mut self,
        player: PlayerId,
        decision: &'static str,
        mut ask: impl FnMut(&mut dyn PlayerAgent, &GameState) -> T,
        mut apply: impl FnMut(&mut GameState, T) -> Outcome<R>,
    ) -> Option<R> {
        for _ in 0..=self.max_agent_retries {
            let agent = self.agents[player.index()].as_mut();
            let choice = ask(agent, &*self.state);
            match apply(&mut *self.state, choice) {
                Ok(result) => return Some(result),
                Err(advisory) => {
                    debug!(%player, decision, %advisory, "decision rejected");
                    self.agents[player.index()].on_rejected(&advisory);
                }
            }
        }

        warn!(
            %player,
            decision,
            retries = self.max_agent_retries,
            "agent out of retries, using fallback"
        );
        let round = self.state.round.round;
        self.state.push_warning(RoundWarning::AgentFallback {
            round,
            player,
            decision: decision.to_string(),
        });
        None
    }
}
