//! Card effects.
//!
//! - `AbilityResolver`: character abilities and passives, income, build rules,
//!   purple district actions
//! - `Destruction`: the Warlord and Armory destruction paths, Graveyard recovery
//!
//! Resolvers operate on `GameState` alone. Anything that needs a player's
//! decision (which card to keep, whether to use the Graveyard) is asked by
//! the turn engine first and passed in.

mod destruction;
mod resolver;

pub use destruction::Destruction;
pub use resolver::{
    AbilityResolver, ARCHITECT_BUILDS, ARCHITECT_DRAW, GOLD_INCOME, PARK_DRAW, SMITHY_COST,
    SMITHY_DRAW,
};
