//! Player decisions and the event history.
//!
//! ## Decisions
//!
//! Agents answer the engine with small command values:
//! - `IncomeChoice`: take gold or draw cards
//! - `AbilityCommand`: an active character ability
//! - `TurnAction`: a build-step action (build, purple district action, end turn)
//!
//! Indices in commands refer to the acting player's hand or the target's city
//! as they are at the moment the command is submitted.
//!
//! ## History
//!
//! Every committed change is appended to the game history as an
//! `ActionRecord` so replays and UIs can show what happened.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::cards::Character;

/// Income taken at the start of the build step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeChoice {
    /// Take 2 gold.
    Gold,
    /// Draw 2 cards (3 with Observatory) and keep one (all with Library).
    Cards,
}

/// Active character abilities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityCommand {
    /// Assassin: kill the named character.
    Kill(Character),
    /// Thief: rob the named character.
    Rob(Character),
    /// Magician: exchange hands with another player.
    SwapHands(PlayerId),
    /// Magician: discard the listed hand cards and draw as many.
    Redraw(Vec<usize>),
    /// Warlord: pay to destroy a district in another city.
    Destroy { target: PlayerId, index: usize },
}

/// Actions available during the build step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    /// Build the hand card at this index.
    Build(usize),
    /// Laboratory: discard the hand card at this index for 1 gold.
    Laboratory(usize),
    /// Smithy: pay 2 gold to draw 3 cards.
    Smithy,
    /// Museum: place the hand card at this index under the Museum.
    Museum(usize),
    /// Armory: sacrifice the Armory to destroy a district for free.
    Armory { target: PlayerId, index: usize },
    /// Finish the turn.
    EndTurn,
}

/// Something that happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CrownAssigned { to: PlayerId },
    CrownPassed { from: PlayerId, to: PlayerId },
    ThroneRoomIncome,
    CharactersDealt { face_up: Vec<Character> },
    CharacterChosen,
    NullTurn { character: Character },
    TurnStarted { character: Character },
    TurnSkipped { character: Character },
    Killed { character: Character },
    Robbed { character: Character },
    GoldStolen { from: PlayerId, amount: u32 },
    GoldCollected { amount: u32 },
    CardsDrawn { count: usize },
    HandsSwapped { with: PlayerId },
    CardsRedrawn { count: usize },
    DistrictBuilt { name: String, cost: u32 },
    DistrictDestroyed { owner: PlayerId, name: String, paid: u32 },
    ArmorySacrificed,
    GraveyardClaimed { name: String },
    LaboratoryUsed,
    SmithyUsed,
    MuseumStored,
    BellTowerActivated,
    BellTowerDeactivated,
    LighthouseUsed,
    TurnEnded,
    EndTriggered,
    GameOver { winner: Option<PlayerId> },
}

/// A history entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Round the event happened in.
    pub round: u32,

    /// Player responsible, if any.
    pub player: Option<PlayerId>,

    pub event: GameEvent,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(round: u32, player: Option<PlayerId>, event: GameEvent) -> Self {
        Self { round, player, event }
    }
}
