//! Character effects, district passives and build rules.
//!
//! Every operation either commits its whole effect and returns `Ok`, or
//! returns an `Advisory` and leaves the state untouched. Validation always
//! happens before the first write.

use tracing::debug;

use crate::cards::{names, Character, DistrictCard};
use crate::core::{AbilityCommand, Advisory, GameEvent, GameState, Outcome, PlayerId};

use super::destruction::Destruction;

/// Gold taken by the gold income option.
pub const GOLD_INCOME: u32 = 2;

/// Extra cards the Architect draws.
pub const ARCHITECT_DRAW: usize = 2;

/// Builds allowed per turn as Architect.
pub const ARCHITECT_BUILDS: u32 = 3;

/// Cards drawn by the Smithy, and its price.
pub const SMITHY_DRAW: usize = 3;
pub const SMITHY_COST: u32 = 2;

/// Cards drawn by the Park.
pub const PARK_DRAW: usize = 2;

/// Resolves character and district effects on game state.
pub struct AbilityResolver;

impl AbilityResolver {
    // === Guards ===

    /// The player may still act this turn. Returns their character.
    pub fn require_active(state: &GameState, player: PlayerId) -> Outcome<Character> {
        let p = state
            .players
            .try_get(player)
            .ok_or(Advisory::UnknownPlayer(player))?;
        let character = p.chosen.ok_or(Advisory::NoCharacter)?;
        if p.turn_completed {
            return Err(Advisory::TurnCompleted);
        }
        if p.killed {
            return Err(Advisory::Killed(character));
        }
        Ok(character)
    }

    /// The player holds `character` and has not used its ability this turn.
    pub fn require_ability(state: &GameState, player: PlayerId, character: Character) -> Outcome {
        if Self::require_active(state, player)? != character {
            return Err(Advisory::WrongCharacter(character));
        }
        if state.player(player).used_ability {
            return Err(Advisory::AlreadyUsed(character.name()));
        }
        Ok(())
    }

    fn require_district(state: &GameState, player: PlayerId, name: &'static str) -> Outcome {
        if state.has_built(player, name) {
            Ok(())
        } else {
            Err(Advisory::DistrictMissing(name))
        }
    }

    fn require_hand_index(state: &GameState, player: PlayerId, index: usize) -> Outcome {
        let len = state.player(player).hand.len();
        if index < len {
            Ok(())
        } else {
            Err(Advisory::InvalidHandIndex { index, len })
        }
    }

    fn require_target(state: &GameState, player: PlayerId, target: PlayerId) -> Outcome {
        if !state.players.contains(target) {
            return Err(Advisory::UnknownPlayer(target));
        }
        if target == player {
            return Err(Advisory::SelfTarget);
        }
        Ok(())
    }

    // === Passives ===

    /// Gold the player's character collects for districts of its color.
    ///
    /// School of Magic counts once toward any bonus color.
    #[must_use]
    pub fn color_bonus(state: &GameState, player: PlayerId) -> u32 {
        let Some(color) = state.player(player).chosen.and_then(Character::bonus_color) else {
            return 0;
        };
        let mut bonus = state.cities.count_color(player, color) as u32;
        if state.has_built(player, names::SCHOOL_OF_MAGIC) {
            bonus += 1;
        }
        bonus
    }

    /// Apply the character's automatic effects at the start of its turn:
    /// color gold, the Merchant's extra gold, and the Architect's cards and
    /// build limit. Returns the gold gained.
    pub fn apply_character_passive(state: &mut GameState, player: PlayerId) -> u32 {
        let Some(character) = state.player(player).chosen else {
            return 0;
        };

        let mut gold = Self::color_bonus(state, player);
        if character == Character::Merchant {
            gold += 1;
        }
        if gold > 0 {
            state.player_mut(player).gold += gold;
            debug!(%player, gold, "character gold bonus");
            state.record(Some(player), GameEvent::GoldCollected { amount: gold });
        }

        if character == Character::Architect {
            state.player_mut(player).max_builds_per_turn = ARCHITECT_BUILDS;
            let drawn = state.districts.draw_many(ARCHITECT_DRAW);
            let count = drawn.len();
            state.player_mut(player).hand.extend(drawn);
            state.record(Some(player), GameEvent::CardsDrawn { count });
        }

        gold
    }

    // === Character abilities ===

    /// Dispatch an active ability. A Warlord destruction returns the
    /// destroyed district so the caller can offer it to Graveyard owners.
    pub fn apply_ability(
        state: &mut GameState,
        player: PlayerId,
        command: &AbilityCommand,
    ) -> Outcome<Option<DistrictCard>> {
        match command {
            AbilityCommand::Kill(target) => Self::kill(state, player, *target).map(|_| None),
            AbilityCommand::Rob(target) => Self::rob(state, player, *target).map(|_| None),
            AbilityCommand::SwapHands(other) => {
                Self::swap_hands(state, player, *other).map(|_| None)
            }
            AbilityCommand::Redraw(indices) => Self::redraw(state, player, indices).map(|_| None),
            AbilityCommand::Destroy { target, index } => {
                Destruction::warlord(state, player, *target, *index).map(Some)
            }
        }
    }

    /// Assassin: mark a character killed for the round.
    ///
    /// Naming a character nobody holds is allowed and has no effect.
    pub fn kill(state: &mut GameState, player: PlayerId, target: Character) -> Outcome {
        Self::require_ability(state, player, Character::Assassin)?;
        if target == Character::Assassin {
            return Err(Advisory::InvalidTarget(target));
        }

        state.player_mut(player).used_ability = true;
        Self::mark_killed(state, target);
        state.record(Some(player), GameEvent::Killed { character: target });
        Ok(())
    }

    /// Record `target` as killed and flag its holder, if any.
    pub fn mark_killed(state: &mut GameState, target: Character) {
        state.round.killed = Some(target);
        if let Some(victim) = state.holder_of(target) {
            state.player_mut(victim).killed = true;
            debug!(player = %victim, character = %target, "killed");
        }
    }

    /// Thief: mark a character to be robbed when its turn starts.
    pub fn rob(state: &mut GameState, player: PlayerId, target: Character) -> Outcome {
        Self::require_ability(state, player, Character::Thief)?;
        if matches!(target, Character::Assassin | Character::Thief)
            || state.round.killed == Some(target)
        {
            return Err(Advisory::InvalidTarget(target));
        }

        state.player_mut(player).used_ability = true;
        state.round.robbed = Some(target);
        if let Some(victim) = state.holder_of(target) {
            let victim = state.player_mut(victim);
            victim.stolen = true;
            victim.robbed_by = Some(player);
        }
        state.record(Some(player), GameEvent::Robbed { character: target });
        Ok(())
    }

    /// Hand all of a robbed player's gold to the Thief. Called at the start
    /// of the victim's turn. Returns the Thief and the amount moved.
    pub fn resolve_theft(state: &mut GameState, player: PlayerId) -> Option<(PlayerId, u32)> {
        let victim = state.player(player);
        if !victim.stolen {
            return None;
        }
        let thief = victim.robbed_by;

        let victim = state.player_mut(player);
        victim.stolen = false;
        victim.robbed_by = None;
        let thief = thief.filter(|&t| t != player)?;

        let (victim, robber) = state.players.pair_mut(player, thief);
        let amount = std::mem::take(&mut victim.gold);
        robber.gold += amount;

        debug!(from = %player, to = %thief, amount, "gold stolen");
        state.record(Some(thief), GameEvent::GoldStolen { from: player, amount });
        Some((thief, amount))
    }

    /// Magician: exchange hands with another player.
    pub fn swap_hands(state: &mut GameState, player: PlayerId, other: PlayerId) -> Outcome {
        Self::require_ability(state, player, Character::Magician)?;
        Self::require_target(state, player, other)?;

        let (a, b) = state.players.pair_mut(player, other);
        std::mem::swap(&mut a.hand, &mut b.hand);
        a.used_ability = true;

        state.record(Some(player), GameEvent::HandsSwapped { with: other });
        Ok(())
    }

    /// Magician: discard the listed hand cards and draw as many. Discards go
    /// under the deck after drawing. Returns the number of cards drawn.
    pub fn redraw(state: &mut GameState, player: PlayerId, indices: &[usize]) -> Outcome<usize> {
        Self::require_ability(state, player, Character::Magician)?;
        for (i, &index) in indices.iter().enumerate() {
            Self::require_hand_index(state, player, index)?;
            if indices[..i].contains(&index) {
                return Err(Advisory::RepeatedIndex(index));
            }
        }

        let mut order = indices.to_vec();
        order.sort_unstable_by(|a, b| b.cmp(a));

        let p = state.player_mut(player);
        p.used_ability = true;
        let discarded: Vec<DistrictCard> = order.iter().map(|&i| p.hand.remove(i)).collect();

        let drawn = state.districts.draw_many(discarded.len());
        let count = drawn.len();
        state.districts.add_to_bottom(discarded);
        state.player_mut(player).hand.extend(drawn);

        state.record(Some(player), GameEvent::CardsRedrawn { count });
        Ok(count)
    }

    // === Income ===

    /// Take the gold income.
    pub fn take_gold(state: &mut GameState, player: PlayerId) {
        state.player_mut(player).gold += GOLD_INCOME;
        state.record(Some(player), GameEvent::GoldCollected { amount: GOLD_INCOME });
    }

    /// Cards drawn by the card income option.
    #[must_use]
    pub fn income_draw_count(state: &GameState, player: PlayerId) -> usize {
        if state.has_built(player, names::OBSERVATORY) {
            3
        } else {
            2
        }
    }

    /// Whether all drawn income cards are kept.
    #[must_use]
    pub fn keeps_all_drawn(state: &GameState, player: PlayerId) -> bool {
        state.has_built(player, names::LIBRARY)
    }

    /// Draw the card income. With Library the cards go straight to hand,
    /// otherwise they wait in `PlayerState::drawn` for `keep_drawn`.
    /// Returns the number of cards drawn.
    pub fn draw_income(state: &mut GameState, player: PlayerId) -> usize {
        let wanted = Self::income_draw_count(state, player);
        let drawn = state.districts.draw_many(wanted);
        let count = drawn.len();
        if count == 0 {
            return 0;
        }

        if Self::keeps_all_drawn(state, player) {
            state.player_mut(player).hand.extend(drawn);
            state.record(Some(player), GameEvent::CardsDrawn { count });
        } else {
            state.player_mut(player).drawn = drawn.into_iter().collect();
        }
        count
    }

    /// Keep one pending drawn card, put the rest under the deck.
    pub fn keep_drawn(state: &mut GameState, player: PlayerId, keep: usize) -> Outcome {
        let len = state.player(player).drawn.len();
        if keep >= len {
            return Err(Advisory::InvalidHandIndex { index: keep, len });
        }

        let p = state.player_mut(player);
        let mut drawn = std::mem::take(&mut p.drawn);
        let kept = drawn.remove(keep);
        p.hand.push_back(kept);
        state.districts.add_to_bottom(drawn);
        state.record(Some(player), GameEvent::CardsDrawn { count: 1 });
        Ok(())
    }

    // === Building ===

    /// Gold needed to build `card`. Factory makes other purple districts one
    /// gold cheaper.
    #[must_use]
    pub fn build_cost(state: &GameState, player: PlayerId, card: &DistrictCard) -> u32 {
        if card.is_purple() && !card.is(names::FACTORY) && state.has_built(player, names::FACTORY) {
            card.cost.saturating_sub(1)
        } else {
            card.cost
        }
    }

    /// Whether a district with this name may join the player's city.
    ///
    /// A name may appear twice only with Quarry built and no other duplicate
    /// in the city, never three times.
    pub fn check_duplicate(state: &GameState, player: PlayerId, card: &DistrictCard) -> Outcome {
        let reject = || Advisory::DuplicateDistrict { name: card.name.clone() };
        match state.cities.count_named(player, &card.name) {
            0 => Ok(()),
            1 if state.has_built(player, names::QUARRY) && !state.cities.has_duplicate(player) => {
                Ok(())
            }
            _ => Err(reject()),
        }
    }

    /// Validate building the hand card at `index`. Returns the cost.
    pub fn check_build(state: &GameState, player: PlayerId, index: usize) -> Outcome<u32> {
        Self::require_active(state, player)?;
        let p = state.player(player);
        if p.builds_this_turn >= p.max_builds_per_turn {
            return Err(Advisory::BuildLimitReached { limit: p.max_builds_per_turn });
        }
        Self::require_hand_index(state, player, index)?;
        if state.is_city_complete(player) {
            return Err(Advisory::CityComplete { player });
        }

        let card = &p.hand[index];
        Self::check_duplicate(state, player, card)?;
        let cost = Self::build_cost(state, player, card);
        if p.gold < cost {
            return Err(Advisory::InsufficientGold { needed: cost, available: p.gold });
        }
        Ok(cost)
    }

    /// Build the hand card at `index`. Returns the built district.
    pub fn build(state: &mut GameState, player: PlayerId, index: usize) -> Outcome<DistrictCard> {
        let cost = Self::check_build(state, player, index)?;
        let round = state.round.round;

        let p = state.player_mut(player);
        let mut card = p.hand.remove(index);
        p.gold -= cost;
        p.builds_this_turn += 1;
        card.built_round = Some(round);

        debug!(%player, district = %card.name, cost, "built");
        state.cities.add(player, card.clone());
        state.record(
            Some(player),
            GameEvent::DistrictBuilt { name: card.name.clone(), cost },
        );
        Ok(card)
    }

    // === Purple district actions ===

    /// Laboratory: discard a hand card for 1 gold. The card goes under the deck.
    pub fn laboratory(state: &mut GameState, player: PlayerId, index: usize) -> Outcome {
        Self::require_active(state, player)?;
        Self::require_district(state, player, names::LABORATORY)?;
        if state.player(player).used_laboratory {
            return Err(Advisory::AlreadyUsed(names::LABORATORY));
        }
        Self::require_hand_index(state, player, index)?;

        let p = state.player_mut(player);
        let card = p.hand.remove(index);
        p.gold += 1;
        p.used_laboratory = true;
        state.districts.add_to_bottom([card]);
        state.record(Some(player), GameEvent::LaboratoryUsed);
        Ok(())
    }

    /// Smithy: pay 2 gold, draw 3 cards. Returns the number drawn.
    pub fn smithy(state: &mut GameState, player: PlayerId) -> Outcome<usize> {
        Self::require_active(state, player)?;
        Self::require_district(state, player, names::SMITHY)?;
        let p = state.player(player);
        if p.used_smithy {
            return Err(Advisory::AlreadyUsed(names::SMITHY));
        }
        if p.gold < SMITHY_COST {
            return Err(Advisory::InsufficientGold { needed: SMITHY_COST, available: p.gold });
        }

        let drawn = state.districts.draw_many(SMITHY_DRAW);
        let count = drawn.len();
        let p = state.player_mut(player);
        p.gold -= SMITHY_COST;
        p.used_smithy = true;
        p.hand.extend(drawn);
        state.record(Some(player), GameEvent::SmithyUsed);
        Ok(count)
    }

    /// Museum: place a hand card under the Museum.
    pub fn museum(state: &mut GameState, player: PlayerId, index: usize) -> Outcome {
        Self::require_active(state, player)?;
        Self::require_district(state, player, names::MUSEUM)?;
        if state.player(player).used_museum {
            return Err(Advisory::AlreadyUsed(names::MUSEUM));
        }
        Self::require_hand_index(state, player, index)?;

        let p = state.player_mut(player);
        let card = p.hand.remove(index);
        p.museum_stored.push_back(card);
        p.used_museum = true;
        state.record(Some(player), GameEvent::MuseumStored);
        Ok(())
    }

    /// Lighthouse: take any card from the deck, then reshuffle it.
    pub fn take_from_deck(
        state: &mut GameState,
        player: PlayerId,
        index: usize,
    ) -> Outcome<DistrictCard> {
        let len = state.districts.len();
        let card = state
            .districts
            .remove_at(index)
            .ok_or(Advisory::InvalidDeckIndex { index, len })?;

        state.player_mut(player).hand.push_back(card.clone());
        let GameState { districts, rng, .. } = &mut *state;
        districts.shuffle(rng);
        state.record(Some(player), GameEvent::LighthouseUsed);
        Ok(card)
    }

    // === End of turn ===

    /// Poor House and Park, applied when a living player ends their turn.
    pub fn apply_end_of_turn(state: &mut GameState, player: PlayerId) {
        if state.player(player).killed {
            return;
        }

        if state.has_built(player, names::POOR_HOUSE) && state.player(player).gold == 0 {
            state.player_mut(player).gold += 1;
            state.record(Some(player), GameEvent::GoldCollected { amount: 1 });
        }

        if state.has_built(player, names::PARK) && state.player(player).hand.is_empty() {
            let drawn = state.districts.draw_many(PARK_DRAW);
            let count = drawn.len();
            state.player_mut(player).hand.extend(drawn);
            state.record(Some(player), GameEvent::CardsDrawn { count });
        }
    }
}
