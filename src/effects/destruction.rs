//! District destruction.
//!
//! Two paths remove a district from another player's city:
//!
//! - **Warlord**: the Warlord's ability, paid in gold. The destroyed district
//!   may then be recovered by a Graveyard owner.
//! - **Armory**: the destroyer sacrifices their own Armory and destroys a
//!   district for free. No Graveyard recovery.
//!
//! Both share the same target rules: not your own city, not a player
//! protected by a living Bishop, not a complete city, not the Keep.

use tracing::{debug, info};

use crate::cards::{names, Character, DistrictCard};
use crate::core::{Advisory, GameEvent, GameState, Outcome, PlayerId};

use super::resolver::AbilityResolver;

/// Destruction rules.
pub struct Destruction;

impl Destruction {
    /// Whether a living Bishop shields this player.
    #[must_use]
    pub fn is_protected(state: &GameState, target: PlayerId) -> bool {
        let p = state.player(target);
        p.chosen == Some(Character::Bishop) && !p.killed
    }

    /// Check the target rules shared by both paths.
    pub fn check_target(
        state: &GameState,
        destroyer: PlayerId,
        target: PlayerId,
        index: usize,
    ) -> Outcome {
        if !state.players.contains(target) {
            return Err(Advisory::UnknownPlayer(target));
        }
        if target == destroyer {
            return Err(Advisory::SelfTarget);
        }
        if Self::is_protected(state, target) {
            return Err(Advisory::BishopProtection { target });
        }
        if state.is_city_complete(target) {
            return Err(Advisory::CityComplete { player: target });
        }
        let city = state.cities.city(target);
        let district = city.get(index).ok_or(Advisory::InvalidCityIndex {
            index,
            len: city.len(),
        })?;
        if district.is(names::KEEP) {
            return Err(Advisory::Keep);
        }
        Ok(())
    }

    /// Gold the Warlord pays to destroy the district at `index`: one less
    /// than its cost, one more if the owner has a Great Wall protecting it.
    #[must_use]
    pub fn warlord_cost(state: &GameState, target: PlayerId, index: usize) -> Option<u32> {
        let district = state.cities.city(target).get(index)?;
        let mut cost = district.cost.saturating_sub(1);
        if state.has_built(target, names::GREAT_WALL) && !district.is(names::GREAT_WALL) {
            cost += 1;
        }
        Some(cost)
    }

    /// Warlord: pay and destroy. Returns the destroyed district.
    pub fn warlord(
        state: &mut GameState,
        destroyer: PlayerId,
        target: PlayerId,
        index: usize,
    ) -> Outcome<DistrictCard> {
        AbilityResolver::require_ability(state, destroyer, Character::Warlord)?;
        Self::check_target(state, destroyer, target, index)?;

        let cost = Self::warlord_cost(state, target, index).unwrap_or_default();
        let available = state.player(destroyer).gold;
        if available < cost {
            return Err(Advisory::InsufficientGold { needed: cost, available });
        }

        let p = state.player_mut(destroyer);
        p.gold -= cost;
        p.used_ability = true;
        Ok(Self::remove_district(state, destroyer, target, index, cost))
    }

    /// Armory: sacrifice your Armory to destroy a district for free.
    pub fn armory(
        state: &mut GameState,
        destroyer: PlayerId,
        target: PlayerId,
        index: usize,
    ) -> Outcome<DistrictCard> {
        AbilityResolver::require_active(state, destroyer)?;
        if !state.has_built(destroyer, names::ARMORY) {
            return Err(Advisory::DistrictMissing(names::ARMORY));
        }
        Self::check_target(state, destroyer, target, index)?;

        state.cities.remove_named(destroyer, names::ARMORY);
        info!(player = %destroyer, "armory sacrificed");
        state.record(Some(destroyer), GameEvent::ArmorySacrificed);
        Ok(Self::remove_district(state, destroyer, target, index, 0))
    }

    fn remove_district(
        state: &mut GameState,
        destroyer: PlayerId,
        target: PlayerId,
        index: usize,
        paid: u32,
    ) -> DistrictCard {
        let mut district = state
            .cities
            .remove_at(target, index)
            .unwrap_or_else(|| unreachable!("district index checked before removal"));
        district.built_round = None;

        if district.is(names::MUSEUM) {
            state.player_mut(target).museum_stored.clear();
        }
        if district.is(names::BELL_TOWER) {
            state.deactivate_bell_tower();
        }

        info!(
            by = %destroyer,
            owner = %target,
            district = %district.name,
            paid,
            "district destroyed"
        );
        state.record(
            Some(destroyer),
            GameEvent::DistrictDestroyed { owner: target, name: district.name.clone(), paid },
        );
        district
    }

    /// Players who may recover a district the Warlord destroyed, in seat
    /// order: Graveyard built, at least 1 gold, not the destroyer.
    #[must_use]
    pub fn graveyard_candidates(state: &GameState, destroyer: PlayerId) -> Vec<PlayerId> {
        state
            .player_ids()
            .filter(|&p| p != destroyer)
            .filter(|&p| state.has_built(p, names::GRAVEYARD) && state.player(p).gold >= 1)
            .collect()
    }

    /// Pay 1 gold to take a destroyed district into hand.
    pub fn claim_graveyard(
        state: &mut GameState,
        claimant: PlayerId,
        district: DistrictCard,
    ) -> Outcome {
        if !state.has_built(claimant, names::GRAVEYARD) {
            return Err(Advisory::DistrictMissing(names::GRAVEYARD));
        }
        let available = state.player(claimant).gold;
        if available < 1 {
            return Err(Advisory::InsufficientGold { needed: 1, available });
        }

        debug!(player = %claimant, district = %district.name, "graveyard claim");
        let name = district.name.clone();
        let p = state.player_mut(claimant);
        p.gold -= 1;
        p.hand.push_back(DistrictCard { built_round: None, ..district });
        state.record(Some(claimant), GameEvent::GraveyardClaimed { name });
        Ok(())
    }
}
