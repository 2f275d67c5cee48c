//! Authoritative combatant records.
//!
//! Every query and mutation on an unknown id returns a sentinel (`None`,
//! `false`, `0`) instead of an error. Registration is the only fail-fast path.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::{CombatantId, CombatantSpec, Combatant, Controller, Position, TeamId};
use crate::error::InvalidUnit;

/// Combatant health, team, position and alive state.
///
/// The registry never announces deaths. Callers that care (the simulation)
/// compare alive sets before and after a mutation and relay the difference.
#[derive(Clone, Debug)]
pub struct UnitRegistry {
    units: BTreeMap<CombatantId, Combatant>,
    hp_cap: u32,
}

impl UnitRegistry {
    pub fn new(hp_cap: u32) -> Self {
        Self {
            units: BTreeMap::new(),
            hp_cap,
        }
    }

    pub fn hp_cap(&self) -> u32 {
        self.hp_cap
    }

    /// Registers a bare combatant at the origin with default range.
    pub fn register(
        &mut self,
        id: impl Into<CombatantId>,
        team: impl Into<TeamId>,
        hp: i64,
    ) -> Result<(), InvalidUnit> {
        self.register_spec(&CombatantSpec::new(id, team, hp))
    }

    /// Registers a combatant from scenario data.
    ///
    /// Fails when the id or team is empty, hp is not positive, or the id is
    /// already taken. Starting hp may exceed the heal cap.
    pub fn register_spec(&mut self, spec: &CombatantSpec) -> Result<(), InvalidUnit> {
        let result = self.validate(spec);
        if let Err(err) = &result {
            warn!(id = %spec.id, error = %err, "rejected combatant registration");
            return result;
        }

        let hp = u32::try_from(spec.hp).unwrap_or(u32::MAX);
        self.units.insert(
            spec.id.clone(),
            Combatant {
                id: spec.id.clone(),
                team: spec.team.clone(),
                hp,
                position: spec.position,
                attack_range: spec.attack_range,
                feigned_dead: false,
                controller: spec.controller.unwrap_or_default(),
            },
        );
        debug!(id = %spec.id, team = %spec.team, hp, "registered combatant");
        Ok(())
    }

    fn validate(&self, spec: &CombatantSpec) -> Result<(), InvalidUnit> {
        if spec.id.is_empty() {
            return Err(InvalidUnit::EmptyId);
        }
        if spec.team.is_empty() {
            return Err(InvalidUnit::EmptyTeam(spec.id.clone()));
        }
        if spec.hp <= 0 {
            return Err(InvalidUnit::NonPositiveHp {
                id: spec.id.clone(),
                hp: spec.hp,
            });
        }
        if self.units.contains_key(&spec.id) {
            return Err(InvalidUnit::Duplicate(spec.id.clone()));
        }
        Ok(())
    }

    pub fn get(&self, id: &CombatantId) -> Option<&Combatant> {
        self.units.get(id)
    }

    pub fn contains(&self, id: &CombatantId) -> bool {
        self.units.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// All records, dead ones included, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Combatant> + '_ {
        self.units.values()
    }

    /// Current hp, 0 for unknown ids.
    pub fn hp(&self, id: &CombatantId) -> u32 {
        self.units.get(id).map_or(0, |unit| unit.hp)
    }

    pub fn controller(&self, id: &CombatantId) -> Option<Controller> {
        self.units.get(id).map(|unit| unit.controller)
    }

    pub fn set_position(&mut self, id: &CombatantId, position: Position) -> bool {
        match self.units.get_mut(id) {
            Some(unit) => {
                unit.position = position;
                true
            }
            None => false,
        }
    }

    /// Reduces hp, flooring at zero. Returns false for unknown ids.
    pub fn damage(&mut self, id: &CombatantId, amount: u32) -> bool {
        let Some(unit) = self.units.get_mut(id) else {
            return false;
        };
        unit.hp = unit.hp.saturating_sub(amount);
        debug!(id = %id, amount, hp = unit.hp, "damaged");
        true
    }

    /// Restores hp up to the cap. Healing a combatant at 0 hp revives it.
    ///
    /// A combatant registered above the cap keeps its hp but never heals
    /// past `max(cap, current)`.
    pub fn heal(&mut self, id: &CombatantId, amount: u32) -> bool {
        let Some(unit) = self.units.get_mut(id) else {
            return false;
        };
        let ceiling = self.hp_cap.max(unit.hp);
        unit.hp = unit.hp.saturating_add(amount).min(ceiling);
        debug!(id = %id, amount, hp = unit.hp, "healed");
        true
    }

    pub fn mark_feigned_dead(&mut self, id: &CombatantId) -> bool {
        self.set_feigned(id, true)
    }

    pub fn unmark_feigned_dead(&mut self, id: &CombatantId) -> bool {
        self.set_feigned(id, false)
    }

    fn set_feigned(&mut self, id: &CombatantId, feigned: bool) -> bool {
        match self.units.get_mut(id) {
            Some(unit) => {
                unit.feigned_dead = feigned;
                true
            }
            None => false,
        }
    }

    pub fn is_alive(&self, id: &CombatantId) -> bool {
        self.units.get(id).is_some_and(Combatant::is_alive)
    }

    pub fn is_effectively_alive(&self, id: &CombatantId) -> bool {
        self.units.get(id).is_some_and(Combatant::is_effectively_alive)
    }

    pub fn is_targetable(&self, id: &CombatantId) -> bool {
        self.units.get(id).is_some_and(Combatant::is_targetable)
    }

    pub fn is_feigned_dead(&self, id: &CombatantId) -> bool {
        self.units.get(id).is_some_and(|unit| unit.feigned_dead)
    }

    pub fn any_alive(&self, team: &TeamId) -> bool {
        self.on_team(team).any(Combatant::is_alive)
    }

    pub fn any_effectively_alive(&self, team: &TeamId) -> bool {
        self.on_team(team).any(Combatant::is_effectively_alive)
    }

    pub fn alive_count(&self, team: &TeamId) -> u32 {
        self.on_team(team).filter(|unit| unit.is_alive()).count() as u32
    }

    /// Ids on `team`, dead ones included, in id order.
    pub fn ids_by_team(&self, team: &TeamId) -> Vec<CombatantId> {
        self.on_team(team).map(|unit| unit.id.clone()).collect()
    }

    /// Distinct teams in sorted order.
    pub fn teams(&self) -> Vec<TeamId> {
        let mut teams: Vec<TeamId> = self.units.values().map(|unit| unit.team.clone()).collect();
        teams.sort();
        teams.dedup();
        teams
    }

    /// Living combatant standing on `position`, if any.
    pub fn occupant_at(&self, position: Position) -> Option<&Combatant> {
        self.units
            .values()
            .find(|unit| unit.is_alive() && unit.position == position)
    }

    /// Ids of every living combatant, in id order.
    pub fn alive_ids(&self) -> Vec<CombatantId> {
        self.units
            .values()
            .filter(|unit| unit.is_alive())
            .map(|unit| unit.id.clone())
            .collect()
    }

    fn on_team<'a>(&'a self, team: &'a TeamId) -> impl Iterator<Item = &'a Combatant> + 'a {
        self.units.values().filter(move |unit| &unit.team == team)
    }
}
