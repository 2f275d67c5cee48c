//! AI context: the blackboard an autonomous combatant's tree ticks against.
//!
//! The context borrows the registry and ledger owned by the simulation for
//! the duration of one turn and records every action it performs so the
//! caller can log them.

use tracing::debug;

use super::{CapabilityError, CapabilityResult, TacticalCapabilities};
use crate::actions::{self, ActionRejected, PerformedAction};
use crate::config::CombatRules;
use crate::state::{ApLedger, Combatant, CombatantId, Position, UnitRegistry};

/// Capabilities of one combatant over the shared battle stores.
pub struct AiContext<'a> {
    /// The combatant making the decision.
    pub actor: CombatantId,
    registry: &'a mut UnitRegistry,
    ledger: &'a mut ApLedger,
    rules: CombatRules,
    performed: Vec<PerformedAction>,
}

impl<'a> AiContext<'a> {
    pub fn new(
        actor: CombatantId,
        registry: &'a mut UnitRegistry,
        ledger: &'a mut ApLedger,
        rules: CombatRules,
    ) -> Self {
        Self {
            actor,
            registry,
            ledger,
            rules,
            performed: Vec::new(),
        }
    }

    /// Actions performed since the context was created.
    pub fn performed(&self) -> &[PerformedAction] {
        &self.performed
    }

    pub fn take_performed(&mut self) -> Vec<PerformedAction> {
        std::mem::take(&mut self.performed)
    }

    fn me(&self) -> Result<&Combatant, CapabilityError> {
        self.registry
            .get(&self.actor)
            .filter(|unit| unit.is_alive())
            .ok_or_else(|| CapabilityError::UnknownActor(self.actor.clone()))
    }

    /// Nearest attackable enemy; ties go to the lowest id.
    pub fn nearest_enemy(&self) -> Option<&Combatant> {
        let me = self.registry.get(&self.actor)?;
        self.registry
            .iter()
            .filter(|unit| unit.team != me.team && unit.is_targetable())
            .min_by_key(|unit| (me.position.distance(unit.position), unit.id.clone()))
    }

    fn target(&self) -> Result<(Combatant, Combatant), CapabilityError> {
        let me = self.me()?.clone();
        let target = self
            .nearest_enemy()
            .cloned()
            .ok_or_else(|| CapabilityError::NoTarget(self.actor.clone()))?;
        Ok((me, target))
    }

    /// First free tile that closes the distance, x axis preferred.
    fn next_tile(&self, from: Position, toward: Position) -> Option<Position> {
        let along_x = from.step_toward(Position::new(toward.x, from.y));
        let along_y = from.step_toward(Position::new(from.x, toward.y));
        [along_x, along_y].into_iter().find(|&tile| {
            tile != from
                && tile.distance(toward) < from.distance(toward)
                && self.registry.occupant_at(tile).is_none()
        })
    }
}

impl TacticalCapabilities for AiContext<'_> {
    fn enemy_in_attack_range(&mut self) -> CapabilityResult {
        let me = self.me()?;
        Ok(self
            .nearest_enemy()
            .is_some_and(|enemy| me.in_range_of(enemy.position)))
    }

    fn can_move(&mut self) -> CapabilityResult {
        self.me()?;
        Ok(self.ledger.can_spend(&self.actor, self.rules.move_cost))
    }

    fn can_attack(&mut self) -> CapabilityResult {
        self.me()?;
        Ok(self.ledger.can_spend(&self.actor, self.rules.attack_cost))
    }

    fn step_move_toward(&mut self) -> CapabilityResult {
        let (me, target) = self.target()?;
        let Some(next) = self.next_tile(me.position, target.position) else {
            debug!(actor = %self.actor, target = %target.id, "path blocked");
            return Ok(false);
        };
        let result = actions::move_to(self.registry, self.ledger, &self.rules, &self.actor, next);
        self.record(result)
    }

    fn step_attack(&mut self) -> CapabilityResult {
        let (_, target) = self.target()?;
        let result = actions::attack(self.registry, self.ledger, &self.rules, &self.actor, &target.id);
        self.record(result)
    }
}

impl AiContext<'_> {
    /// Blocked actions (AP, occupancy, range) are retried; the rest fail.
    fn record(&mut self, result: Result<PerformedAction, ActionRejected>) -> CapabilityResult {
        match result {
            Ok(performed) => {
                self.performed.push(performed);
                Ok(true)
            }
            Err(
                ActionRejected::InsufficientAp { .. }
                | ActionRejected::Occupied(_)
                | ActionRejected::OutOfRange { .. },
            ) => Ok(false),
            Err(ActionRejected::InvalidActor(_)) => {
                Err(CapabilityError::UnknownActor(self.actor.clone()))
            }
            Err(ActionRejected::InvalidTarget(_)) => {
                Err(CapabilityError::NoTarget(self.actor.clone()))
            }
        }
    }
}
