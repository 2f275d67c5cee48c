//! Move and attack resolution shared by AI contexts and player turns.
//!
//! Each function validates first and mutates only on success, so a rejected
//! action never spends AP or moves anyone.

use tracing::debug;

use crate::config::CombatRules;
use crate::state::{ApLedger, CombatantId, Position, UnitRegistry};

/// An action that changed the battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PerformedAction {
    Moved {
        from: Position,
        to: Position,
    },
    Attacked {
        target: CombatantId,
        damage: u32,
        remaining_hp: u32,
    },
}

/// Why an action was not performed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionRejected {
    #[error("actor {0} is not a living combatant")]
    InvalidActor(CombatantId),

    #[error("not enough action points (need {needed}, have {available})")]
    InsufficientAp { needed: u32, available: u32 },

    #[error("tile {0} is occupied")]
    Occupied(Position),

    #[error("target {0} is not an attackable enemy")]
    InvalidTarget(CombatantId),

    #[error("target {target} is {distance} tiles away (range {range})")]
    OutOfRange {
        target: CombatantId,
        distance: u32,
        range: u32,
    },
}

/// Moves `actor` to `to`, paying `move_cost` per tile of Manhattan distance.
pub fn move_to(
    registry: &mut UnitRegistry,
    ledger: &mut ApLedger,
    rules: &CombatRules,
    actor: &CombatantId,
    to: Position,
) -> Result<PerformedAction, ActionRejected> {
    let from = registry
        .get(actor)
        .filter(|unit| unit.is_alive())
        .map(|unit| unit.position)
        .ok_or_else(|| ActionRejected::InvalidActor(actor.clone()))?;
    if from == to {
        return Err(ActionRejected::Occupied(to));
    }
    if registry.occupant_at(to).is_some() {
        return Err(ActionRejected::Occupied(to));
    }

    let needed = from.distance(to).saturating_mul(rules.move_cost);
    if !ledger.spend(actor, needed) {
        return Err(ActionRejected::InsufficientAp {
            needed,
            available: ledger.get(actor),
        });
    }

    registry.set_position(actor, to);
    debug!(actor = %actor, from = %from, to = %to, "moved");
    Ok(PerformedAction::Moved { from, to })
}

/// `actor` attacks `target` for the fixed damage amount.
pub fn attack(
    registry: &mut UnitRegistry,
    ledger: &mut ApLedger,
    rules: &CombatRules,
    actor: &CombatantId,
    target: &CombatantId,
) -> Result<PerformedAction, ActionRejected> {
    let attacker = registry
        .get(actor)
        .filter(|unit| unit.is_alive())
        .ok_or_else(|| ActionRejected::InvalidActor(actor.clone()))?;
    let defender = registry
        .get(target)
        .filter(|unit| unit.team != attacker.team && unit.is_targetable())
        .ok_or_else(|| ActionRejected::InvalidTarget(target.clone()))?;

    let distance = attacker.position.distance(defender.position);
    if distance > attacker.attack_range {
        return Err(ActionRejected::OutOfRange {
            target: target.clone(),
            distance,
            range: attacker.attack_range,
        });
    }
    if !ledger.spend(actor, rules.attack_cost) {
        return Err(ActionRejected::InsufficientAp {
            needed: rules.attack_cost,
            available: ledger.get(actor),
        });
    }

    let damage = rules.attack_damage;
    registry.damage(target, damage);
    let remaining_hp = registry.hp(target);
    debug!(actor = %actor, target = %target, damage, remaining_hp, "attacked");
    Ok(PerformedAction::Attacked {
        target: target.clone(),
        damage,
        remaining_hp,
    })
}
