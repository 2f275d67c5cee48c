//! Read-only views of the battle for rendering and UI layers.

use crate::outcome::Outcome;
use crate::state::{CombatantId, Controller, Position, TeamId};
use crate::turn::TacticalState;

use super::Phase;

/// Per-combatant state at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSnapshot {
    pub id: CombatantId,
    pub team: TeamId,
    pub controller: Controller,
    pub hp: u32,
    pub ap: u32,
    pub alive: bool,
    pub feigned_dead: bool,
    pub position: Position,
}

/// Whole-battle state at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub phase: Phase,
    pub turn: u64,
    pub round: u32,
    pub current: Option<CombatantId>,
    pub tactical_state: TacticalState,
    pub outcome: Outcome,
    pub combatants: Vec<CombatantSnapshot>,
}

impl BattleSnapshot {
    pub fn combatant(&self, id: &CombatantId) -> Option<&CombatantSnapshot> {
        self.combatants.iter().find(|combatant| &combatant.id == id)
    }
}
