//! Player-turn handle passed to the input hook.
//!
//! The hook runs synchronously inside a simulation step. Whatever it does
//! through [`PlayerTurn`] goes through the same action rules as AI turns and
//! walks the tactical micro-state as it goes; returning from the hook ends
//! the turn.

use tracing::debug;

use crate::actions::{self, ActionRejected, PerformedAction};
use crate::config::CombatRules;
use crate::state::{ApLedger, CombatantId, Position, UnitRegistry};
use crate::turn::{TacticalState, TacticalStateMachine};

/// Input hook invoked once per player-controlled turn.
pub type PlayerHook = Box<dyn FnMut(&mut PlayerTurn<'_>) + Send>;

/// Mutable view of the battle for the acting player combatant.
pub struct PlayerTurn<'a> {
    actor: CombatantId,
    registry: &'a mut UnitRegistry,
    ledger: &'a mut ApLedger,
    tactics: &'a mut TacticalStateMachine,
    rules: CombatRules,
    performed: Vec<PerformedAction>,
}

impl<'a> PlayerTurn<'a> {
    pub(crate) fn new(
        actor: CombatantId,
        registry: &'a mut UnitRegistry,
        ledger: &'a mut ApLedger,
        tactics: &'a mut TacticalStateMachine,
        rules: CombatRules,
    ) -> Self {
        Self {
            actor,
            registry,
            ledger,
            tactics,
            rules,
            performed: Vec::new(),
        }
    }

    pub fn actor(&self) -> &CombatantId {
        &self.actor
    }

    pub fn ap(&self) -> u32 {
        self.ledger.get(&self.actor)
    }

    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    /// Read access to every combatant.
    pub fn registry(&self) -> &UnitRegistry {
        &*self.registry
    }

    pub fn tactical_state(&self) -> TacticalState {
        self.tactics.current()
    }

    /// Enters move planning.
    pub fn plan_move(&mut self) {
        self.tactics.transition_to(TacticalState::PlanningMove);
    }

    /// Enters attack planning.
    pub fn plan_attack(&mut self) {
        self.tactics.transition_to(TacticalState::PlanningAttack);
    }

    /// Undoes the last micro-state transition.
    pub fn cancel(&mut self) -> bool {
        self.tactics.cancel()
    }

    /// Confirms a move to `to`. On success the turn returns to unit
    /// selection; on rejection the micro-state reverts to planning.
    pub fn move_to(&mut self, to: Position) -> Result<(), ActionRejected> {
        self.tactics.transition_to(TacticalState::ConfirmingMove);
        let result = actions::move_to(self.registry, self.ledger, &self.rules, &self.actor, to);
        self.settle(result)
    }

    /// Confirms an attack on `target`.
    pub fn attack(&mut self, target: &CombatantId) -> Result<(), ActionRejected> {
        self.tactics.transition_to(TacticalState::ConfirmingAttack);
        let result = actions::attack(self.registry, self.ledger, &self.rules, &self.actor, target);
        self.settle(result)
    }

    /// Ends the turn early; later actions are still accepted until the hook
    /// returns, but the micro-state reports the turn as finished.
    pub fn end_turn(&mut self) {
        self.tactics.transition_to(TacticalState::TurnEnd);
    }

    pub fn is_active(&self) -> bool {
        self.tactics.is_player_turn_active()
    }

    fn settle(&mut self, result: Result<PerformedAction, ActionRejected>) -> Result<(), ActionRejected> {
        match result {
            Ok(performed) => {
                self.performed.push(performed);
                self.tactics.transition_to(TacticalState::SelectingUnit);
                Ok(())
            }
            Err(err) => {
                debug!(actor = %self.actor, error = %err, "player action rejected");
                self.tactics.cancel();
                Err(err)
            }
        }
    }

    pub(crate) fn into_performed(self) -> Vec<PerformedAction> {
        self.performed
    }
}
