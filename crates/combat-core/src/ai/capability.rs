//! The closed capability interface behavior-tree leaves call into.

use behavior_tree::Leaf;
use tracing::debug;

use crate::state::CombatantId;

/// Errors a capability may report. The tree turns any of them into a failed
/// node; they never reach the caller.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("combatant {0} is not registered")]
    UnknownActor(CombatantId),

    #[error("combatant {0} has no living enemy to act against")]
    NoTarget(CombatantId),
}

pub type CapabilityResult = Result<bool, CapabilityError>;

/// What an autonomous combatant can ask about or do on its turn.
///
/// Conditions (`enemy_in_attack_range`, `can_move`, `can_attack`) answer
/// yes/no. Steps (`step_move_toward`, `step_attack`) return `Ok(true)` once
/// the action happened and `Ok(false)` while it is blocked.
pub trait TacticalCapabilities {
    fn enemy_in_attack_range(&mut self) -> CapabilityResult;
    fn can_move(&mut self) -> CapabilityResult;
    fn can_attack(&mut self) -> CapabilityResult;
    fn step_move_toward(&mut self) -> CapabilityResult;
    fn step_attack(&mut self) -> CapabilityResult;
}

/// Names a [`TacticalCapabilities`] method; the leaf type of tactical trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    EnemyInAttackRange,
    CanMove,
    CanAttack,
    StepMoveToward,
    StepAttack,
}

impl Capability {
    /// Dispatches to the matching trait method.
    pub fn invoke<C: TacticalCapabilities + ?Sized>(self, ctx: &mut C) -> CapabilityResult {
        match self {
            Capability::EnemyInAttackRange => ctx.enemy_in_attack_range(),
            Capability::CanMove => ctx.can_move(),
            Capability::CanAttack => ctx.can_attack(),
            Capability::StepMoveToward => ctx.step_move_toward(),
            Capability::StepAttack => ctx.step_attack(),
        }
    }
}

impl<C: TacticalCapabilities> Leaf<C> for Capability {
    type Error = CapabilityError;

    fn call(&self, ctx: &mut C) -> CapabilityResult {
        let result = self.invoke(ctx);
        if let Err(err) = &result {
            debug!(capability = %self, error = %err, "capability failed");
        }
        result
    }
}
