//! Tactical behavior trees.
//!
//! Trees are immutable values built from [`Capability`] leaves; a single tree
//! can be shared by every autonomous combatant because all per-unit memory
//! lives in the context it is ticked against.

use behavior_tree::builder::{action, condition, selector, sequence};
use behavior_tree::{Behavior, Node, Status};

use super::{Capability, TacticalCapabilities};

/// A behavior tree over tactical capabilities.
pub type TacticalTree = Node<Capability>;

/// Attack when an enemy is in range and AP allows, otherwise close in.
///
/// ```text
/// Selector
/// ├── Sequence: enemy_in_attack_range? → can_attack? → step_attack
/// └── Sequence: can_move? → step_move_toward
/// ```
pub fn reference_tree() -> TacticalTree {
    selector(vec![
        sequence(vec![
            condition(Capability::EnemyInAttackRange),
            condition(Capability::CanAttack),
            action(Capability::StepAttack),
        ]),
        sequence(vec![
            condition(Capability::CanMove),
            action(Capability::StepMoveToward),
        ]),
    ])
}

/// Ticks `tree` once against `ctx`.
pub fn evaluate<C: TacticalCapabilities>(tree: &TacticalTree, ctx: &mut C) -> Status {
    tree.tick(ctx)
}
