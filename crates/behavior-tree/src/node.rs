//! The node sum type.
//!
//! A tree is a plain value: leaves carry a game-defined `L` (usually a small
//! enum naming a capability) and composites own their children. Evaluation
//! is a single [`Behavior::tick`] over the whole tree.

use crate::composite::{tick_selector, tick_sequence};
use crate::{Behavior, Leaf, Status};

/// A behavior tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<L> {
    /// Checks a boolean leaf: `true` → `Success`, `false` → `Failure`.
    Condition(L),

    /// Performs a leaf: `true` → `Success`, `false` → `Running`.
    Action(L),

    /// Children in order until one does not succeed.
    Sequence(Vec<Node<L>>),

    /// Children in order until one does not fail.
    Selector(Vec<Node<L>>),
}

impl<L> Node<L> {
    /// Number of leaves reachable from this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Condition(_) | Node::Action(_) => 1,
            Node::Sequence(children) | Node::Selector(children) => {
                children.iter().map(Node::leaf_count).sum()
            }
        }
    }
}

impl<C, L> Behavior<C> for Node<L>
where
    L: Leaf<C> + Send + Sync,
{
    fn tick(&self, ctx: &mut C) -> Status {
        match self {
            // Leaf errors resolve to Failure; the leaf reports them.
            Node::Condition(leaf) => match leaf.call(ctx) {
                Ok(met) => Status::from_condition(met),
                Err(_) => Status::Failure,
            },
            Node::Action(leaf) => match leaf.call(ctx) {
                Ok(done) => Status::from_action(done),
                Err(_) => Status::Failure,
            },
            Node::Sequence(children) => tick_sequence(children, ctx),
            Node::Selector(children) => tick_selector(children, ctx),
        }
    }
}
