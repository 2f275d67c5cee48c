//! Builder utilities for ergonomic behavior tree construction.
//!
//! Instead of writing `Node::Sequence(vec![Node::Condition(..), ..])` you can
//! use shorter functions like `sequence(vec![condition(..), ..])`.

use crate::Node;

/// Creates a condition leaf.
#[inline]
pub fn condition<L>(leaf: L) -> Node<L> {
    Node::Condition(leaf)
}

/// Creates an action leaf.
#[inline]
pub fn action<L>(leaf: L) -> Node<L> {
    Node::Action(leaf)
}

/// Creates a sequence node.
#[inline]
pub fn sequence<L>(children: Vec<Node<L>>) -> Node<L> {
    Node::Sequence(children)
}

/// Creates a selector node.
#[inline]
pub fn selector<L>(children: Vec<Node<L>>) -> Node<L> {
    Node::Selector(children)
}
