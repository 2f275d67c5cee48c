//! Composite evaluation.
//!
//! Short-circuiting loops shared by every composite node. Children after the
//! decisive one are never ticked.

use crate::{Behavior, Status};

/// Ticks `children` in order until one does not succeed.
///
/// # Semantics
///
/// - `Failure` or `Running` from a child **stops immediately** and is returned
/// - `Success` moves on to the next child
/// - If all children succeed (or there are none), returns `Success`
///
/// This is analogous to a short-circuited logical AND (&&) operation.
pub fn tick_sequence<'a, C, B>(children: impl IntoIterator<Item = &'a B>, ctx: &mut C) -> Status
where
    B: Behavior<C> + 'a,
{
    for child in children {
        match child.tick(ctx) {
            Status::Success => continue,
            decisive => return decisive,
        }
    }
    Status::Success
}

/// Ticks `children` in order until one does not fail.
///
/// # Semantics
///
/// - `Success` or `Running` from a child **stops immediately** and is returned
/// - `Failure` moves on to the next child
/// - If all children fail (or there are none), returns `Failure`
///
/// This is analogous to a short-circuited logical OR (||) operation.
pub fn tick_selector<'a, C, B>(children: impl IntoIterator<Item = &'a B>, ctx: &mut C) -> Status
where
    B: Behavior<C> + 'a,
{
    for child in children {
        match child.tick(ctx) {
            Status::Failure => continue,
            decisive => return decisive,
        }
    }
    Status::Failure
}
