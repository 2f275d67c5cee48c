//! Core behavior traits.
//!
//! [`Behavior`] is the abstraction every evaluable node implements. [`Leaf`]
//! is the narrower hook a game implements for its conditions and actions; the
//! tree itself never owns mutable state, so everything a leaf needs to
//! remember lives in the context `C`.

use crate::Status;

/// A behavior tree node that can be evaluated against a context.
pub trait Behavior<C>: Send + Sync {
    /// Evaluate this behavior node against the given context.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Mutable reference to the context/blackboard. Nodes can read
    ///   game state and act on it through the context.
    ///
    /// # Returns
    ///
    /// - `Status::Success` if the behavior succeeded
    /// - `Status::Failure` if the behavior failed
    /// - `Status::Running` if an action is in progress and should be retried
    fn tick(&self, ctx: &mut C) -> Status;
}

/// Blanket implementation for boxed behaviors.
///
/// This allows `Box<dyn Behavior<C>>` to also implement `Behavior<C>`,
/// enabling dynamic dispatch and heterogeneous collections of nodes.
impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}

/// A condition or action leaf resolved against a context.
///
/// A leaf answers a yes/no question. How the answer maps to a [`Status`]
/// depends on whether the leaf sits in a condition or an action slot of a
/// [`Node`](crate::Node). Errors are never propagated through the tree: an
/// erroring leaf resolves to `Failure`, so implementations should report the
/// error themselves before returning it.
pub trait Leaf<C> {
    /// Error reported when the leaf cannot be evaluated.
    type Error;

    /// Evaluates the leaf.
    fn call(&self, ctx: &mut C) -> Result<bool, Self::Error>;
}
