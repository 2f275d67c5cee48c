//! Status returned by behavior nodes.

/// The result of evaluating a behavior node.
///
/// # Turn-based Semantics
///
/// Conditions settle immediately, but an action may report that it is still
/// in progress (blocked path, waiting for resources). That is `Running`: the
/// caller retries it on the next tick instead of treating it as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The behavior completed successfully.
    ///
    /// For conditions: The condition was met.
    /// For actions: The action was performed.
    Success,

    /// The behavior failed.
    ///
    /// For conditions: The condition was not met.
    /// For actions: The action could not be evaluated at all.
    Failure,

    /// The action is in progress or blocked and should be retried next tick.
    Running,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Maps a boolean condition result onto `Success`/`Failure`.
    #[inline]
    pub fn from_condition(met: bool) -> Self {
        if met { Status::Success } else { Status::Failure }
    }

    /// Maps a boolean action result onto `Success`/`Running`.
    #[inline]
    pub fn from_action(done: bool) -> Self {
        if done { Status::Success } else { Status::Running }
    }
}
