//! Staggered invocation of periodic AI work.
//!
//! Hosts call [`AiScheduler::update`] once per frame with the elapsed time.
//! Each task fires when its due time has passed; offsets spread the first
//! invocation of many tasks so they do not all land on the same frame.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use tracing::{trace, warn};

use crate::state::CombatantId;

/// Callback run when a task is due.
pub type TaskCallback<C> = Box<dyn FnMut(&mut C) -> anyhow::Result<()> + Send>;

struct AiTask<C> {
    callback: TaskCallback<C>,
    period: Duration,
    offset: Duration,
    registered_at: Duration,
    last_invoked: Option<Duration>,
}

impl<C> AiTask<C> {
    fn due_at(&self) -> Duration {
        match self.last_invoked {
            Some(last) => last + self.period,
            None => self.registered_at + self.offset,
        }
    }
}

/// Due-time scheduler over a simulated clock.
///
/// Tasks run in id order on the caller's thread; `C` is whatever the
/// callbacks need mutable access to.
pub struct AiScheduler<C> {
    now: Duration,
    tasks: BTreeMap<CombatantId, AiTask<C>>,
}

impl<C> AiScheduler<C> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            tasks: BTreeMap::new(),
        }
    }

    /// Registers (or replaces) the task for `id`.
    ///
    /// The first invocation is due `offset` after registration; later ones
    /// `period` after the previous invocation.
    pub fn register<F>(&mut self, id: CombatantId, callback: F, period: Duration, offset: Duration)
    where
        F: FnMut(&mut C) -> anyhow::Result<()> + Send + 'static,
    {
        self.tasks.insert(
            id,
            AiTask {
                callback: Box::new(callback),
                period,
                offset,
                registered_at: self.now,
                last_invoked: None,
            },
        );
    }

    /// Removes the task for `id`. Unknown ids are ignored.
    pub fn unregister(&mut self, id: &CombatantId) -> bool {
        self.tasks.remove(id).is_some()
    }

    pub fn is_registered(&self, id: &CombatantId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Simulated time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Advances the clock by `dt` and runs every due task once.
    ///
    /// A failing callback is logged and skipped; the remaining tasks still
    /// run. Returns how many callbacks were invoked.
    pub fn update(&mut self, dt: Duration, ctx: &mut C) -> usize {
        self.now += dt;
        let now = self.now;
        let mut invoked = 0;

        for (id, task) in self.tasks.iter_mut() {
            if task.due_at() > now {
                continue;
            }
            task.last_invoked = Some(now);
            invoked += 1;
            trace!(task = %id, now = ?now, "ai task due");
            if let Err(err) = (task.callback)(ctx) {
                warn!(task = %id, error = %err, "ai task failed");
            }
        }

        invoked
    }
}

impl<C> Default for AiScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for AiScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiScheduler")
            .field("now", &self.now)
            .field("tasks", &self.tasks.keys().collect::<Vec<_>>())
            .finish()
    }
}
