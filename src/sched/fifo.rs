//! A deterministic FIFO task queue.
//!
//! [`FifoScheduler`] is the provided [`Schedule`] implementation: a
//! mutex-guarded queue drained explicitly by the caller. Draining is
//! deterministic: tasks run in submission order, one at a time, on the
//! draining thread, which makes settlement order fully reproducible in
//! tests.
//!
//! The [`SchedulerConfig::max_steps`] backstop bounds a drain so that
//! adoption cycles through intermediate promises (which re-enqueue each
//! other forever) stop instead of spinning.

use super::{Schedule, Task};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Configuration for a [`FifoScheduler`].
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Maximum number of tasks a single `run_until_idle` call may run.
    ///
    /// `None` disables the backstop.
    pub max_steps: Option<u64>,
}

impl SchedulerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_steps: Some(100_000),
        }
    }

    /// Sets the maximum number of steps per drain.
    #[must_use]
    pub const fn max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Disables the step limit.
    #[must_use]
    pub const fn no_step_limit(mut self) -> Self {
        self.max_steps = None;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A FIFO task queue drained explicitly by its owner.
pub struct FifoScheduler {
    queue: Mutex<VecDeque<Task>>,
    steps: AtomicU64,
    config: SchedulerConfig,
}

impl FifoScheduler {
    /// Creates a scheduler with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::new())
    }

    /// Creates a scheduler with the given configuration.
    #[must_use]
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            steps: AtomicU64::new(0),
            config,
        }
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Returns the total number of tasks executed so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::Acquire)
    }

    /// Returns the number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.lock().expect("lock poisoned").len()
    }

    /// Returns true if no tasks are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the queue has been fully drained.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.is_empty()
    }

    /// Runs the oldest queued task, if any.
    ///
    /// Returns true if a task ran. The task runs outside the queue lock,
    /// so it may enqueue further tasks.
    pub fn step(&self) -> bool {
        let task = self.queue.lock().expect("lock poisoned").pop_front();
        match task {
            Some(task) => {
                self.steps.fetch_add(1, Ordering::AcqRel);
                task();
                true
            }
            None => false,
        }
    }

    /// Drains the queue until idle or until `max_steps` tasks have run.
    ///
    /// Tasks enqueued while draining are drained too, in FIFO order.
    /// Returns the number of tasks executed by this call.
    pub fn run_until_idle(&self) -> u64 {
        let start = self.steps();
        while !self.is_idle() {
            if let Some(max) = self.config.max_steps {
                if self.steps() - start >= max {
                    tracing::warn!(
                        steps = self.steps() - start,
                        queued = self.len(),
                        "scheduler stopped before quiescence"
                    );
                    break;
                }
            }
            self.step();
        }
        self.steps() - start
    }
}

impl Default for FifoScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule for FifoScheduler {
    fn schedule(&self, task: Task) {
        self.queue.lock().expect("lock poisoned").push_back(task);
    }
}

impl fmt::Debug for FifoScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoScheduler")
            .field("queued", &self.len())
            .field("steps", &self.steps())
            .field("config", &self.config)
            .finish()
    }
}
