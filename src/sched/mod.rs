//! Deferred execution: the scheduling capability promises settle through.
//!
//! A promise's reactions must never run in the same synchronous turn as
//! the `then`/`settle` call that produced them. The settlement core
//! therefore hands every reaction to a [`Schedule`] capability, which
//! guarantees:
//!
//! - the task runs strictly after the current synchronous context
//!   unwinds, and
//! - tasks run in FIFO order relative to other `schedule` calls on the
//!   same capability.
//!
//! The capability is injected at [`Realm`] construction rather than
//! assumed ambient, so callers decide how deferred work is driven. The
//! in-crate [`FifoScheduler`] is a single-threaded queue drained
//! explicitly with [`FifoScheduler::run_until_idle`]; embedders with an
//! event loop of their own implement [`Schedule`] instead.
//!
//! [`Realm`]: crate::realm::Realm

mod fifo;

pub use fifo::{FifoScheduler, SchedulerConfig};

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// The deferred-execution capability consumed by settlement cores.
pub trait Schedule: Send + Sync {
    /// Enqueues a task to run after the current synchronous context
    /// unwinds, FIFO relative to other tasks on this capability.
    fn schedule(&self, task: Task);
}
