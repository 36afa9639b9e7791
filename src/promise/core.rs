//! The settlement core: one promise's state machine.
//!
//! A [`Core`] owns everything mutable about a promise (the pending
//! reaction list or the final settlement) behind a single mutex, and
//! exposes exactly two entry points:
//!
//! - [`Core::settle`]: the sole mutator. The first call wins; every
//!   later call is a no-op. The winning call drains the reaction list
//!   and hands each reaction to the scheduler in registration order.
//! - [`Core::register`]: queues a reaction while pending, or schedules
//!   it immediately once settled.
//!
//! Both paths converge on the same guarantee: a reaction runs exactly
//! once, strictly after settlement, strictly after the registering call
//! has returned, in FIFO order.

use crate::sched::Schedule;
use crate::settlement::{PromiseState, Settlement};
use std::mem;
use std::sync::{Arc, Mutex};

/// A queued reaction: the user callbacks and child-settling wiring,
/// closed over into a single invocation.
pub(crate) type Reaction<T, E> = Box<dyn FnOnce(Settlement<T, E>) + Send>;

enum CoreInner<T, E> {
    Pending { reactions: Vec<Reaction<T, E>> },
    Settled(Settlement<T, E>),
}

/// The settlement state machine backing one promise.
pub(crate) struct Core<T, E> {
    scheduler: Arc<dyn Schedule>,
    inner: Mutex<CoreInner<T, E>>,
}

impl<T, E> Core<T, E> {
    /// Creates a pending core that flushes through `scheduler`.
    pub(crate) fn new(scheduler: Arc<dyn Schedule>) -> Arc<Self> {
        Arc::new(Self {
            scheduler,
            inner: Mutex::new(CoreInner::Pending {
                reactions: Vec::new(),
            }),
        })
    }

    /// Returns the scheduler this core flushes through.
    pub(crate) fn scheduler(&self) -> &Arc<dyn Schedule> {
        &self.scheduler
    }

    /// Returns the current state.
    pub(crate) fn state(&self) -> PromiseState {
        match &*self.inner.lock().expect("lock poisoned") {
            CoreInner::Pending { .. } => PromiseState::Pending,
            CoreInner::Settled(settlement) => settlement.state(),
        }
    }
}

impl<T, E> Core<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Returns a clone of the settlement, if settled.
    pub(crate) fn settlement(&self) -> Option<Settlement<T, E>> {
        match &*self.inner.lock().expect("lock poisoned") {
            CoreInner::Pending { .. } => None,
            CoreInner::Settled(settlement) => Some(settlement.clone()),
        }
    }

    /// Settles the core. Only the first call has any effect.
    ///
    /// The winning call drains the reaction list and schedules every
    /// reaction, in registration order, with its own clone of the
    /// settlement. Reactions never run inside this call.
    pub(crate) fn settle(&self, settlement: Settlement<T, E>) {
        let drained = {
            let mut inner = self.inner.lock().expect("lock poisoned");
            match &mut *inner {
                CoreInner::Settled(_) => {
                    tracing::trace!(state = %settlement.state(), "duplicate settlement ignored");
                    return;
                }
                CoreInner::Pending { reactions } => {
                    let drained = mem::take(reactions);
                    let state = settlement.state();
                    *inner = CoreInner::Settled(settlement.clone());
                    tracing::trace!(state = %state, reactions = drained.len(), "promise settled");
                    drained
                }
            }
        };
        for reaction in drained {
            let settlement = settlement.clone();
            self.scheduler
                .schedule(Box::new(move || reaction(settlement)));
        }
    }

    /// Registers a reaction to run once the core settles.
    ///
    /// While pending the reaction is queued; once settled it is handed
    /// to the scheduler immediately. Either way it never runs inside
    /// this call.
    pub(crate) fn register(&self, reaction: Reaction<T, E>) {
        let settlement = {
            let mut inner = self.inner.lock().expect("lock poisoned");
            match &mut *inner {
                CoreInner::Pending { reactions } => {
                    reactions.push(reaction);
                    return;
                }
                CoreInner::Settled(settlement) => {
                    tracing::trace!("reaction registered after settlement");
                    settlement.clone()
                }
            }
        };
        self.scheduler
            .schedule(Box::new(move || reaction(settlement)));
    }
}
