//! The resolution procedure.
//!
//! `resolve` is the one path by which a value settles a core, and it
//! encodes the full absorption algorithm:
//!
//! ```text
//! resolve(target, x):
//!   x is target's own promise ──► reject(SelfAdoption)
//!   x is another promise ───────► register forwarding reaction on x
//!   x is foreign ───────────────► probe() once
//!        probe faulted ─────────►   reject(fault)
//!        plain value ───────────►   fulfill(value)
//!        thenable ──────────────►   subscribe(latched callbacks)
//!   x is a plain value ─────────► fulfill(value)
//! ```
//!
//! Two guards keep misbehaving foreign objects harmless:
//!
//! - a one-shot [`Latch`] shared by both subscription callbacks, so only
//!   the first invocation (or a post-invocation fault) has any effect;
//! - every latched fulfillment re-enters `resolve` through the target's
//!   scheduler, so a chain of thenables of any depth consumes queue
//!   turns, never stack frames.
//!
//! Only direct self-adoption is detected. A cycle through intermediate
//! promises keeps its participants pending forever; the scheduler's
//! step backstop is what keeps such programs observable.

use super::core::Core;
use crate::error::ResolveError;
use crate::resolution::{Foreign, ForeignFulfill, ForeignReject, Probed, Resolution};
use crate::settlement::Settlement;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A one-shot flag: the first `try_fire` wins, every later call loses.
pub(crate) struct Latch {
    fired: AtomicBool,
}

impl Latch {
    pub(crate) const fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// Fires the latch. Returns true only for the first caller.
    pub(crate) fn try_fire(&self) -> bool {
        !self.fired.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

/// Settles `target` with `resolution`, eventually.
///
/// Plain values settle synchronously (the reaction flush is still
/// deferred); promises and thenables defer settlement until the inner
/// value settles.
pub(crate) fn resolve<T, E>(target: &Arc<Core<T, E>>, resolution: Resolution<T, E>)
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<ResolveError> + 'static,
{
    match resolution {
        Resolution::Value(value) => target.settle(Settlement::Fulfilled(value)),
        Resolution::Promise(source) => adopt_promise(target, &source),
        Resolution::Foreign(object) => adopt_foreign(target, object),
    }
}

fn adopt_promise<T, E>(target: &Arc<Core<T, E>>, source: &crate::promise::Promise<T, E>)
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<ResolveError> + 'static,
{
    if Arc::ptr_eq(source.core(), target) {
        tracing::debug!("promise resolved with its own handle");
        target.settle(Settlement::Rejected(E::from(ResolveError::SelfAdoption)));
        return;
    }
    let target = Arc::clone(target);
    source
        .core()
        .register(Box::new(move |settlement| target.settle(settlement)));
}

fn adopt_foreign<T, E>(target: &Arc<Core<T, E>>, object: Box<dyn Foreign<T, E>>)
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<ResolveError> + 'static,
{
    let thenable = match object.probe() {
        Err(reason) => {
            target.settle(Settlement::Rejected(reason));
            return;
        }
        Ok(Probed::Value(value)) => {
            target.settle(Settlement::Fulfilled(value));
            return;
        }
        Ok(Probed::Thenable(thenable)) => thenable,
    };

    tracing::trace!("adopting foreign thenable");
    let latch = Arc::new(Latch::new());

    let on_fulfilled: ForeignFulfill<T, E> = {
        let latch = Arc::clone(&latch);
        let target = Arc::clone(target);
        Box::new(move |next| {
            if !latch.try_fire() {
                tracing::trace!("foreign fulfillment after latch fired; ignored");
                return;
            }
            // Next hop runs in its own queue turn: chain depth never
            // grows the stack.
            let hop_target = Arc::clone(&target);
            let scheduler = Arc::clone(hop_target.scheduler());
            scheduler.schedule(Box::new(move || resolve(&hop_target, next)));
        })
    };

    let on_rejected: ForeignReject<E> = {
        let latch = Arc::clone(&latch);
        let target = Arc::clone(target);
        Box::new(move |reason| {
            if latch.try_fire() {
                target.settle(Settlement::Rejected(reason));
            } else {
                tracing::trace!("foreign rejection after latch fired; ignored");
            }
        })
    };

    if let Err(reason) = thenable.subscribe(on_fulfilled, on_rejected) {
        if latch.try_fire() {
            target.settle(Settlement::Rejected(reason));
        }
    }
}
