//! Construction entry points.
//!
//! A [`Realm`] carries the one external dependency every promise needs:
//! the deferred-execution capability its cores flush through. All
//! construction (executors, deferred pairs, pre-settled promises, the
//! aggregate combinators) goes through a realm, and every promise it
//! creates, directly or via chaining, inherits its scheduler.

use crate::combinator;
use crate::error::ResolveError;
use crate::promise::core::Core;
use crate::promise::resolve::resolve;
use crate::promise::{Promise, Settler};
use crate::resolution::Resolution;
use crate::sched::{FifoScheduler, Schedule};
use crate::settlement::Settlement;
use std::fmt;
use std::sync::Arc;

/// A promise factory bound to a deferred-execution capability.
#[derive(Clone)]
pub struct Realm {
    scheduler: Arc<dyn Schedule>,
}

impl fmt::Debug for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Realm").finish_non_exhaustive()
    }
}

impl Realm {
    /// Creates a realm over an injected scheduling capability.
    #[must_use]
    pub fn new(scheduler: Arc<dyn Schedule>) -> Self {
        Self { scheduler }
    }

    /// Creates a realm over a fresh [`FifoScheduler`], returning both.
    ///
    /// The caller drives deferred work explicitly through the returned
    /// queue handle, which makes settlement order fully deterministic.
    #[must_use]
    pub fn deterministic() -> (Self, Arc<FifoScheduler>) {
        let queue = Arc::new(FifoScheduler::new());
        (Self::new(Arc::clone(&queue) as Arc<dyn Schedule>), queue)
    }

    /// Returns the scheduling capability promises of this realm use.
    #[must_use]
    pub fn scheduler(&self) -> &Arc<dyn Schedule> {
        &self.scheduler
    }

    /// Creates a pending promise and its settlement capabilities.
    #[must_use]
    pub fn deferred<T, E>(&self) -> (Promise<T, E>, Settler<T, E>) {
        let core = Core::new(Arc::clone(&self.scheduler));
        (Promise::from_core(Arc::clone(&core)), Settler::new(core))
    }

    /// Creates a promise settled by `executor`.
    ///
    /// The executor runs synchronously, before this call returns. An
    /// `Err` return rejects the promise with that reason, unless the
    /// executor already settled it, in which case the first settlement
    /// stands.
    pub fn promise<T, E, X>(&self, executor: X) -> Promise<T, E>
    where
        T: Clone + Send + 'static,
        E: Clone + Send + From<ResolveError> + 'static,
        X: FnOnce(Settler<T, E>) -> Result<(), E>,
    {
        let (promise, settler) = self.deferred();
        let guard = settler.clone();
        if let Err(reason) = executor(settler) {
            guard.reject(reason);
        }
        promise
    }

    /// Returns a promise fulfilled through the ordinary resolution path.
    ///
    /// An input that is already one of this crate's promises is returned
    /// unchanged: identity passthrough, not a new wrapper. Anything
    /// else resolves a fresh promise, so thenable-unwrapping rules apply
    /// uniformly.
    #[must_use]
    pub fn fulfilled<T, E>(&self, value: impl Into<Resolution<T, E>>) -> Promise<T, E>
    where
        T: Clone + Send + 'static,
        E: Clone + Send + From<ResolveError> + 'static,
    {
        match value.into() {
            Resolution::Promise(existing) => existing,
            other => {
                let core = Core::new(Arc::clone(&self.scheduler));
                resolve(&core, other);
                Promise::from_core(core)
            }
        }
    }

    /// Returns a new promise rejected with `reason`, verbatim.
    ///
    /// Rejection reasons are never treated as thenables.
    #[must_use]
    pub fn rejected<T, E>(&self, reason: E) -> Promise<T, E>
    where
        T: Clone + Send + 'static,
        E: Clone + Send + 'static,
    {
        let core = Core::new(Arc::clone(&self.scheduler));
        core.settle(Settlement::Rejected(reason));
        Promise::from_core(core)
    }

    /// Waits for every input; see [`combinator::all`].
    #[must_use]
    pub fn all<T, E, I>(&self, inputs: I) -> Promise<Vec<T>, E>
    where
        T: Clone + Send + 'static,
        E: Clone + Send + From<ResolveError> + 'static,
        I: IntoIterator,
        I::Item: Into<Resolution<T, E>>,
    {
        combinator::all(self, inputs)
    }

    /// Mirrors the first input to settle; see [`combinator::race`].
    #[must_use]
    pub fn race<T, E, I>(&self, inputs: I) -> Promise<T, E>
    where
        T: Clone + Send + 'static,
        E: Clone + Send + From<ResolveError> + 'static,
        I: IntoIterator,
        I::Item: Into<Resolution<T, E>>,
    {
        combinator::race(self, inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::PromiseState;

    #[test]
    fn executor_runs_synchronously() {
        let (realm, _queue) = Realm::deterministic();
        let mut ran = false;
        let promise = realm.promise::<i32, String, _>(|settler| {
            ran = true;
            settler.fulfill(1);
            Ok(())
        });
        assert!(ran);
        assert_eq!(promise.state(), PromiseState::Fulfilled);
    }

    #[test]
    fn executor_fault_rejects_a_pending_promise() {
        let (realm, queue) = Realm::deterministic();
        let promise = realm.promise::<i32, String, _>(|_| Err("executor faulted".into()));
        queue.run_until_idle();

        assert_eq!(
            promise.settlement(),
            Some(Settlement::Rejected("executor faulted".into()))
        );
    }

    #[test]
    fn executor_fault_after_settlement_is_ignored() {
        let (realm, queue) = Realm::deterministic();
        let promise = realm.promise::<i32, String, _>(|settler| {
            settler.fulfill(2);
            Err("too late".into())
        });
        queue.run_until_idle();

        assert_eq!(promise.settlement(), Some(Settlement::Fulfilled(2)));
    }

    #[test]
    fn fulfilled_passes_existing_promises_through_unchanged() {
        let (realm, _queue) = Realm::deterministic();
        let (original, _settler) = realm.deferred::<i32, String>();
        let wrapped = realm.fulfilled(original.clone());
        assert!(original.ptr_eq(&wrapped));
    }

    #[test]
    fn fulfilled_wraps_plain_values() {
        let (realm, queue) = Realm::deterministic();
        let promise = realm.fulfilled::<i32, String>(Resolution::value(123));
        queue.run_until_idle();

        assert_eq!(promise.settlement(), Some(Settlement::Fulfilled(123)));
    }

    #[test]
    fn rejected_carries_the_reason_verbatim() {
        let (realm, queue) = Realm::deterministic();
        let promise = realm.rejected::<i32, String>("error".into());
        queue.run_until_idle();

        assert_eq!(
            promise.settlement(),
            Some(Settlement::Rejected("error".into()))
        );
    }

    #[test]
    fn deferred_pair_settles_like_an_executor_capture() {
        let (realm, queue) = Realm::deterministic();
        let (promise, settler) = realm.deferred::<i32, String>();
        assert!(promise.is_pending());

        settler.fulfill(7);
        queue.run_until_idle();
        assert_eq!(promise.settlement(), Some(Settlement::Fulfilled(7)));
    }
}
