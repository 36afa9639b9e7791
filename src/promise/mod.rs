//! The promise handle and its chaining surface.
//!
//! A [`Promise`] is a cloneable handle to one settlement core. All
//! mutation flows through two capabilities:
//!
//! - [`Settler`], the pair of settlement capabilities handed to
//!   executors: `resolve` routes through the resolution procedure,
//!   `reject` settles directly (reasons are never probed for a
//!   then-capability).
//! - the `then` family ([`Promise::then`], [`Promise::catch`],
//!   [`Promise::then_catch`], [`Promise::map`]), each of which creates a
//!   new promise settled by the parent's outcome.
//!
//! # The reaction fault boundary
//!
//! Chaining callbacks return `Result<Resolution<U, E>, E>`. An `Ok` is
//! fed through the resolution procedure into the child (so returning a
//! promise or thenable defers the child until it settles); an `Err`
//! rejects the child with that reason. No fault escapes a reaction.
//!
//! # Passthrough
//!
//! A missing callback arm proxies the parent's outcome onto the child:
//! `then` passes rejections through unchanged, `catch` passes
//! fulfillments through unchanged. Unhandled rejections therefore keep
//! propagating down a chain instead of silently turning into
//! fulfillments.

pub(crate) mod core;
pub(crate) mod resolve;

use self::core::Core;
use self::resolve::resolve;
use crate::error::ResolveError;
use crate::resolution::Resolution;
use crate::settlement::{PromiseState, Settlement};
use std::fmt;
use std::sync::Arc;

/// A handle to a value that will be available later.
///
/// Handles are cheap to clone; clones share one settlement core and
/// therefore one identity (see [`Promise::ptr_eq`]). A promise settles
/// at most once, and every reaction registered against it runs exactly
/// once, asynchronously, in registration order.
pub struct Promise<T, E> {
    core: Arc<Core<T, E>>,
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("state", &self.state())
            .finish()
    }
}

impl<T, E> Promise<T, E> {
    pub(crate) fn from_core(core: Arc<Core<T, E>>) -> Self {
        Self { core }
    }

    pub(crate) fn core(&self) -> &Arc<Core<T, E>> {
        &self.core
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> PromiseState {
        self.core.state()
    }

    /// Returns true while the promise has not settled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state() == PromiseState::Pending
    }

    /// Returns true if both handles refer to the same settlement core.
    ///
    /// This is the identity the resolution procedure uses for its
    /// self-adoption check.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Returns a clone of the settlement, or `None` while pending.
    #[must_use]
    pub fn settlement(&self) -> Option<Settlement<T, E>> {
        self.core.settlement()
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<ResolveError> + 'static,
{
    /// Chains a fulfillment callback; rejections pass through unchanged.
    ///
    /// Returns a new promise that settles with the callback's outcome
    /// once this one fulfills, or with this promise's rejection reason
    /// verbatim.
    #[must_use]
    pub fn then<U, F>(&self, on_fulfilled: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<Resolution<U, E>, E> + Send + 'static,
    {
        self.chain(on_fulfilled, Err)
    }

    /// Chains a rejection callback; fulfillments pass through unchanged.
    ///
    /// Equivalent to [`Promise::then_catch`] with an identity
    /// fulfillment arm.
    #[must_use]
    pub fn catch<G>(&self, on_rejected: G) -> Promise<T, E>
    where
        G: FnOnce(E) -> Result<Resolution<T, E>, E> + Send + 'static,
    {
        self.chain(|value| Ok(Resolution::Value(value)), on_rejected)
    }

    /// Chains both callback arms.
    #[must_use]
    pub fn then_catch<U, F, G>(&self, on_fulfilled: F, on_rejected: G) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<Resolution<U, E>, E> + Send + 'static,
        G: FnOnce(E) -> Result<Resolution<U, E>, E> + Send + 'static,
    {
        self.chain(on_fulfilled, on_rejected)
    }

    /// Maps the fulfillment value through a plain transform.
    ///
    /// Sugar over [`Promise::then`] for callbacks that cannot fault and
    /// return an immediate value.
    #[must_use]
    pub fn map<U, F>(&self, f: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.then(move |value| Ok(Resolution::Value(f(value))))
    }

    /// Creates the child promise and registers the parent reaction.
    fn chain<U, F, G>(&self, on_fulfilled: F, on_rejected: G) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<Resolution<U, E>, E> + Send + 'static,
        G: FnOnce(E) -> Result<Resolution<U, E>, E> + Send + 'static,
    {
        let child = Core::new(Arc::clone(self.core.scheduler()));
        let target = Arc::clone(&child);
        self.core.register(Box::new(move |settlement| {
            let outcome = match settlement {
                Settlement::Fulfilled(value) => on_fulfilled(value),
                Settlement::Rejected(reason) => on_rejected(reason),
            };
            match outcome {
                Ok(resolution) => resolve(&target, resolution),
                Err(reason) => target.settle(Settlement::Rejected(reason)),
            }
        }));
        Promise::from_core(child)
    }
}

/// The settlement capabilities handed to an executor.
///
/// Cloneable; all clones act on the same core, and the core's
/// first-write-wins rule makes duplicate or conflicting calls no-ops.
pub struct Settler<T, E> {
    core: Arc<Core<T, E>>,
}

impl<T, E> Clone for Settler<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T, E> fmt::Debug for Settler<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settler")
            .field("state", &self.core.state())
            .finish()
    }
}

impl<T, E> Settler<T, E> {
    pub(crate) fn new(core: Arc<Core<T, E>>) -> Self {
        Self { core }
    }
}

impl<T, E> Settler<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<ResolveError> + 'static,
{
    /// Resolves the promise with a value, promise, or foreign object.
    ///
    /// Routes through the resolution procedure: plain values settle
    /// immediately, promises and thenables are adopted.
    pub fn resolve(&self, resolution: impl Into<Resolution<T, E>>) {
        resolve(&self.core, resolution.into());
    }

    /// Fulfills the promise with a plain value.
    pub fn fulfill(&self, value: T) {
        self.resolve(Resolution::Value(value));
    }

    /// Rejects the promise with a reason, verbatim.
    ///
    /// Reasons travel as data; they are never probed for a
    /// then-capability.
    pub fn reject(&self, reason: E) {
        self.core.settle(Settlement::Rejected(reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::Realm;

    #[test]
    fn then_transforms_the_fulfillment_value() {
        let (realm, queue) = Realm::deterministic();
        let doubled = realm
            .fulfilled::<i32, String>(Resolution::value(21))
            .then(|v| Ok(Resolution::Value(v * 2)));
        queue.run_until_idle();

        assert_eq!(doubled.settlement(), Some(Settlement::Fulfilled(42)));
    }

    #[test]
    fn then_passes_rejections_through_verbatim() {
        let (realm, queue) = Realm::deterministic();
        let chained = realm
            .rejected::<i32, String>("broken".into())
            .then(|v| Ok(Resolution::Value(v + 1)));
        queue.run_until_idle();

        assert_eq!(
            chained.settlement(),
            Some(Settlement::Rejected("broken".into()))
        );
    }

    #[test]
    fn catch_recovers_a_rejection() {
        let (realm, queue) = Realm::deterministic();
        let recovered = realm
            .rejected::<i32, String>("broken".into())
            .catch(|reason| Ok(Resolution::Value(reason.len() as i32)));
        queue.run_until_idle();

        assert_eq!(recovered.settlement(), Some(Settlement::Fulfilled(6)));
    }

    #[test]
    fn catch_passes_fulfillments_through() {
        let (realm, queue) = Realm::deterministic();
        let chained = realm
            .fulfilled::<i32, String>(Resolution::value(7))
            .catch(|_| Ok(Resolution::Value(0)));
        queue.run_until_idle();

        assert_eq!(chained.settlement(), Some(Settlement::Fulfilled(7)));
    }

    #[test]
    fn callback_fault_rejects_the_child() {
        let (realm, queue) = Realm::deterministic();
        let chained = realm
            .fulfilled::<i32, String>(Resolution::value(1))
            .then::<i32, _>(|_| Err("callback faulted".into()));
        queue.run_until_idle();

        assert_eq!(
            chained.settlement(),
            Some(Settlement::Rejected("callback faulted".into()))
        );
    }

    #[test]
    fn callback_returning_a_promise_defers_the_child() {
        let (realm, queue) = Realm::deterministic();
        let (inner, inner_settler) = realm.deferred::<i32, String>();
        let chained = realm
            .fulfilled::<i32, String>(Resolution::value(0))
            .then(move |_| Ok(Resolution::Promise(inner)));

        queue.run_until_idle();
        assert!(chained.is_pending());

        inner_settler.fulfill(14);
        queue.run_until_idle();
        assert_eq!(chained.settlement(), Some(Settlement::Fulfilled(14)));
    }

    #[test]
    fn then_always_returns_a_distinct_promise() {
        let (realm, _queue) = Realm::deterministic();
        let parent = realm.fulfilled::<i32, String>(Resolution::value(1));
        let child = parent.then(|v| Ok(Resolution::Value(v)));
        assert!(!parent.ptr_eq(&child.map(|v| v)));
        assert!(!parent.ptr_eq(&parent.then(|v| Ok(Resolution::Value(v)))));
    }

    #[test]
    fn map_is_plain_value_sugar() {
        let (realm, queue) = Realm::deterministic();
        let mapped = realm
            .fulfilled::<i32, String>(Resolution::value(5))
            .map(|v| v.to_string());
        queue.run_until_idle();

        assert_eq!(
            mapped.settlement(),
            Some(Settlement::Fulfilled("5".to_string()))
        );
    }

    #[test]
    fn clones_share_identity() {
        let (realm, _queue) = Realm::deterministic();
        let promise = realm.fulfilled::<i32, String>(Resolution::value(1));
        assert!(promise.ptr_eq(&promise.clone()));
    }
}
