//! Classification of values a promise may be resolved with.
//!
//! The dynamic rule "anything exposing a callable `then` is future-like"
//! becomes an explicit sum type here. A value destined to settle a
//! promise arrives as a [`Resolution`], classified exactly once at
//! construction:
//!
//! - [`Resolution::Value`]: a plain value; settles the target directly.
//! - [`Resolution::Promise`]: one of this crate's own promises; the
//!   target adopts its settlement.
//! - [`Resolution::Foreign`]: an opaque foreign object, probed exactly
//!   once for a then-capability via [`Foreign::probe`].
//!
//! The probe is the single point where "is this thenable?" is decided;
//! its result is never re-queried. A fallible probe models a `then`
//! accessor that faults when read, and [`Thenable::subscribe`]'s
//! `Result` return models a `then` call that faults after possibly
//! invoking a callback. Subscription callbacks are `FnMut` because
//! misbehaving foreign implementations may invoke them more than once;
//! the resolution procedure latches so only the first invocation has any
//! effect.

use crate::promise::Promise;
use core::fmt;

/// Settlement callback handed to a foreign thenable.
///
/// May be invoked with a further [`Resolution`], which the target then
/// resolves in a later scheduler turn.
pub type ForeignFulfill<T, E> = Box<dyn FnMut(Resolution<T, E>) + Send>;

/// Rejection callback handed to a foreign thenable.
///
/// Reasons are carried verbatim; they are never probed for a
/// then-capability.
pub type ForeignReject<E> = Box<dyn FnMut(E) + Send>;

/// A foreign deferred value that notifies callbacks of its settlement.
pub trait Thenable<T, E>: Send {
    /// Registers settlement callbacks with this thenable.
    ///
    /// Implementations are not trusted: they may invoke both callbacks,
    /// invoke one repeatedly, invoke synchronously, or return `Err`
    /// after having already invoked one. Callers guard with a one-shot
    /// latch so none of that misbehavior is observable downstream.
    ///
    /// # Errors
    ///
    /// An `Err` models a `then` invocation that faulted; it rejects the
    /// target unless a callback already fired.
    fn subscribe(
        self: Box<Self>,
        on_fulfilled: ForeignFulfill<T, E>,
        on_rejected: ForeignReject<E>,
    ) -> Result<(), E>;
}

/// The outcome of probing a foreign object for a then-capability.
pub enum Probed<T, E> {
    /// The object exposes a callable `then`; its settlement is adopted.
    Thenable(Box<dyn Thenable<T, E>>),
    /// No then-capability; the object itself is the fulfillment value.
    Value(T),
}

/// An opaque foreign object that may or may not be thenable.
pub trait Foreign<T, E>: Send {
    /// Probes for a then-capability. Invoked at most once per object.
    ///
    /// # Errors
    ///
    /// An `Err` models a faulting `then` accessor; it rejects the
    /// target.
    fn probe(self: Box<Self>) -> Result<Probed<T, E>, E>;
}

/// The classification of a [`Resolution`], established at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// A plain value.
    Value,
    /// One of this crate's own promises.
    Promise,
    /// A foreign object pending its one-shot probe.
    Foreign,
}

/// A value destined to settle a promise.
pub enum Resolution<T, E> {
    /// A plain, already-available value.
    Value(T),
    /// One of this crate's own promises; the target adopts its
    /// settlement.
    Promise(Promise<T, E>),
    /// A foreign object, probed once for a then-capability.
    Foreign(Box<dyn Foreign<T, E>>),
}

impl<T, E> Resolution<T, E> {
    /// Wraps a plain value.
    #[must_use]
    pub const fn value(value: T) -> Self {
        Self::Value(value)
    }

    /// Wraps a foreign object.
    #[must_use]
    pub fn foreign(object: impl Foreign<T, E> + 'static) -> Self {
        Self::Foreign(Box::new(object))
    }

    /// Wraps a thenable as a foreign object whose probe always yields
    /// the then-capability.
    #[must_use]
    pub fn thenable(thenable: impl Thenable<T, E> + 'static) -> Self {
        Self::Foreign(Box::new(KnownThenable(thenable)))
    }

    /// Returns the classification of this resolution.
    #[must_use]
    pub const fn kind(&self) -> ResolutionKind {
        match self {
            Self::Value(_) => ResolutionKind::Value,
            Self::Promise(_) => ResolutionKind::Promise,
            Self::Foreign(_) => ResolutionKind::Foreign,
        }
    }
}

impl<T, E> From<Promise<T, E>> for Resolution<T, E> {
    fn from(promise: Promise<T, E>) -> Self {
        Self::Promise(promise)
    }
}

impl<T, E> fmt::Debug for Resolution<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Resolution").field(&self.kind()).finish()
    }
}

/// Adapter for values already known to be thenable.
struct KnownThenable<X>(X);

impl<T, E, X> Foreign<T, E> for KnownThenable<X>
where
    X: Thenable<T, E> + 'static,
{
    fn probe(self: Box<Self>) -> Result<Probed<T, E>, E> {
        Ok(Probed::Thenable(Box::new(self.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::Realm;

    struct Immediate(i32);

    impl Thenable<i32, String> for Immediate {
        fn subscribe(
            self: Box<Self>,
            mut on_fulfilled: ForeignFulfill<i32, String>,
            _on_rejected: ForeignReject<String>,
        ) -> Result<(), String> {
            on_fulfilled(Resolution::Value(self.0));
            Ok(())
        }
    }

    #[test]
    fn kinds_reflect_variants() {
        let value: Resolution<i32, String> = Resolution::value(1);
        assert_eq!(value.kind(), ResolutionKind::Value);

        let (realm, _queue) = Realm::deterministic();
        let promise: Resolution<i32, String> = realm.rejected("nope".to_string()).into();
        assert_eq!(promise.kind(), ResolutionKind::Promise);

        let foreign: Resolution<i32, String> = Resolution::thenable(Immediate(1));
        assert_eq!(foreign.kind(), ResolutionKind::Foreign);
    }

    #[test]
    fn thenable_adapter_probes_to_the_capability() {
        let resolution: Resolution<i32, String> = Resolution::thenable(Immediate(9));
        let Resolution::Foreign(object) = resolution else {
            panic!("expected a foreign resolution");
        };
        match object.probe() {
            Ok(Probed::Thenable(_)) => {}
            _ => panic!("adapter must surface the then-capability"),
        }
    }

    #[test]
    fn debug_shows_classification_only() {
        let value: Resolution<i32, String> = Resolution::value(3);
        assert_eq!(format!("{value:?}"), "Resolution(Value)");
    }
}
