//! Settled outcomes and the promise state machine's observable states.
//!
//! A promise moves through exactly one transition:
//!
//! ```text
//!             settle(Fulfilled(v))
//!   Pending ────────────────────────► Fulfilled
//!      │
//!      │      settle(Rejected(r))
//!      └────────────────────────────► Rejected
//! ```
//!
//! Both non-pending states are terminal: once a core leaves `Pending`
//! its settlement never changes again. [`Settlement`] is the payload of
//! a terminal state; [`PromiseState`] is the three-valued observer view.

use core::fmt;

/// The observable state of a promise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromiseState {
    /// Not yet settled; reactions are queued.
    Pending,
    /// Settled with a fulfillment value.
    Fulfilled,
    /// Settled with a rejection reason.
    Rejected,
}

impl PromiseState {
    /// Returns true if this state can never change again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns a human-readable name for the state.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fulfilled => "fulfilled",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PromiseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A settled outcome: a fulfillment value or a rejection reason.
///
/// Every reaction receives its own clone of the settlement; the core
/// keeps the original for late subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement<T, E> {
    /// The promise succeeded with a value.
    Fulfilled(T),
    /// The promise failed with a reason.
    Rejected(E),
}

impl<T, E> Settlement<T, E> {
    /// Returns the state this settlement puts a promise in.
    #[must_use]
    pub const fn state(&self) -> PromiseState {
        match self {
            Self::Fulfilled(_) => PromiseState::Fulfilled,
            Self::Rejected(_) => PromiseState::Rejected,
        }
    }

    /// Returns true if this is a fulfillment.
    #[must_use]
    pub const fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled(_))
    }

    /// Returns true if this is a rejection.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Returns the fulfillment value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Fulfilled(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    /// Returns the rejection reason, if any.
    #[must_use]
    pub const fn reason(&self) -> Option<&E> {
        match self {
            Self::Fulfilled(_) => None,
            Self::Rejected(reason) => Some(reason),
        }
    }

    /// Converts the settlement into a `Result`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Fulfilled(value) => Ok(value),
            Self::Rejected(reason) => Err(reason),
        }
    }

    /// Maps the fulfillment value, leaving a rejection untouched.
    pub fn map_value<U, F: FnOnce(T) -> U>(self, f: F) -> Settlement<U, E> {
        match self {
            Self::Fulfilled(value) => Settlement::Fulfilled(f(value)),
            Self::Rejected(reason) => Settlement::Rejected(reason),
        }
    }

    /// Maps the rejection reason, leaving a fulfillment untouched.
    pub fn map_reason<D, F: FnOnce(E) -> D>(self, f: F) -> Settlement<T, D> {
        match self {
            Self::Fulfilled(value) => Settlement::Fulfilled(value),
            Self::Rejected(reason) => Settlement::Rejected(f(reason)),
        }
    }
}

impl<T, E> From<Result<T, E>> for Settlement<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Fulfilled(value),
            Err(reason) => Self::Rejected(reason),
        }
    }
}
