//! Promissory: deferred-value promises with deterministic, injectable
//! scheduling.
//!
//! # Overview
//!
//! A [`Promise`] represents a value or error that is not yet available.
//! It settles exactly once, `Pending → Fulfilled` or `Pending →
//! Rejected`, and every callback chained onto it runs exactly once,
//! asynchronously, in registration order. Resolution absorbs inner
//! deferred values: settle a promise with another promise (or a foreign
//! [`Thenable`]) and it adopts that value's eventual outcome instead of
//! fulfilling with the handle itself.
//!
//! # Core Guarantees
//!
//! - **Single settlement**: the first settlement wins; later attempts
//!   are no-ops, including from misbehaving executors and foreign
//!   thenables.
//! - **Deferred reactions**: a callback never runs in the same
//!   synchronous turn as the `then` or settlement that triggered it.
//! - **FIFO flush**: reactions run in registration order through the
//!   realm's [`Schedule`] capability.
//! - **Bounded adoption**: chains of thenables of any depth resolve in
//!   queue turns, never by stack recursion.
//!
//! # Module Structure
//!
//! - [`settlement`]: settled outcomes and observable states
//! - [`sched`]: the deferred-execution capability and the FIFO queue
//! - [`resolution`]: classification of resolution inputs; foreign
//!   thenable capabilities
//! - [`promise`]: the handle, chaining surface, settlement core, and
//!   resolution procedure
//! - [`combinator`]: `all` and `race`
//! - [`realm`]: construction entry points
//! - [`error`]: resolution protocol faults
//!
//! # Example
//!
//! ```
//! use promissory::{Realm, Resolution, Settlement};
//!
//! let (realm, queue) = Realm::deterministic();
//! let greeting = realm
//!     .fulfilled::<&str, String>(Resolution::value("hello"))
//!     .map(|s| s.to_uppercase());
//!
//! queue.run_until_idle();
//! assert_eq!(
//!     greeting.settlement(),
//!     Some(Settlement::Fulfilled("HELLO".to_string()))
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod combinator;
pub mod error;
pub mod promise;
pub mod realm;
pub mod resolution;
pub mod sched;
pub mod settlement;

pub use combinator::{all, race};
pub use error::ResolveError;
pub use promise::{Promise, Settler};
pub use realm::Realm;
pub use resolution::{
    Foreign, ForeignFulfill, ForeignReject, Probed, Resolution, ResolutionKind, Thenable,
};
pub use sched::{FifoScheduler, Schedule, SchedulerConfig, Task};
pub use settlement::{PromiseState, Settlement};
