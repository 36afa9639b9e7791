//! Aggregate combinators over collections of promises.
//!
//! Both combinators are built entirely out of `then` and factory calls;
//! their only state is the explicit per-subscription context each
//! element closes over:
//!
//! - [`all`]: waits for every input, preserving positional order; fails
//!   fast on the first rejection.
//! - [`race`]: mirrors whichever input settles first.
//!
//! Later settlements of other inputs land on an already-terminal result
//! core and are ignored; no extra bookkeeping is needed for them.

mod all;
mod race;

pub use all::all;
pub use race::race;
