#![allow(dead_code)]

//! Shared integration test utilities.
//!
//! Import with:
//! ```
//! mod common;
//! use common::*;
//! ```

use promissory::{
    FifoScheduler, ForeignFulfill, ForeignReject, Realm, Resolution, ResolveError, Thenable,
};
use std::sync::{Arc, Mutex, Once};

static INIT_LOGGING: Once = Once::new();

/// Initialize test logging with trace-level output.
///
/// Safe to call multiple times; only initializes once.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .with_target(true)
            .with_ansi(false)
            .try_init();
    });
}

/// Create a realm over a fresh deterministic queue, with logging up.
pub fn test_realm() -> (Realm, Arc<FifoScheduler>) {
    init_test_logging();
    Realm::deterministic()
}

/// Rejection reason used across the integration suites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// A numeric reason, for the settle-order scenarios.
    Code(i32),
    /// A descriptive reason.
    Text(String),
    /// A resolution protocol fault.
    Fault(ResolveError),
}

impl Reason {
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<ResolveError> for Reason {
    fn from(error: ResolveError) -> Self {
        Self::Fault(error)
    }
}

/// An ordered log of observed events, shared across reactions.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn record(log: &EventLog, entry: impl Into<String>) {
    log.lock().unwrap().push(entry.into());
}

pub fn entries(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// A well-behaved foreign thenable: fulfills once, synchronously.
pub struct ImmediateThenable(pub i32);

impl Thenable<i32, Reason> for ImmediateThenable {
    fn subscribe(
        self: Box<Self>,
        mut on_fulfilled: ForeignFulfill<i32, Reason>,
        _on_rejected: ForeignReject<Reason>,
    ) -> Result<(), Reason> {
        on_fulfilled(Resolution::value(self.0));
        Ok(())
    }
}

/// A well-behaved foreign thenable: rejects once, synchronously.
pub struct RejectingThenable(pub Reason);

impl Thenable<i32, Reason> for RejectingThenable {
    fn subscribe(
        self: Box<Self>,
        _on_fulfilled: ForeignFulfill<i32, Reason>,
        mut on_rejected: ForeignReject<Reason>,
    ) -> Result<(), Reason> {
        on_rejected(self.0);
        Ok(())
    }
}

/// A misbehaving thenable that fulfills twice, then rejects.
pub struct OvereagerThenable {
    pub first: i32,
    pub second: i32,
}

impl Thenable<i32, Reason> for OvereagerThenable {
    fn subscribe(
        self: Box<Self>,
        mut on_fulfilled: ForeignFulfill<i32, Reason>,
        mut on_rejected: ForeignReject<Reason>,
    ) -> Result<(), Reason> {
        on_fulfilled(Resolution::value(self.first));
        on_fulfilled(Resolution::value(self.second));
        on_rejected(Reason::text("and a rejection for good measure"));
        Ok(())
    }
}

/// A thenable that fulfills with another thenable, `depth` levels deep.
///
/// The innermost level fulfills with `depth * 0`, i.e. `0`.
pub struct ChainThenable {
    pub depth: u32,
}

impl Thenable<i32, Reason> for ChainThenable {
    fn subscribe(
        self: Box<Self>,
        mut on_fulfilled: ForeignFulfill<i32, Reason>,
        _on_rejected: ForeignReject<Reason>,
    ) -> Result<(), Reason> {
        if self.depth == 0 {
            on_fulfilled(Resolution::value(0));
        } else {
            on_fulfilled(Resolution::thenable(ChainThenable {
                depth: self.depth - 1,
            }));
        }
        Ok(())
    }
}
