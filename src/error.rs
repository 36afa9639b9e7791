//! Error types for the resolution machinery.
//!
//! There are two independent failure channels in this crate:
//!
//! - **Protocol faults**: violations of the resolution protocol itself.
//!   Most of these are unrepresentable in Rust (a closure is always
//!   callable, combinator inputs are always ordered sequences), so the
//!   only fault that can actually occur at runtime is a promise adopting
//!   its own settlement. Such faults are injected into the rejection
//!   channel via `E: From<ResolveError>`.
//! - **Settlement-carried rejection**: the ordinary failure outcome of a
//!   promise, carried as data in [`Settlement::Rejected`] and propagated
//!   exclusively through `then`/resolution. It is not an error type and
//!   has no representation here.
//!
//! [`Settlement::Rejected`]: crate::settlement::Settlement::Rejected

use thiserror::Error;

/// Faults raised by the resolution procedure.
///
/// A promise's rejection reason type `E` must implement
/// `From<ResolveError>` so these faults can travel down the ordinary
/// rejection channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A promise was asked to adopt its own settlement.
    ///
    /// Adopting oneself can never terminate, so the resolution procedure
    /// rejects instead of deadlocking. Only direct self-adoption is
    /// detected; cycles through intermediate promises are not.
    #[error("promise resolved with itself")]
    SelfAdoption,
}

impl From<ResolveError> for String {
    fn from(error: ResolveError) -> Self {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_adoption_display() {
        let error = ResolveError::SelfAdoption;
        assert_eq!(error.to_string(), "promise resolved with itself");
    }

    #[test]
    fn converts_into_string_reason() {
        let reason: String = ResolveError::SelfAdoption.into();
        assert!(reason.contains("resolved with itself"));
    }
}
