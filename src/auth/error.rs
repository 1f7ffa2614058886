//! Login error types.

use thiserror::Error;

use crate::client::TransportError;

/// Errors produced by the login flow.
///
/// Domain failures are synthesized locally with fixed messages and status
/// codes and never retried; transport failures pass through unchanged.
#[derive(Debug, Error)]
pub enum LoginError {
    /// A factor was required but no secret, code, or provider was supplied.
    /// No verification calls are made in this case.
    #[error("Missing two-factor authentication, incomplete login flow")]
    MissingFactorInput,

    /// No applicable factor strategy accepted the code.
    #[error("Invalid two-factor authentication code")]
    InvalidCode,

    /// The service rate-limited factor verification.
    #[error("Too many attempts, try again later")]
    RateLimited,

    /// The code provider failed to produce a code (e.g. malformed secret).
    #[error("two-factor code provider failed: {0}")]
    CodeProvider(String),

    /// Transport-level failure, surfaced as-is.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl LoginError {
    /// The status code of the structured error, when this is a domain
    /// failure; for transport failures, the HTTP status when one exists.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::MissingFactorInput | Self::InvalidCode | Self::CodeProvider(_) => Some(400),
            Self::RateLimited => Some(429),
            Self::Transport(error) => error.status(),
        }
    }
}
