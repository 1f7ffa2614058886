//! One-time code providers.

use std::fmt;
use std::time::SystemTime;

use async_trait::async_trait;

use super::error::LoginError;
use super::totp;

/// A zero-argument source of one-time codes.
///
/// The login flow invokes the provider exactly once per attempt, at the
/// moment the factor challenge is observed, so time-based codes are as fresh
/// as possible.
#[async_trait]
pub trait CodeProvider: Send + Sync {
    /// Produces a code for factor verification.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::CodeProvider`] when no code can be produced.
    async fn code(&self) -> Result<String, LoginError>;
}

/// Provider wrapping a caller-supplied literal code.
pub struct StaticCodeProvider {
    code: String,
}

impl StaticCodeProvider {
    /// Wraps a literal code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

#[async_trait]
impl CodeProvider for StaticCodeProvider {
    async fn code(&self) -> Result<String, LoginError> {
        Ok(self.code.clone())
    }
}

/// Provider deriving a time-based one-time code from a shared secret.
pub struct TotpProvider {
    secret: String,
}

impl TotpProvider {
    /// Creates a provider from a base32 shared secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

// Secrets never appear in Debug output.
impl fmt::Debug for TotpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TotpProvider")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl CodeProvider for TotpProvider {
    async fn code(&self) -> Result<String, LoginError> {
        totp::derive_code(&self.secret, SystemTime::now())
            .map_err(|error| LoginError::CodeProvider(error.to_string()))
    }
}
