//! Login orchestration.
//!
//! Drives the authentication state machine: credentialed identity fetch,
//! factor-challenge detection, code resolution, concurrent factor
//! verification, outcome classification, and the final identity re-fetch
//! once the session cookie is established.

mod error;
mod provider;
mod totp;

pub use error::LoginError;
pub use provider::{CodeProvider, StaticCodeProvider, TotpProvider};
pub use totp::TotpError;

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures_util::future::join_all;
use reqwest::header::HeaderValue;
use tracing::{debug, instrument};

use crate::api::{self, CurrentUser, FactorVerification, Identity};
use crate::client::{SessionClient, TransportError};
use crate::pipeline::CredentialsMode;

/// Inputs to a login attempt.
///
/// At most one source of a second-factor code is consulted, in priority
/// order: an injected provider, a literal code, a shared secret (from which
/// a time-based code is derived).
pub struct LoginRequest {
    /// Account username.
    pub username: String,
    /// Account password (sensitive — never log).
    pub password: String,
    /// Base32 shared secret for time-based codes.
    pub two_factor_secret: Option<String>,
    /// Literal one-time code.
    pub two_factor_code: Option<String>,
    /// Caller-supplied code source, overriding both of the above.
    pub code_provider: Option<Arc<dyn CodeProvider>>,
}

impl LoginRequest {
    /// Creates a request with credentials only (no second factor).
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            two_factor_secret: None,
            two_factor_code: None,
            code_provider: None,
        }
    }

    /// Supplies a base32 shared secret.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.two_factor_secret = Some(secret.into());
        self
    }

    /// Supplies a literal one-time code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.two_factor_code = Some(code.into());
        self
    }

    /// Supplies a code provider.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn CodeProvider>) -> Self {
        self.code_provider = Some(provider);
        self
    }
}

// Credentials and factor inputs never appear in Debug output.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field(
                "two_factor_secret",
                &self.two_factor_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "two_factor_code",
                &self.two_factor_code.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "code_provider",
                &self.code_provider.as_ref().map(|_| "<provider>"),
            )
            .finish()
    }
}

/// Authenticates against the wrapped service.
///
/// Issues the identity fetch with Basic credentials and no ambient cookies;
/// when the body signals a factor challenge, resolves a one-time code,
/// dispatches every applicable verification strategy concurrently, classifies
/// the settled set, and on success re-fetches the identity over the
/// now-established session cookie.
///
/// # Errors
///
/// Domain failures ([`LoginError::MissingFactorInput`],
/// [`LoginError::InvalidCode`], [`LoginError::RateLimited`]) are synthesized
/// locally and never retried; transport failures are surfaced as-is.
#[instrument(level = "debug", skip(client, request), fields(username = %request.username))]
pub async fn login(
    client: &SessionClient,
    request: LoginRequest,
) -> Result<Identity, LoginError> {
    // Start: credentialed fetch, cookie jar explicitly omitted so a stale
    // session entry is never replayed alongside fresh credentials.
    let authorization = basic_authorization(&request.username, &request.password);
    let first = api::fetch_current_user(client, Some(authorization), CredentialsMode::Omit).await?;

    let challenge = match first {
        CurrentUser::Identity(identity) => {
            debug!("login complete without second factor");
            return Ok(identity);
        }
        CurrentUser::FactorRequired(challenge) => challenge,
    };
    debug!(factors = ?challenge.available_factors, "second factor required");

    let provider = resolve_code_provider(&request)?;
    let code = provider.code().await?;

    // Verifying: all strategies applicable to the code shape run
    // concurrently; classification waits for the full set.
    let strategies = applicable_strategies(&code);
    let outcomes = join_all(
        strategies
            .iter()
            .map(|strategy| strategy.verify(client, &code)),
    )
    .await;

    let mut results = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        results.push(outcome?);
    }
    classify(&results)?;

    // Succeeded: the session cookie captured during verification now
    // authenticates the re-fetch.
    let refreshed = api::fetch_current_user(client, None, CredentialsMode::Include).await?;
    match refreshed {
        CurrentUser::Identity(identity) => Ok(identity),
        CurrentUser::FactorRequired(_) => Err(LoginError::Transport(TransportError::Protocol {
            url: client.base_url().to_string(),
            message: String::from("identity re-fetch still reports a factor challenge"),
        })),
    }
}

/// Builds the `Basic` authorization header value.
///
/// Username and password are percent-encoded before the pair is
/// base64-encoded, so special characters (including `:`) survive intact.
fn basic_authorization(username: &str, password: &str) -> HeaderValue {
    let pair = format!(
        "{}:{}",
        urlencoding::encode(username),
        urlencoding::encode(password)
    );
    let token = BASE64.encode(pair.as_bytes());
    // percent-encoded input base64-encodes to visible ASCII
    #[allow(clippy::expect_used)]
    let mut value = HeaderValue::from_str(&format!("Basic {token}"))
        .expect("base64 authorization value is ASCII");
    value.set_sensitive(true);
    value
}

/// Resolves the code source in priority order: injected provider, literal
/// code, shared secret.
fn resolve_code_provider(request: &LoginRequest) -> Result<Arc<dyn CodeProvider>, LoginError> {
    if let Some(provider) = &request.code_provider {
        return Ok(Arc::clone(provider));
    }
    if let Some(code) = &request.two_factor_code {
        return Ok(Arc::new(StaticCodeProvider::new(code.clone())));
    }
    if let Some(secret) = &request.two_factor_secret {
        return Ok(Arc::new(TotpProvider::new(secret.clone())));
    }
    Err(LoginError::MissingFactorInput)
}

/// A factor-verification strategy.
///
/// Strategies are selected by code shape; kinds the service may add later
/// (email codes, recovery codes) plug in here with their own applicability
/// rule and endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FactorStrategy {
    /// Six-digit time-based one-time code.
    Totp,
}

impl FactorStrategy {
    async fn verify(
        self,
        client: &SessionClient,
        code: &str,
    ) -> Result<FactorVerification, TransportError> {
        match self {
            Self::Totp => api::verify_totp(client, code).await,
        }
    }
}

/// Strategies applicable to a code of the given shape.
fn applicable_strategies(code: &str) -> Vec<FactorStrategy> {
    let mut strategies = Vec::new();
    if code.len() == 6 {
        strategies.push(FactorStrategy::Totp);
    }
    strategies
}

/// Classifies the settled verification set, in priority order: any success
/// wins, then rate limiting, then generic failure. Strategies that were not
/// applicable contributed no result and cannot affect the outcome.
fn classify(results: &[FactorVerification]) -> Result<(), LoginError> {
    if results.iter().any(|result| result.verified) {
        return Ok(());
    }
    if results.iter().any(|result| result.status == 429) {
        return Err(LoginError::RateLimited);
    }
    Err(LoginError::InvalidCode)
}
