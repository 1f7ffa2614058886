//! The two generated-API operations the session layer consumes.
//!
//! Everything else the wrapped service exposes is out of scope here; the
//! authentication flow only ever needs to fetch the current user's identity
//! and to verify a second factor. Both calls go through the shared client so
//! the interception pipeline sees them like any other request.

mod models;

pub use models::{CurrentUser, FactorChallenge, FactorVerification, Identity};

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::Deserialize;
use serde_json::json;

use crate::client::{SessionClient, TransportError};
use crate::pipeline::{CredentialsMode, OutboundRequest};

/// Identity endpoint path, relative to the configured base URL.
const CURRENT_USER_PATH: &str = "users/me";
/// Time-based one-time code verification endpoint path.
const VERIFY_TOTP_PATH: &str = "verify/totp";

/// Fetches the current user's identity record.
///
/// Returns either a full identity or a factor-required marker; the
/// distinction is made on the body shape, never on the status code.
///
/// # Errors
///
/// Returns [`TransportError`] on network failure, on any non-2xx status
/// (factor-required arrives with 2xx), or when a 2xx body cannot be parsed.
pub async fn fetch_current_user(
    client: &SessionClient,
    authorization: Option<HeaderValue>,
    credentials: CredentialsMode,
) -> Result<CurrentUser, TransportError> {
    let url = client.endpoint(CURRENT_USER_PATH)?;
    let mut request = OutboundRequest::new(Method::GET, url.clone()).credentials(credentials);
    if let Some(value) = authorization {
        request = request.header(AUTHORIZATION, value);
    }

    let response = client.execute(request).await?;
    if !response.status.is_success() {
        return Err(TransportError::status_error(
            url.as_str(),
            response.status.as_u16(),
        ));
    }

    response.json::<CurrentUser>().map_err(|source| TransportError::Body {
        url: url.to_string(),
        source,
    })
}

#[derive(Debug, Deserialize)]
struct VerifyBody {
    verified: bool,
}

/// Verifies a time-based one-time code against the TOTP endpoint.
///
/// Unlike [`fetch_current_user`], an HTTP error status is still a result
/// here: outcome classification needs the status (429 in particular), so
/// only network-level failures error out. An unparseable body counts as not
/// verified.
///
/// # Errors
///
/// Returns [`TransportError`] on network failure only.
pub async fn verify_totp(
    client: &SessionClient,
    code: &str,
) -> Result<FactorVerification, TransportError> {
    let url = client.endpoint(VERIFY_TOTP_PATH)?;
    let request = OutboundRequest::new(Method::POST, url).json(json!({ "code": code }));

    let response = client.execute(request).await?;
    let verified = response
        .json::<VerifyBody>()
        .map(|body| body.verified)
        .unwrap_or(false);

    Ok(FactorVerification {
        verified,
        status: response.status.as_u16(),
    })
}
