//! Incoming response value passed through the interception pipeline.

use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// A materialized API response: status, headers, and the full body.
///
/// The body is owned bytes so every interceptor (and the caller) can read it
/// without consuming or locking anything for downstream stages.
#[derive(Debug, Clone)]
pub struct InboundResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Method of the originating request.
    pub method: Method,
    /// Final response URL (after any redirects).
    pub url: Url,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl InboundResponse {
    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error when the body is not valid
    /// JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Every `Set-Cookie` header occurrence on the response.
    ///
    /// Values that are not valid UTF-8 are skipped rather than raising.
    #[must_use]
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(ToString::to_string)
            .collect()
    }

    /// The response origin (scheme + host + port).
    #[must_use]
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    #[cfg(test)]
    pub(crate) fn for_tests(
        status: StatusCode,
        method: Method,
        url: Url,
        body: Vec<u8>,
    ) -> Self {
        Self {
            status,
            method,
            url,
            headers: HeaderMap::new(),
            body,
        }
    }
}
