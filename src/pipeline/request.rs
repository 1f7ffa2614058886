//! Outgoing request value passed through the interception pipeline.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use url::Url;

/// Whether a request participates in ambient session credentials.
///
/// `Omit` keeps the cookie jar out of the request entirely; the login flow
/// uses it for the initial credentialed fetch so a stale session cookie is
/// never replayed alongside fresh Basic credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialsMode {
    /// Attach cookies from the jar (default).
    #[default]
    Include,
    /// Never read from or attach the cookie jar.
    Omit,
}

/// An outgoing API request before transport.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
    /// Headers accumulated so far (interceptors may add more).
    pub headers: HeaderMap,
    /// Optional JSON body.
    pub body: Option<Value>,
    /// Credential participation for this call.
    pub credentials: CredentialsMode,
}

impl OutboundRequest {
    /// Creates a request with default (ambient) credentials.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            credentials: CredentialsMode::default(),
        }
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the credentials mode.
    #[must_use]
    pub fn credentials(mut self, mode: CredentialsMode) -> Self {
        self.credentials = mode;
        self
    }

    /// The request origin (scheme + host + port): the cookie scoping key.
    #[must_use]
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }
}
