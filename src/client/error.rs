//! Transport-level error types for the session client.

use thiserror::Error;

use crate::cache::CacheError;

/// Errors surfaced by the transport layer and the pipeline around it.
///
/// These are pass-through failures: the login state machine propagates them
/// verbatim and never retries or rewraps them.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-level error (DNS resolution, connection refused, TLS, ...).
    #[error("network error calling {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP error response (4xx/5xx) from an operation that treats non-2xx
    /// as failure.
    #[error("HTTP {status} from {url}")]
    Status {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// A 2xx response whose body could not be deserialized.
    #[error("unreadable response body from {url}: {source}")]
    Body {
        /// The URL whose body failed to parse.
        url: String,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A response that violates the expected protocol shape.
    #[error("unexpected response from {url}: {message}")]
    Protocol {
        /// The URL that misbehaved.
        url: String,
        /// What was wrong.
        message: String,
    },

    /// A request URL could not be constructed from the configured base.
    #[error("invalid request URL: {url}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
    },

    /// Cookie-jar cache failure observed on the request/response path.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl TransportError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn status_error(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// The HTTP status, when this error carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
