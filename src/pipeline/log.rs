//! Diagnostic logging stages.
//!
//! Pure observers: they never alter the request/response, and anything that
//! goes wrong while rendering a body for the log is swallowed so diagnostics
//! can never break the primary flow.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;
use url::Url;

use super::{InboundResponse, OutboundRequest, RequestInterceptor, ResponseInterceptor};
use crate::client::TransportError;

/// Shared runtime toggle for request/response diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(Arc<AtomicBool>);

impl Diagnostics {
    /// Creates a toggle with an initial state.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Whether diagnostics are currently enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Enables or disables diagnostics at runtime.
    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }
}

/// Strips the client base URL from a request URL for compact log lines.
fn display_path(base_url: &Url, url: &Url) -> String {
    let base = base_url.as_str().trim_end_matches('/');
    url.as_str()
        .strip_prefix(base)
        .unwrap_or(url.as_str())
        .to_string()
}

fn render_body(body: Option<&Value>) -> String {
    body.map_or_else(String::new, Value::to_string)
}

/// Logs method, path, and body of outgoing requests when diagnostics are on.
pub struct RequestLogger {
    diagnostics: Diagnostics,
    base_url: Url,
}

impl RequestLogger {
    /// Creates the logger stage.
    #[must_use]
    pub fn new(diagnostics: Diagnostics, base_url: Url) -> Self {
        Self {
            diagnostics,
            base_url,
        }
    }
}

#[async_trait]
impl RequestInterceptor for RequestLogger {
    async fn handle(&self, request: &mut OutboundRequest) -> Result<(), TransportError> {
        if !self.diagnostics.enabled() {
            return Ok(());
        }

        info!(
            method = %request.method,
            path = %display_path(&self.base_url, &request.url),
            body = %render_body(request.body.as_ref()),
            "api request"
        );
        Ok(())
    }
}

/// Logs status, method, path, and parsed body of responses when diagnostics
/// are on. Bodies that fail to parse are elided, never propagated as errors.
pub struct ResponseLogger {
    diagnostics: Diagnostics,
    base_url: Url,
}

impl ResponseLogger {
    /// Creates the logger stage.
    #[must_use]
    pub fn new(diagnostics: Diagnostics, base_url: Url) -> Self {
        Self {
            diagnostics,
            base_url,
        }
    }
}

#[async_trait]
impl ResponseInterceptor for ResponseLogger {
    async fn handle(&self, response: &InboundResponse) -> Result<(), TransportError> {
        if !self.diagnostics.enabled() {
            return Ok(());
        }

        let body = response
            .json::<Value>()
            .map_or_else(|_| String::from("<non-json body>"), |value| value.to_string());
        info!(
            status = response.status.as_u16(),
            method = %response.method,
            path = %display_path(&self.base_url, &response.url),
            body = %body,
            "api response"
        );
        Ok(())
    }
}
