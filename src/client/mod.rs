//! Shared session client.
//!
//! Centralizes HTTP client construction policy (timeouts, user-agent, gzip)
//! and request execution so every API call flows through the same
//! interception pipeline. reqwest's built-in cookie store stays disabled;
//! cookie persistence is owned by the [`CookieJar`] via the pipeline.

mod error;

pub use error::TransportError;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::instrument;
use url::Url;

use crate::cache::{ExpiringCache, MemoryCache};
use crate::config::SessionConfig;
use crate::jar::CookieJar;
use crate::pipeline::{
    CookieCapture, CookieInjector, Diagnostics, InboundResponse, InterceptorChain,
    OutboundRequest, RequestLogger, ResponseLogger,
};
use crate::user_agent;

/// Session-managing API client.
///
/// Created once and reused for all requests: connection pooling, the cookie
/// jar, and the diagnostics toggle are all shared across calls.
pub struct SessionClient {
    http: Client,
    base_url: Url,
    chain: InterceptorChain,
    jar: Arc<CookieJar>,
    diagnostics: Diagnostics,
}

impl SessionClient {
    /// Creates a client backed by the default in-memory cookie cache.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_cache(config, Arc::new(MemoryCache::new()))
    }

    /// Creates a client over an injected cookie-cache backing store.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    #[instrument(level = "debug", skip(config, cache), fields(base_url = %config.base_url))]
    pub fn with_cache(config: SessionConfig, cache: Arc<dyn ExpiringCache>) -> Self {
        let http = build_http_client(&config)
            .expect("failed to build HTTP client with static configuration");

        let jar = Arc::new(CookieJar::new(cache));
        let diagnostics = Diagnostics::new(config.diagnostics);

        let chain = InterceptorChain::new()
            .with_request(Box::new(RequestLogger::new(
                diagnostics.clone(),
                config.base_url.clone(),
            )))
            .with_request(Box::new(CookieInjector::new(Arc::clone(&jar))))
            .with_response(Box::new(CookieCapture::new(Arc::clone(&jar))))
            .with_response(Box::new(ResponseLogger::new(
                diagnostics.clone(),
                config.base_url.clone(),
            )));

        Self {
            http,
            base_url: config.base_url,
            chain,
            jar,
            diagnostics,
        }
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The shared cookie jar.
    #[must_use]
    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    /// Enables or disables request/response diagnostics at runtime.
    pub fn set_diagnostics(&self, enabled: bool) {
        self.diagnostics.set(enabled);
    }

    /// Resolves an operation path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] when the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url.join(path).map_err(|_| TransportError::InvalidUrl {
            url: format!("{}{path}", self.base_url),
        })
    }

    /// Executes a request through the interception pipeline.
    ///
    /// Request interceptors run in registration order before the send; the
    /// response body is fully materialized; response interceptors run in
    /// registration order before the response is returned.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on network failure or when a cookie stage
    /// cannot reach its backing cache. HTTP error statuses are NOT an error
    /// here; operations decide how to interpret them.
    pub async fn execute(
        &self,
        mut request: OutboundRequest,
    ) -> Result<InboundResponse, TransportError> {
        self.chain.apply_request(&mut request).await?;

        let OutboundRequest {
            method,
            url,
            headers,
            body,
            ..
        } = request;

        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| TransportError::network(url.as_str(), source))?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let final_url = response.url().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| TransportError::network(url.as_str(), source))?;

        let inbound = InboundResponse {
            status,
            method,
            url: final_url,
            headers: response_headers,
            body: bytes.to_vec(),
        };

        self.chain.apply_response(&inbound).await?;
        Ok(inbound)
    }
}

fn build_http_client(config: &SessionConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.read_timeout_secs))
        .user_agent(user_agent::session_user_agent(&config.contact))
        .gzip(true)
        .build()
}
