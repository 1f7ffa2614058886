//! Cookie injection and capture stages.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderValue};
use tracing::{debug, warn};

use super::{
    CredentialsMode, InboundResponse, OutboundRequest, RequestInterceptor, ResponseInterceptor,
};
use crate::client::TransportError;
use crate::jar::CookieJar;

/// Attaches the origin's current valid cookies to outgoing requests.
///
/// Skipped entirely when the request opts out of credentials. An empty jar
/// still produces a `cookie` header with an empty value, which clears any
/// transport-level default.
pub struct CookieInjector {
    jar: Arc<CookieJar>,
}

impl CookieInjector {
    /// Creates the injector over a shared jar.
    #[must_use]
    pub fn new(jar: Arc<CookieJar>) -> Self {
        Self { jar }
    }
}

#[async_trait]
impl RequestInterceptor for CookieInjector {
    async fn handle(&self, request: &mut OutboundRequest) -> Result<(), TransportError> {
        if request.credentials == CredentialsMode::Omit {
            return Ok(());
        }

        let collection = self.jar.cookies_for(&request.origin()).await?;
        let header = collection.header_value();
        debug!(
            origin = %request.origin(),
            cookies = collection.len(),
            "attaching session cookies"
        );

        match HeaderValue::from_str(&header) {
            Ok(value) => {
                request.headers.insert(COOKIE, value);
            }
            Err(error) => {
                // server-supplied values should always be header-safe
                warn!(error = %error, "skipping unrepresentable cookie header");
            }
        }
        Ok(())
    }
}

/// Merges every `Set-Cookie` occurrence back into the jar.
///
/// Runs on every response, including those of credential-less requests: the
/// merge still reads the origin's existing cookies so nothing observed is
/// lost.
pub struct CookieCapture {
    jar: Arc<CookieJar>,
}

impl CookieCapture {
    /// Creates the capture stage over a shared jar.
    #[must_use]
    pub fn new(jar: Arc<CookieJar>) -> Self {
        Self { jar }
    }
}

#[async_trait]
impl ResponseInterceptor for CookieCapture {
    async fn handle(&self, response: &InboundResponse) -> Result<(), TransportError> {
        let headers = response.set_cookie_headers();
        self.jar.store(&response.origin(), &headers).await?;
        Ok(())
    }
}
