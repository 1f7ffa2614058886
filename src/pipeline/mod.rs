//! Ordered request/response interception pipeline.
//!
//! Every call made through the shared session client flows through two
//! chains: request interceptors run in registration order before the wire
//! send, response interceptors run in registration order after the body is
//! materialized. The built-in chain wires diagnostics logging around cookie
//! injection and capture:
//!
//! 1. request diagnostics (observer, toggleable)
//! 2. cookie injection (skipped for credential-less requests)
//! 3. cookie capture (always runs)
//! 4. response diagnostics (observer, toggleable)
//!
//! Observers never alter the request/response and swallow their own
//! failures; only the cookie stages touch shared state.

mod cookies;
mod log;
mod request;
mod response;

pub use cookies::{CookieCapture, CookieInjector};
pub use log::{Diagnostics, RequestLogger, ResponseLogger};
pub use request::{CredentialsMode, OutboundRequest};
pub use response::InboundResponse;

use async_trait::async_trait;

use crate::client::TransportError;

/// A transform applied to an outgoing request before it is sent.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Inspects or mutates the request in place.
    async fn handle(&self, request: &mut OutboundRequest) -> Result<(), TransportError>;
}

/// An observer applied to an incoming response after the body is read.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    /// Inspects the response. Implementations must not assume exclusive
    /// access to shared state beyond what their collaborators guarantee.
    async fn handle(&self, response: &InboundResponse) -> Result<(), TransportError>;
}

/// Ordered interceptor chains for the session client.
#[derive(Default)]
pub struct InterceptorChain {
    request: Vec<Box<dyn RequestInterceptor>>,
    response: Vec<Box<dyn ResponseInterceptor>>,
}

impl InterceptorChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a request interceptor. Registration order is execution order.
    #[must_use]
    pub fn with_request(mut self, interceptor: Box<dyn RequestInterceptor>) -> Self {
        self.request.push(interceptor);
        self
    }

    /// Appends a response interceptor. Registration order is execution order.
    #[must_use]
    pub fn with_response(mut self, interceptor: Box<dyn ResponseInterceptor>) -> Self {
        self.response.push(interceptor);
        self
    }

    /// Runs the request chain strictly in order, awaiting each stage.
    pub(crate) async fn apply_request(
        &self,
        request: &mut OutboundRequest,
    ) -> Result<(), TransportError> {
        for interceptor in &self.request {
            interceptor.handle(request).await?;
        }
        Ok(())
    }

    /// Runs the response chain strictly in order, awaiting each stage.
    pub(crate) async fn apply_response(
        &self,
        response: &InboundResponse,
    ) -> Result<(), TransportError> {
        for interceptor in &self.response {
            interceptor.handle(response).await?;
        }
        Ok(())
    }
}
