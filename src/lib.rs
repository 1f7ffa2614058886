//! websession — session management for a generated web API client.
//!
//! This library authenticates a user against the wrapped service (including
//! multi-factor flows), persists session cookies across requests with
//! correct expiry semantics, and transparently injects/captures cookies on
//! every request/response pair.
//!
//! # Architecture
//!
//! - [`cookie`] - `Set-Cookie` parsing and `cookie` header serialization
//! - [`cache`] - Expiring key/value store abstraction + in-memory default
//! - [`jar`] - Per-origin cookie jar over the cache
//! - [`pipeline`] - Ordered request/response interception chains
//! - [`client`] - Shared HTTP client and request execution
//! - [`api`] - The two consumed operations (identity fetch, factor verify)
//! - [`auth`] - Login state machine, code providers, TOTP derivation
//!
//! # Example
//!
//! ```no_run
//! use url::Url;
//! use websession::{LoginRequest, SessionClient, SessionConfig, login};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig::new(
//!     Url::parse("https://api.example.com/")?,
//!     "ops@example.com",
//! );
//! let client = SessionClient::new(config);
//!
//! let request = LoginRequest::new("kim", "hunter2").with_secret("GEZDGNBVGY3TQOJQ");
//! let identity = login(&client, request).await?;
//! println!("logged in as {}", identity.username);
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod cookie;
pub mod jar;
pub mod pipeline;
mod user_agent;

// Re-export commonly used types
pub use api::{CurrentUser, FactorChallenge, FactorVerification, Identity};
pub use auth::{CodeProvider, LoginError, LoginRequest, StaticCodeProvider, TotpProvider, login};
pub use cache::{CacheError, CacheKey, ExpiringCache, MemoryCache};
pub use client::{SessionClient, TransportError};
pub use config::SessionConfig;
pub use cookie::{Cookie, CookieCollection};
pub use jar::CookieJar;
pub use pipeline::{
    CredentialsMode, InboundResponse, InterceptorChain, OutboundRequest, RequestInterceptor,
    ResponseInterceptor,
};
