//! Expiring key/value cache abstraction backing the cookie jar.
//!
//! The jar never talks to a concrete store; it consumes the [`ExpiringCache`]
//! capability, which any backing technology can satisfy as long as it offers
//! idempotent startup, readiness probing, and atomic per-key set semantics.
//! [`MemoryCache`] is the default in-process implementation.

mod memory;

pub use memory::MemoryCache;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// Composite cache key: a segment (namespace) plus an id within it.
///
/// The jar uses the request origin as the segment and a fixed id for the
/// cookie collection, so session state never leaks across hosts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Namespace, e.g. a request origin.
    pub segment: String,
    /// Entry id within the segment.
    pub id: String,
}

impl CacheKey {
    /// Creates a key from a segment and id.
    #[must_use]
    pub fn new(segment: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            id: id.into(),
        }
    }
}

/// Errors surfaced by cache implementations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache was used before `start` completed.
    #[error("cache is not ready; call start() first")]
    NotReady,

    /// Backend-specific failure (connection loss, serialization, ...).
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// A lifecycle-managed key/value store with per-entry time-to-live.
///
/// Implementations must be safe for concurrent use from multiple in-flight
/// operations; the jar performs read-modify-write cycles against single keys
/// and relies on atomic per-key `set` semantics, never on cross-key
/// transactions.
#[async_trait]
pub trait ExpiringCache: Send + Sync {
    /// Initializes the store. Idempotent: repeated calls are no-ops once the
    /// first succeeds.
    async fn start(&self) -> Result<(), CacheError>;

    /// Whether `start` has completed.
    fn is_ready(&self) -> bool;

    /// Reads an entry, or `None` when absent or already expired.
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError>;

    /// Writes an entry with a time-to-live. `None` means unbounded: the
    /// entry lives until overwritten or the backend evicts it.
    async fn set(
        &self,
        key: &CacheKey,
        value: Value,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>;
}
