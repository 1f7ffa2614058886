//! Default in-memory cache implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::OnceCell;

use super::{CacheError, CacheKey, ExpiringCache};

struct StoredEntry {
    value: Value,
    /// Eviction deadline; `None` for unbounded entries.
    deadline: Option<Instant>,
}

/// In-process [`ExpiringCache`] over a concurrent hash map.
///
/// Expired entries are evicted lazily on read; there is no sweeper task.
/// Suitable as the default cookie-jar backing store when no external cache
/// is injected.
#[derive(Default)]
pub struct MemoryCache {
    started: OnceCell<()>,
    entries: DashMap<CacheKey, StoredEntry>,
}

impl MemoryCache {
    /// Creates an empty, not-yet-started cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpiringCache for MemoryCache {
    async fn start(&self) -> Result<(), CacheError> {
        self.started.get_or_init(|| async {}).await;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.started.initialized()
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        if !self.is_ready() {
            return Err(CacheError::NotReady);
        }

        let Some(entry) = self.entries.get(key) else {
            return Ok(None);
        };

        if entry
            .deadline
            .is_some_and(|deadline| deadline <= Instant::now())
        {
            drop(entry);
            // remove_if so a concurrent fresh set for the same key survives
            self.entries.remove_if(key, |_, stored| {
                stored
                    .deadline
                    .is_some_and(|deadline| deadline <= Instant::now())
            });
            return Ok(None);
        }

        Ok(Some(entry.value.clone()))
    }

    async fn set(
        &self,
        key: &CacheKey,
        value: Value,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        if !self.is_ready() {
            return Err(CacheError::NotReady);
        }

        // checked_add: a ttl too large to represent degrades to unbounded
        let deadline = ttl.and_then(|ttl| Instant::now().checked_add(ttl));
        self.entries
            .insert(key.clone(), StoredEntry { value, deadline });
        Ok(())
    }
}
