//! Per-origin cookie jar over the expiring cache.
//!
//! The jar computes the current valid cookie set for a request origin and
//! merges newly observed `Set-Cookie` headers back into the cache with a
//! recomputed time-to-live. It owns no storage of its own: all state lives
//! behind the injected [`ExpiringCache`].

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::{debug, instrument, warn};

use crate::cache::{CacheError, CacheKey, ExpiringCache};
use crate::cookie::{Cookie, CookieCollection};

/// Fixed entry id within each origin segment.
const COOKIES_ID: &str = "cookies";

/// Origin-scoped cookie storage with expiry-aware reads and TTL-bearing
/// merge writes.
///
/// The cache instance is shared: it is passed once at construction and
/// reused across all requests. Concurrent `store` calls for the same origin
/// resolve last-write-wins at the cache key; the jar adds no locking of its
/// own.
pub struct CookieJar {
    cache: Arc<dyn ExpiringCache>,
}

impl CookieJar {
    /// Creates a jar over the given cache.
    #[must_use]
    pub fn new(cache: Arc<dyn ExpiringCache>) -> Self {
        Self { cache }
    }

    /// Awaits cache readiness. The first jar operation initializes the
    /// cache; later operations only probe the readiness flag.
    async fn ensure_ready(&self) -> Result<(), CacheError> {
        if !self.cache.is_ready() {
            self.cache.start().await?;
        }
        Ok(())
    }

    /// Returns the current valid (non-expired) cookies for an origin.
    ///
    /// Expired entries are dropped from the caller's view only; the read
    /// never writes back to the store, keeping the hot path write-free. A
    /// missing or unreadable entry yields an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backing cache fails.
    #[instrument(level = "debug", skip(self))]
    pub async fn cookies_for(&self, origin: &str) -> Result<CookieCollection, CacheError> {
        self.ensure_ready().await?;

        let key = CacheKey::new(origin, COOKIES_ID);
        let Some(value) = self.cache.get(&key).await? else {
            return Ok(CookieCollection::new());
        };

        let collection: CookieCollection = match serde_json::from_value(value) {
            Ok(collection) => collection,
            Err(error) => {
                warn!(origin, error = %error, "discarding unreadable cookie cache entry");
                return Ok(CookieCollection::new());
            }
        };

        Ok(collection.retain_valid(SystemTime::now()))
    }

    /// Merges newly observed `Set-Cookie` headers into the origin's jar.
    ///
    /// New values overwrite existing cookies of the same name. The entry's
    /// TTL tracks the soonest-expiring cookie in the merged collection, so
    /// the jar entry disappears no later than any cookie it contains becomes
    /// invalid; a collection of only session cookies is stored unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backing cache fails.
    #[instrument(level = "debug", skip(self, set_cookie_headers))]
    pub async fn store(
        &self,
        origin: &str,
        set_cookie_headers: &[String],
    ) -> Result<(), CacheError> {
        if set_cookie_headers.is_empty() {
            return Ok(());
        }

        let mut collection = self.cookies_for(origin).await?;
        for header in set_cookie_headers {
            collection.insert(Cookie::parse(header));
        }

        if collection.is_empty() {
            return Ok(());
        }

        let now = SystemTime::now();
        let ttl = collection.earliest_expiry().map(|deadline| {
            deadline
                .duration_since(now)
                .unwrap_or(Duration::ZERO)
        });

        debug!(
            origin,
            cookies = collection.len(),
            ttl_secs = ttl.map(|ttl| ttl.as_secs()),
            "merged cookies into jar"
        );

        let key = CacheKey::new(origin, COOKIES_ID);
        let value = serde_json::to_value(&collection)
            .map_err(|error| CacheError::Backend(error.to_string()))?;
        self.cache.set(&key, value, ttl).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;

    const ORIGIN: &str = "https://api.example.com";

    fn jar() -> CookieJar {
        CookieJar::new(Arc::new(MemoryCache::new()))
    }

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn test_first_operation_initializes_cache() {
        let jar = jar();
        let collection = jar.cookies_for(ORIGIN).await.unwrap();
        assert!(collection.is_empty());
    }

    #[tokio::test]
    async fn test_store_then_read_round_trip() {
        let jar = jar();
        jar.store(ORIGIN, &headers(&["sid=abc; Max-Age=3600"]))
            .await
            .unwrap();

        let collection = jar.cookies_for(ORIGIN).await.unwrap();
        assert_eq!(collection.get("sid").map(Cookie::value), Some("abc"));
    }

    #[tokio::test]
    async fn test_store_merges_rather_than_replaces() {
        let jar = jar();
        jar.store(ORIGIN, &headers(&["a=1"])).await.unwrap();
        jar.store(ORIGIN, &headers(&["b=2"])).await.unwrap();

        let collection = jar.cookies_for(ORIGIN).await.unwrap();
        assert_eq!(collection.get("a").map(Cookie::value), Some("1"));
        assert_eq!(collection.get("b").map(Cookie::value), Some("2"));
    }

    #[tokio::test]
    async fn test_store_overwrites_same_name() {
        let jar = jar();
        jar.store(ORIGIN, &headers(&["a=1"])).await.unwrap();
        jar.store(ORIGIN, &headers(&["a=2"])).await.unwrap();

        let collection = jar.cookies_for(ORIGIN).await.unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("a").map(Cookie::value), Some("2"));
    }

    #[tokio::test]
    async fn test_store_empty_headers_is_noop() {
        let jar = jar();
        jar.store(ORIGIN, &[]).await.unwrap();
        assert!(jar.cookies_for(ORIGIN).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_origins_are_isolated() {
        let jar = jar();
        jar.store(ORIGIN, &headers(&["sid=abc"])).await.unwrap();

        let other = jar.cookies_for("https://other.example.com").await.unwrap();
        assert!(other.is_empty(), "cookies must not leak across origins");
    }

    #[tokio::test]
    async fn test_read_filters_entries_that_expired_in_the_store() {
        use std::time::{Duration, SystemTime};

        // Seed the store directly with a collection whose first cookie died
        // an hour ago: physically present, logically expired.
        let past = SystemTime::now() - Duration::from_secs(3600);
        let mut collection = CookieCollection::new();
        collection.insert(Cookie::parse_at("dead=1; Max-Age=60", past));
        collection.insert(Cookie::parse_at("alive=2; Max-Age=86400", past));

        let cache = Arc::new(MemoryCache::new());
        cache.start().await.unwrap();
        cache
            .set(
                &CacheKey::new(ORIGIN, "cookies"),
                serde_json::to_value(&collection).unwrap(),
                None,
            )
            .await
            .unwrap();

        let jar = CookieJar::new(cache);
        let filtered = jar.cookies_for(ORIGIN).await.unwrap();
        assert!(filtered.get("dead").is_none());
        assert!(filtered.get("alive").is_some());
    }

    #[tokio::test]
    async fn test_session_only_collection_is_stored_unbounded() {
        let cache = Arc::new(MemoryCache::new());
        let jar = CookieJar::new(Arc::clone(&cache) as Arc<dyn ExpiringCache>);
        jar.store(ORIGIN, &headers(&["sid=abc"])).await.unwrap();

        // the raw entry is still present: no expiry means no ttl
        let raw = cache
            .get(&CacheKey::new(ORIGIN, "cookies"))
            .await
            .unwrap();
        assert!(raw.is_some());
    }

    #[tokio::test]
    async fn test_entry_ttl_tracks_earliest_expiring_cookie() {
        let cache = Arc::new(MemoryCache::new());
        let jar = CookieJar::new(Arc::clone(&cache) as Arc<dyn ExpiringCache>);
        // one already-dead cookie pins the merged ttl to zero
        jar.store(ORIGIN, &headers(&["short=1; Max-Age=0", "long=2; Max-Age=3600"]))
            .await
            .unwrap();

        let raw = cache
            .get(&CacheKey::new(ORIGIN, "cookies"))
            .await
            .unwrap();
        assert!(raw.is_none(), "entry ttl must follow the soonest expiry");
    }

    #[tokio::test]
    async fn test_unreadable_entry_degrades_to_empty() {
        let cache = Arc::new(MemoryCache::new());
        cache.start().await.unwrap();
        cache
            .set(
                &CacheKey::new(ORIGIN, "cookies"),
                serde_json::json!("not a collection"),
                None,
            )
            .await
            .unwrap();

        let jar = CookieJar::new(cache);
        let collection = jar.cookies_for(ORIGIN).await.unwrap();
        assert!(collection.is_empty());
    }
}
