use async_trait::async_trait;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tinylink_core::error::Result;
use tinylink_core::{MappingStore, StoreError, Token, RETENTION};
use tracing::{debug, trace};

/// In-memory storage entry for a mapping.
#[derive(Debug, Clone)]
struct Entry {
    original_url: String,
    expire_at: Timestamp,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }

    fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expire_at
    }
}

/// Upper bound on the time between two sweeps.
const MAX_SWEEP_INTERVAL: SignedDuration = SignedDuration::from_secs(60);

/// In-memory implementation of [`MappingStore`] using DashMap.
///
/// A read past the deadline drops its own entry. Writes also sweep the
/// whole map, at most once per `min(ttl, 60s)`, so entries that are never
/// read again are released too.
#[derive(Debug)]
pub struct InMemoryMappingStore {
    storage: DashMap<String, Entry>,
    ttl: SignedDuration,
    sweep_interval_ms: i64,
    /// Unix milliseconds after which the next write sweeps.
    next_sweep_ms: AtomicI64,
}

impl InMemoryMappingStore {
    /// Creates a store with the default six hour retention.
    pub fn new() -> Self {
        Self::from_signed_ttl(SignedDuration::from_secs(RETENTION.as_secs() as i64))
    }

    fn from_signed_ttl(ttl: SignedDuration) -> Self {
        let interval = ttl.min(MAX_SWEEP_INTERVAL);
        Self {
            storage: DashMap::new(),
            ttl,
            sweep_interval_ms: interval.as_millis().max(1) as i64,
            next_sweep_ms: AtomicI64::new(0),
        }
    }

    /// Creates a store with a custom retention.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Configuration` if `ttl` is zero or too large to
    /// add to a timestamp.
    pub fn with_ttl(ttl: Duration) -> Result<Self> {
        if ttl.is_zero() {
            return Err(StoreError::Configuration(
                "ttl must be greater than zero".to_string(),
            ));
        }
        let ttl = SignedDuration::try_from(ttl)
            .map_err(|e| StoreError::Configuration(format!("ttl {ttl:?} out of range: {e}")))?;

        Ok(Self::from_signed_ttl(ttl))
    }

    /// Number of entries held, expired or not.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Timestamp::now();
        let before = self.storage.len();
        self.storage.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before.saturating_sub(self.storage.len());
        if removed > 0 {
            debug!(removed, "Swept expired mappings from memory");
        }
        removed
    }

    /// Runs [`purge_expired`](Self::purge_expired) if a sweep is due. Only
    /// one concurrent caller wins the slot.
    fn sweep_if_due(&self) {
        let now_ms = Timestamp::now().as_millisecond();
        let due = self.next_sweep_ms.load(Ordering::Acquire);
        if now_ms < due {
            return;
        }

        let next = now_ms.saturating_add(self.sweep_interval_ms);
        if self
            .next_sweep_ms
            .compare_exchange(due, next, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.purge_expired();
        }
    }
}

impl Default for InMemoryMappingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MappingStore for InMemoryMappingStore {
    async fn put(&self, token: &Token, original_url: &str) -> Result<()> {
        let expire_at = Timestamp::now().checked_add(self.ttl).map_err(|e| {
            StoreError::Configuration(format!("cannot compute expiry for {token}: {e}"))
        })?;

        self.sweep_if_due();

        // Last write wins and restarts the retention window.
        self.storage.insert(
            token.as_str().to_owned(),
            Entry {
                original_url: original_url.to_owned(),
                expire_at,
            },
        );
        debug!(token = %token, expire_at = %expire_at, "Stored mapping in memory");
        Ok(())
    }

    async fn get(&self, token: &Token) -> Result<String> {
        let key = token.as_str();

        let Some(entry) = self.storage.get(key) else {
            trace!(token = %token, "Mapping not found in memory");
            return Err(StoreError::NotFound(token.to_string()));
        };

        if entry.is_expired() {
            drop(entry);
            // Only evict if no newer write replaced it in the meantime.
            self.storage.remove_if(key, |_, e| e.is_expired());
            trace!(token = %token, "Mapping expired in memory");
            return Err(StoreError::NotFound(token.to_string()));
        }

        Ok(entry.original_url.clone())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn token(s: &str) -> Token {
        Token::parse(s).unwrap()
    }

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryMappingStore::new();
        let t = token("fSjjvszt");

        store
            .put(&t, "https://opensource.tencent.com/summer-of-code")
            .await
            .unwrap();

        let url = store.get(&t).await.unwrap();
        assert_eq!(url, "https://opensource.tencent.com/summer-of-code");
    }

    #[tokio::test]
    async fn round_trip_is_verbatim() {
        let store = InMemoryMappingStore::new();
        let t = token("GYw5AcQz");
        let url = "HTTPS://Example.com:443/a/../b?q=1&q=2&x=%20y#Frag ment";

        store.put(&t, url).await.unwrap();

        assert_eq!(store.get(&t).await.unwrap(), url);
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let store = InMemoryMappingStore::new();

        let err = store.get(&token("EPz1wNJG")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = InMemoryMappingStore::new();
        let t = token("fSjjvszt");

        store.put(&t, "https://first.example").await.unwrap();
        store.put(&t, "https://second.example").await.unwrap();

        assert_eq!(store.get(&t).await.unwrap(), "https://second.example");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn expired_entry_is_not_found_and_evicted() {
        let store = InMemoryMappingStore::with_ttl(Duration::from_millis(50)).unwrap();
        let t = token("fSjjvszt");

        store.put(&t, "https://example.com").await.unwrap();
        assert!(store.get(&t).await.is_ok());

        tokio::time::sleep(Duration::from_millis(120)).await;

        let err = store.get(&t).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn overwrite_restarts_retention() {
        let store = InMemoryMappingStore::with_ttl(Duration::from_millis(200)).unwrap();
        let t = token("fSjjvszt");

        store.put(&t, "https://example.com/old").await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        store.put(&t, "https://example.com/new").await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        // 240ms after the first write, 120ms after the second
        assert_eq!(store.get(&t).await.unwrap(), "https://example.com/new");
    }

    #[tokio::test]
    async fn write_releases_expired_unread_entries() {
        let store = InMemoryMappingStore::with_ttl(Duration::from_millis(10)).unwrap();

        for i in 0..1000u32 {
            let t = Token::new_unchecked(format!("{i:0>8}").replace('0', "z"));
            store.put(&t, "https://example.com").await.unwrap();
        }
        assert!(!store.is_empty());

        tokio::time::sleep(Duration::from_millis(50)).await;
        store.put(&token("fSjjvszt"), "https://example.com/live").await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&token("fSjjvszt")).await.unwrap(),
            "https://example.com/live"
        );
    }

    #[tokio::test]
    async fn purge_keeps_live_entries() {
        let store = InMemoryMappingStore::with_ttl(Duration::from_millis(100)).unwrap();

        store.put(&token("GYw5AcQz"), "https://example.com/old").await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        store.put(&token("EPz1wNJG"), "https://example.com/new").await.unwrap();

        assert_eq!(store.purge_expired(), 0);
        assert_eq!(store.len(), 1);
        assert!(store.get(&token("EPz1wNJG")).await.is_ok());
        assert!(store.get(&token("GYw5AcQz")).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn zero_ttl_is_rejected() {
        let result = InMemoryMappingStore::with_ttl(Duration::ZERO);
        assert!(matches!(result, Err(StoreError::Configuration(_))));
    }

    #[tokio::test]
    async fn concurrent_writers_and_readers() {
        let store = Arc::new(InMemoryMappingStore::new());
        let tokens = ["fSjjvszt", "GYw5AcQz", "EPz1wNJG", "UXg88A7a"];

        let mut handles = Vec::new();
        for (i, t) in tokens.iter().enumerate() {
            let store = Arc::clone(&store);
            let t = token(t);
            handles.push(tokio::spawn(async move {
                let url = format!("https://example.com/{i}");
                store.put(&t, &url).await.unwrap();
                assert_eq!(store.get(&t).await.unwrap(), url);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.len(), tokens.len());
    }

    #[tokio::test]
    async fn ping_always_succeeds() {
        assert!(InMemoryMappingStore::new().ping().await.is_ok());
    }
}
