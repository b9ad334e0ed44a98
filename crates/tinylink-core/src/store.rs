use crate::error::Result;
use crate::token::Token;
use async_trait::async_trait;
use std::time::Duration;

/// How long a mapping stays retrievable after its last write.
pub const RETENTION: Duration = Duration::from_secs(6 * 60 * 60);

/// An expiring `token -> original URL` store.
///
/// Expiry is owned by the implementation: a mapping whose time-to-live has
/// elapsed must read back exactly like one that was never written.
/// Implementations are shared across request tasks and must be safe to
/// call concurrently without external locking.
#[async_trait]
pub trait MappingStore: Send + Sync + 'static {
    /// Stores `original_url` under `token`, replacing any previous value
    /// and restarting its time-to-live.
    async fn put(&self, token: &Token, original_url: &str) -> Result<()>;

    /// Returns the URL stored under `token`.
    ///
    /// Returns `Err(StoreError::NotFound)` if the token was never written
    /// or has expired.
    async fn get(&self, token: &Token) -> Result<String>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<()>;
}
