use crate::settings::StoreSettings;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;
use tinylink_core::error::Result;
use tinylink_core::{MappingStore, StoreError, Token};
use tracing::{debug, info, trace, warn};

/// A Redis-backed [`MappingStore`].
///
/// Each mapping is a plain string key (the token, optionally prefixed)
/// holding the raw URL, written with `SET .. EX` so Redis alone decides
/// when a mapping is gone. The multiplexed connection is opened once and
/// cloned per call; clones share the same socket.
#[derive(Debug, Clone)]
pub struct RedisMappingStore {
    conn: MultiplexedConnection,
    ttl: Duration,
    key_prefix: String,
}

/// Generates the Redis key for a token.
fn mapping_key(prefix: &str, token: &Token) -> String {
    format!("{}{}", prefix, token.as_str())
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StoreError::Timeout(message)
    } else {
        StoreError::Communication(message)
    }
}

impl RedisMappingStore {
    /// Connects to Redis and verifies the connection with `PING`.
    ///
    /// # Errors
    ///
    /// * `StoreError::Configuration` - the settings are invalid
    /// * `StoreError::Unavailable` - Redis is unreachable or rejects the
    ///   connection (bad credentials, wrong database, failed ping)
    pub async fn connect(settings: &StoreSettings) -> Result<Self> {
        settings.validate()?;

        let client = redis::Client::open(settings.connection_url()).map_err(|e| {
            StoreError::Configuration(format!("invalid redis address '{}': {e}", settings.address))
        })?;

        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                StoreError::Unavailable(format!(
                    "failed to connect to redis at {}: {e}",
                    settings.address
                ))
            })?;

        let store = Self::new(conn, settings.ttl, settings.key_prefix.clone());
        let pong = store.ping_raw().await.map_err(|e| {
            StoreError::Unavailable(format!(
                "redis at {} failed health check: {e}",
                settings.address
            ))
        })?;

        info!(address = %settings.address, db = settings.db, pong = %pong, "Connected to Redis");
        Ok(store)
    }

    /// Wraps an already verified connection. `ttl` must have passed
    /// [`StoreSettings::validate`].
    fn new(conn: MultiplexedConnection, ttl: Duration, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            ttl,
            key_prefix: key_prefix.into(),
        }
    }

    /// Releases this handle's share of the multiplexed connection.
    ///
    /// Clones share one socket, which closes when the last clone is dropped.
    /// Callers should drop every other clone first (e.g. once the server
    /// holding them has stopped) so that this call ends the connection.
    pub fn close(self) {
        info!("Closing Redis mapping store");
        drop(self.conn);
    }

    fn key(&self, token: &Token) -> String {
        mapping_key(&self.key_prefix, token)
    }

    async fn ping_raw(&self) -> std::result::Result<String, redis::RedisError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<String>(&mut conn).await
    }
}

#[async_trait]
impl MappingStore for RedisMappingStore {
    async fn put(&self, token: &Token, original_url: &str) -> Result<()> {
        let key = self.key(token);
        trace!(token = %token, "Writing mapping to Redis");

        let mut conn = self.conn.clone();
        match conn
            .set_ex::<_, _, ()>(&key, original_url, self.ttl.as_secs())
            .await
        {
            Ok(()) => {
                debug!(token = %token, ttl_secs = self.ttl.as_secs(), "Stored mapping in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(token = %token, error = %e, "Failed to store mapping in Redis");
                Err(map_redis_error("failed to write mapping to Redis", e))
            }
        }
    }

    async fn get(&self, token: &Token) -> Result<String> {
        let key = self.key(token);
        trace!(token = %token, "Fetching mapping from Redis");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(original_url)) => {
                debug!(token = %token, "Mapping found in Redis");
                Ok(original_url)
            }
            Ok(None) => {
                trace!(token = %token, "Mapping missing or expired in Redis");
                Err(StoreError::NotFound(token.to_string()))
            }
            Err(e) => {
                warn!(token = %token, error = %e, "Redis error on get");
                Err(map_redis_error("failed to read mapping from Redis", e))
            }
        }
    }

    async fn ping(&self) -> Result<()> {
        match self.ping_raw().await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Redis ping failed");
                Err(map_redis_error("failed to ping Redis", e))
            }
        }
    }
}
