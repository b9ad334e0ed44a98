use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::time::Duration;
use tinylink_core::{StoreError, RETENTION};
use typed_builder::TypedBuilder;

/// Connection and retention settings for a mapping store.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tinylink_store::StoreSettings;
///
/// // Local Redis, six hour retention
/// let settings = StoreSettings::builder().build();
///
/// let settings = StoreSettings::builder()
///     .address("redis.internal:6380")
///     .password("s3cret")
///     .db(2)
///     .ttl(Duration::from_secs(600))
///     .build();
/// ```
#[derive(Clone, TypedBuilder)]
pub struct StoreSettings {
    /// `host:port` of the Redis server.
    #[builder(default = "127.0.0.1:6379".to_string(), setter(into))]
    pub address: String,

    #[builder(default, setter(strip_option, into))]
    pub password: Option<String>,

    /// Redis logical database index.
    #[builder(default = 0)]
    pub db: i64,

    /// Retention of each mapping, restarted on every write.
    #[builder(default = RETENTION)]
    pub ttl: Duration,

    /// Prepended to every token to form the Redis key.
    #[builder(default, setter(into))]
    pub key_prefix: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl std::fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSettings")
            .field("address", &self.address)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("db", &self.db)
            .field("ttl", &self.ttl)
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl StoreSettings {
    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Configuration` if:
    /// - The address is empty
    /// - The TTL is shorter than one second (Redis expiry granularity)
    /// - The database index is negative
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.address.trim().is_empty() {
            return Err(StoreError::Configuration(
                "address must not be empty".to_string(),
            ));
        }

        if self.ttl < Duration::from_secs(1) {
            return Err(StoreError::Configuration(format!(
                "ttl must be at least one second, got {:?}",
                self.ttl
            )));
        }

        if self.db < 0 {
            return Err(StoreError::Configuration(format!(
                "db must not be negative, got {}",
                self.db
            )));
        }

        Ok(())
    }

    /// Builds the `redis://` connection URL. The password is percent-encoded.
    pub fn connection_url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}/{}",
                utf8_percent_encode(password, NON_ALPHANUMERIC),
                self.address,
                self.db
            ),
            None => format!("redis://{}/{}", self.address, self.db),
        }
    }
}
