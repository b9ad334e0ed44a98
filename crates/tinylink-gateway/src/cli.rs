use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;
use tinylink_store::StoreSettings;

pub const LISTEN_ADDR_ENV: &str = "TINYLINK_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "TINYLINK_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "TINYLINK_STORAGE_BACKEND";
pub const REDIS_ADDR_ENV: &str = "TINYLINK_REDIS_ADDR";
pub const REDIS_PASSWORD_ENV: &str = "TINYLINK_REDIS_PASSWORD";
pub const REDIS_DB_ENV: &str = "TINYLINK_REDIS_DB";
pub const TTL_SECS_ENV: &str = "TINYLINK_TTL_SECS";
pub const LOG_FORMAT_ENV: &str = "TINYLINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REDIS_ADDR: &str = "127.0.0.1:6379";
pub const DEFAULT_TTL_SECS: &str = "21600";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "tinylink-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public prefix of every short url handed out.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Redis
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = REDIS_ADDR_ENV, default_value = DEFAULT_REDIS_ADDR)]
    pub redis_addr: String,

    #[arg(long, env = REDIS_PASSWORD_ENV, hide_env_values = true)]
    pub redis_password: Option<String>,

    #[arg(long, env = REDIS_DB_ENV, default_value_t = 0)]
    pub redis_db: i64,

    /// Retention of each mapping, in seconds.
    #[arg(long, env = TTL_SECS_ENV, default_value = DEFAULT_TTL_SECS)]
    pub ttl_secs: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}

impl CLI {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn store_settings(&self) -> StoreSettings {
        let settings = StoreSettings::builder()
            .address(self.redis_addr.clone())
            .db(self.redis_db)
            .ttl(self.ttl())
            .build();

        StoreSettings {
            password: self.redis_password.clone(),
            ..settings
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["gateway"]).unwrap();
        assert_eq!(cli.listen_addr, DEFAULT_LISTEN_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
        assert_eq!(cli.storage, StorageBackendArg::Redis);
        assert_eq!(cli.ttl(), Duration::from_secs(6 * 60 * 60));
        assert_eq!(cli.log_format, LogFormatArg::Text);
    }

    #[test]
    fn store_settings_from_flags() {
        let cli = CLI::try_parse_from([
            "gateway",
            "--redis-addr",
            "cache:6380",
            "--redis-password",
            "s3cret",
            "--redis-db",
            "2",
            "--ttl-secs",
            "60",
        ])
        .unwrap();

        let settings = cli.store_settings();
        assert_eq!(settings.address, "cache:6380");
        assert_eq!(settings.password.as_deref(), Some("s3cret"));
        assert_eq!(settings.db, 2);
        assert_eq!(settings.ttl, Duration::from_secs(60));
        assert_eq!(settings.connection_url(), "redis://:s3cret@cache:6380/2");
    }

    #[test]
    fn in_memory_backend() {
        let cli = CLI::try_parse_from(["gateway", "--storage", "in-memory"]).unwrap();
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.storage.to_string(), "in-memory");
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(CLI::try_parse_from(["gateway", "--storage", "mysql"]).is_err());
    }
}
