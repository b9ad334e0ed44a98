//! Expiring `token -> original URL` stores.
//!
//! [`RedisMappingStore`] is the production backend and delegates expiry to
//! Redis' native key TTL. [`InMemoryMappingStore`] keeps the same contract
//! inside the process and is meant for local runs and tests.

pub mod memory;
pub mod redis;
pub mod settings;

pub use memory::InMemoryMappingStore;
pub use self::redis::RedisMappingStore;
pub use settings::StoreSettings;
pub use tinylink_core::{MappingStore, StoreError};
