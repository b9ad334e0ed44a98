//! Throwaway containers for integration tests.

pub mod error;
pub mod redis;

pub use error::{Result, TestInfraError};
pub use redis::RedisServer;
