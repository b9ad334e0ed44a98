//! Short token generation.
//!
//! Generators are pure: they never touch storage, and the same input
//! always yields the same token.

pub mod error;
pub mod hashed;

pub use error::{GeneratorError, Result};
pub use hashed::{generate_token, Sha256Base58Generator};

use tinylink_core::Token;

/// Trait for deriving short tokens.
///
/// The owner id salts the derivation so that two owners shortening the
/// same URL receive different tokens.
pub trait Generator: Send + Sync + 'static {
    /// Derives the token for `original_url` on behalf of `owner_id`.
    fn generate(&self, original_url: &str, owner_id: &str) -> Result<Token>;
}
