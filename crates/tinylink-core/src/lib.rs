//! Core types and traits for the tinylink URL shortener.
//!
//! This crate provides the types shared by the token generator, the
//! mapping stores and the HTTP gateway.

pub mod error;
pub mod store;
pub mod token;

pub use error::{CoreError, StoreError};
pub use store::{MappingStore, RETENTION};
pub use token::Token;
