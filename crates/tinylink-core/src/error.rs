use thiserror::Error;

/// Result type for mapping store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// Errors returned by a [`MappingStore`][crate::MappingStore].
///
/// `NotFound` is an expected outcome of a lookup and is kept apart from
/// the backend failures so callers can answer "no such short link"
/// instead of reporting an internal error.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("short url not found: {0}")]
    NotFound(String),
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("store communication failed: {0}")]
    Communication(String),
    #[error("store configuration is invalid: {0}")]
    Configuration(String),
}

impl StoreError {
    /// Returns `true` if the token has no stored mapping.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Returns `true` for failures talking to a live backend.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Timeout(_) | StoreError::Communication(_))
    }
}
