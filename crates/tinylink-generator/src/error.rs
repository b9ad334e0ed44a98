use thiserror::Error;

/// Result type for token generation.
pub type Result<T> = std::result::Result<T, GeneratorError>;

#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    /// The encoding step could not produce a full token from its input.
    ///
    /// This is an environment fault, not a per-request condition: retrying
    /// with the same input yields the same failure.
    #[error("token generation failed: {0}")]
    GenerationFault(String),
}
