//! Error types shared across answerkit crates.

use thiserror::Error;

/// Errors produced by core collaborators (chat models, configuration).
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required credential or configuration value is missing or invalid.
    ///
    /// Configuration errors are fatal: they surface immediately and are
    /// never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A text generation provider call failed.
    #[error("Model error ({provider}): {message}")]
    Model {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
