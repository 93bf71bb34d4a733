//! Error types for the `answerkit-rag` crate.

use thiserror::Error;

/// Errors that can occur in the retrieval pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector index backend.
    #[error("Vector index error ({backend}): {message}")]
    Index {
        /// The vector index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The query was empty after trimming.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error in pipeline orchestration, wrapping the original failure.
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// An error propagated from `answerkit-core` (chat model, configuration).
    #[error(transparent)]
    Core(#[from] answerkit_core::CoreError),
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;
