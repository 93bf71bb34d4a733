//! Embedding provider trait.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that turns text into a fixed-length dense vector.
///
/// Embedding failures are fatal for the retrieval attempt that needed the
/// vector; there is no silent fallback, because a missing embedding makes
/// that query unusable. Callers that can continue with fewer passes catch
/// the error themselves.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
