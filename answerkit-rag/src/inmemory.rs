//! In-memory vector index using cosine similarity.
//!
//! [`InMemoryVectorIndex`] is a zero-dependency index backed by a `Vec`
//! behind a `tokio::sync::RwLock`. It is suitable for development, tests,
//! and small knowledge bases that fit in memory.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{IndexedChunk, RetrievedChunk};
use crate::error::Result;
use crate::index::VectorIndex;

/// An in-memory vector index using cosine similarity for search.
///
/// # Example
///
/// ```rust,ignore
/// use answerkit_rag::{InMemoryVectorIndex, VectorIndex};
///
/// let index = InMemoryVectorIndex::new();
/// index.upsert(&chunks).await?;
/// let results = index.search(&query_embedding, 10).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    chunks: RwLock<Vec<IndexedChunk>>,
}

impl InMemoryVectorIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index pre-populated with the given chunks.
    pub fn with_chunks(chunks: Vec<IndexedChunk>) -> Self {
        Self { chunks: RwLock::new(chunks) }
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let chunks = self.chunks.read().await;

        let mut scored: Vec<RetrievedChunk> = chunks
            .iter()
            .map(|chunk| RetrievedChunk {
                text: chunk.text.clone(),
                metadata: chunk.metadata.clone(),
                score: cosine_similarity(&chunk.embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn upsert(&self, new_chunks: &[IndexedChunk]) -> Result<()> {
        let mut chunks = self.chunks.write().await;
        for chunk in new_chunks {
            match chunks.iter_mut().find(|existing| existing.text == chunk.text) {
                Some(existing) => *existing = chunk.clone(),
                None => chunks.push(chunk.clone()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let similarity = cosine_similarity(&[0.6, 0.8], &[0.6, 0.8]);
        assert!((similarity - 1.0).abs() < 1e-6);
    }
}
