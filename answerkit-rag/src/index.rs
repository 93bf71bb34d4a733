//! Vector index trait.

use async_trait::async_trait;

use crate::document::{IndexedChunk, RetrievedChunk};
use crate::error::Result;

/// A queryable store of embedded knowledge-base chunks.
///
/// The online pipeline only searches. `upsert` exists for the out-of-band
/// ingestion process and for seeding test fixtures; the pipeline never
/// writes.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return the `top_k` nearest neighbors of `embedding`, ordered by
    /// descending similarity score.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>>;

    /// Insert or replace chunks. Used by ingestion, not by the query path.
    async fn upsert(&self, chunks: &[IndexedChunk]) -> Result<()>;
}
