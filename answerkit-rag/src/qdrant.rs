//! Qdrant vector index backend.
//!
//! Provides [`QdrantVectorIndex`], a [`VectorIndex`] over the
//! [qdrant-client](https://docs.rs/qdrant-client) crate (gRPC). The index
//! searches one named collection populated out-of-band by ingestion; chunk
//! provenance lives in the point payload under `text`, `source`, `row`,
//! and `chunk_type`.
//!
//! This module is only available when the `qdrant` feature is enabled.

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    PointStruct, SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue,
};
use qdrant_client::{Payload, Qdrant};
use tracing::debug;

use crate::document::{ChunkMetadata, IndexedChunk, RetrievedChunk};
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// A [`VectorIndex`] backed by [Qdrant](https://qdrant.tech/).
///
/// # Example
///
/// ```rust,ignore
/// use answerkit_rag::qdrant::QdrantVectorIndex;
///
/// let index = QdrantVectorIndex::new("http://localhost:6334", "products")?;
/// let results = index.search(&query_embedding, 10).await?;
/// ```
pub struct QdrantVectorIndex {
    client: Qdrant,
    collection: String,
}

impl QdrantVectorIndex {
    /// Connect to Qdrant at `url`, searching the given collection.
    pub fn new(url: &str, collection: impl Into<String>) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(Self::map_err)?;
        Ok(Self { client, collection: collection.into() })
    }

    /// Create an index from an existing client.
    pub fn from_client(client: Qdrant, collection: impl Into<String>) -> Self {
        Self { client, collection: collection.into() }
    }

    fn map_err(e: qdrant_client::QdrantError) -> RagError {
        RagError::Index { backend: "qdrant".to_string(), message: e.to_string() }
    }

    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn extract_u64(value: &QdrantValue) -> Option<u64> {
        match &value.kind {
            Some(Kind::IntegerValue(n)) if *n >= 0 => Some(*n as u64),
            _ => None,
        }
    }
}

#[async_trait]
impl VectorIndex for QdrantVectorIndex {
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(self.collection.as_str(), embedding.to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        let results = response
            .result
            .into_iter()
            .map(|scored| {
                let text =
                    scored.payload.get("text").and_then(Self::extract_string).unwrap_or_default();
                let source = scored
                    .payload
                    .get("source")
                    .and_then(Self::extract_string)
                    .unwrap_or_default();
                let row = scored.payload.get("row").and_then(Self::extract_u64);
                let chunk_type =
                    scored.payload.get("chunk_type").and_then(Self::extract_string);

                RetrievedChunk {
                    text,
                    metadata: ChunkMetadata { source, row, chunk_type },
                    score: scored.score,
                }
            })
            .collect();

        Ok(results)
    }

    async fn upsert(&self, chunks: &[IndexedChunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                let mut payload_map = serde_json::Map::new();
                payload_map
                    .insert("text".to_string(), serde_json::Value::String(chunk.text.clone()));
                payload_map.insert(
                    "source".to_string(),
                    serde_json::Value::String(chunk.metadata.source.clone()),
                );
                if let Some(row) = chunk.metadata.row {
                    payload_map.insert("row".to_string(), serde_json::Value::from(row));
                }
                if let Some(chunk_type) = &chunk.metadata.chunk_type {
                    payload_map.insert(
                        "chunk_type".to_string(),
                        serde_json::Value::String(chunk_type.clone()),
                    );
                }

                let payload =
                    Payload::try_from(serde_json::Value::Object(payload_map)).unwrap_or_default();

                PointStruct::new(i as u64, chunk.embedding.clone(), payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(self.collection.as_str(), points).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(collection = %self.collection, count = chunks.len(), "upserted chunks to qdrant");
        Ok(())
    }
}
