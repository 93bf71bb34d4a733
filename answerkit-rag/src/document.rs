//! Data types for retrieved chunks, sources, and answers.

use serde::{Deserialize, Serialize};

/// Provenance metadata stored alongside each chunk in the vector index.
///
/// The ingestion process tags every chunk with the sheet or document it came
/// from and, where applicable, its row and chunk type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source tag (sheet or document name).
    pub source: String,
    /// Row or position within the source, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<u64>,
    /// Kind of chunk produced by ingestion (e.g. `row`, `summary`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_type: Option<String>,
}

/// A passage returned by the vector index with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// The stored passage text.
    pub text: String,
    /// Provenance metadata.
    pub metadata: ChunkMetadata,
    /// Cosine-derived similarity score in `[0, 1]`.
    pub score: f32,
}

/// A chunk with its embedding, as stored by out-of-band ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedChunk {
    /// The passage text.
    pub text: String,
    /// The embedding for the passage text.
    pub embedding: Vec<f32>,
    /// Provenance metadata.
    pub metadata: ChunkMetadata,
}

/// A diagnostic source entry attached to a [`RagAnswer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Source tag of the chunk this answer drew on.
    pub source: String,
    /// Row or position within the source, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<u64>,
    /// The chunk text, truncated for display.
    pub text: String,
}

/// The externally visible result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagAnswer {
    /// The generated (or canned) answer text.
    pub answer: String,
    /// The chunks the answer was generated from, in ranked order.
    /// Absent for conversational replies and the no-context apology.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceRef>>,
}

impl RagAnswer {
    /// An answer with no source diagnostics.
    pub fn plain(answer: impl Into<String>) -> Self {
        Self { answer: answer.into(), sources: None }
    }
}

/// The deduplication key for a chunk: a fixed-length prefix of its text.
///
/// Chunks surfaced by different retrieval passes are considered the same
/// entry when their prefixes match. The cut respects char boundaries.
pub fn dedup_key(text: &str, prefix_len: usize) -> &str {
    match text.char_indices().nth(prefix_len) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Truncate `text` to at most `max_chars` characters, appending `...` when
/// anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
