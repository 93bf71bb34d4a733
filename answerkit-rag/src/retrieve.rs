//! Multi-pass vector retrieval with prefix deduplication.
//!
//! Retrieval runs an explicit ordered list of passes: one per expanded
//! query (up to a configured maximum), then a conditional history-enhanced
//! pass for follow-up questions. Each pass embeds its query and searches
//! the index; results merge into an accumulator keyed by a text prefix,
//! first occurrence winning. A failed pass is logged and skipped — only a
//! request where every pass fails leaves the accumulator empty.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::RagConfig;
use crate::document::{dedup_key, RetrievedChunk};
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::index::VectorIndex;

/// One retrieval attempt in the ordered pass list.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalPass {
    /// Search with one of the expanded query phrasings.
    Expanded {
        /// The phrasing to embed and search.
        query: String,
    },
    /// Search with history context prepended to the original query.
    /// Runs only for follow-ups with a thin accumulator.
    HistoryEnhanced {
        /// `history_context + " " + query`.
        query: String,
    },
}

impl RetrievalPass {
    fn query(&self) -> &str {
        match self {
            RetrievalPass::Expanded { query } | RetrievalPass::HistoryEnhanced { query } => query,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RetrievalPass::Expanded { .. } => "expanded",
            RetrievalPass::HistoryEnhanced { .. } => "history-enhanced",
        }
    }
}

/// Embeds queries and accumulates unique chunks from the vector index.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl Retriever {
    /// Create a retriever over the given embedding provider and index.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Embed `text` and search the index, clamping `top_k` to the
    /// configured maximum.
    ///
    /// # Errors
    ///
    /// Propagates embedding and index errors; an embedding failure makes
    /// this attempt unusable and there is no silent fallback.
    pub async fn search_one(
        &self,
        text: &str,
        top_k: usize,
        config: &RagConfig,
    ) -> Result<Vec<RetrievedChunk>> {
        let embedding = self.embedder.embed(text).await?;
        self.index.search(&embedding, top_k.min(config.max_top_k)).await
    }

    /// Run the full retrieval protocol for one request.
    ///
    /// Executes one [`RetrievalPass::Expanded`] pass per expanded query (at
    /// most `config.max_expanded_queries`), then, when the query is a
    /// follow-up with non-empty history context and the accumulator holds
    /// fewer than `config.min_unique_before_history_pass` chunks, one
    /// [`RetrievalPass::HistoryEnhanced`] pass. Pass failures are logged
    /// and skipped. Returns the accumulated unique chunks, unsorted.
    pub async fn gather(
        &self,
        query: &str,
        expanded_queries: &[String],
        follow_up: bool,
        history_context: &str,
        config: &RagConfig,
    ) -> Vec<RetrievedChunk> {
        let mut accumulated: Vec<RetrievedChunk> = Vec::new();

        let passes: Vec<RetrievalPass> = expanded_queries
            .iter()
            .take(config.max_expanded_queries)
            .map(|q| RetrievalPass::Expanded { query: q.clone() })
            .collect();

        for pass in &passes {
            self.run_pass(pass, &mut accumulated, config).await;
        }

        if follow_up
            && !history_context.is_empty()
            && accumulated.len() < config.min_unique_before_history_pass
        {
            let pass = RetrievalPass::HistoryEnhanced {
                query: format!("{history_context} {query}"),
            };
            self.run_pass(&pass, &mut accumulated, config).await;
        }

        debug!(unique_chunks = accumulated.len(), "retrieval protocol finished");
        accumulated
    }

    /// Execute one pass and merge its results; failures degrade to a warn log.
    async fn run_pass(
        &self,
        pass: &RetrievalPass,
        accumulated: &mut Vec<RetrievedChunk>,
        config: &RagConfig,
    ) {
        match self.search_one(pass.query(), config.top_k_per_query, config).await {
            Ok(chunks) => {
                let before = accumulated.len();
                merge_unique(accumulated, chunks, config.dedup_prefix_len);
                debug!(
                    pass = pass.label(),
                    added = accumulated.len() - before,
                    "retrieval pass merged"
                );
            }
            Err(e) => {
                warn!(pass = pass.label(), error = %e, "retrieval pass failed, skipping");
            }
        }
    }
}

/// Merge `incoming` into `accumulated`, dropping chunks whose dedup key is
/// already present. First occurrence wins; duplicates are discarded, not
/// score-merged.
pub fn merge_unique(
    accumulated: &mut Vec<RetrievedChunk>,
    incoming: Vec<RetrievedChunk>,
    prefix_len: usize,
) {
    for chunk in incoming {
        let key = dedup_key(&chunk.text, prefix_len);
        let seen = accumulated.iter().any(|existing| dedup_key(&existing.text, prefix_len) == key);
        if !seen {
            accumulated.push(chunk);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ChunkMetadata;

    fn chunk(text: &str, score: f32) -> RetrievedChunk {
        RetrievedChunk { text: text.into(), metadata: ChunkMetadata::default(), score }
    }

    #[test]
    fn merge_keeps_first_occurrence() {
        let mut accumulated = vec![chunk("same text", 0.9)];
        merge_unique(&mut accumulated, vec![chunk("same text", 0.5)], 100);
        assert_eq!(accumulated.len(), 1);
        assert_eq!(accumulated[0].score, 0.9);
    }

    #[test]
    fn merge_matches_on_prefix_not_full_text() {
        let prefix = "x".repeat(100);
        let mut accumulated = vec![chunk(&format!("{prefix} tail one"), 0.9)];
        merge_unique(&mut accumulated, vec![chunk(&format!("{prefix} tail two"), 0.8)], 100);
        assert_eq!(accumulated.len(), 1);
    }

    #[test]
    fn merge_appends_distinct_chunks_in_order() {
        let mut accumulated = vec![chunk("a", 0.9)];
        merge_unique(&mut accumulated, vec![chunk("b", 0.8), chunk("c", 0.7)], 100);
        let texts: Vec<&str> = accumulated.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
