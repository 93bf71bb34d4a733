//! Relevance filtering and re-ranking of retrieved chunks.
//!
//! Filtering applies a score threshold chosen by follow-up status, with a
//! recall-priority fallback when too few chunks survive. Re-ranking asks
//! the chat model for an index permutation; the permutation parse is a
//! pure function, and any provider or parse failure falls back to raw
//! score order.

use std::sync::Arc;

use tracing::{debug, warn};

use answerkit_core::{ChatModel, GenerateConfig, Message};

use crate::config::RagConfig;
use crate::document::{truncate_chars, RetrievedChunk};

/// Selects and orders the chunks handed to generation.
pub struct RelevanceRanker {
    model: Arc<dyn ChatModel>,
}

impl RelevanceRanker {
    /// Create a ranker backed by the given chat model.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Filter `accumulated` by relevance and return the ranked context,
    /// capped at `config.context_budget` chunks.
    ///
    /// Follow-up queries use the looser `follow_up_threshold`. When fewer
    /// than `min_filtered` chunks clear the bar and the accumulator is
    /// non-empty, the threshold is abandoned in favor of the top
    /// `recall_fallback_top` by score (stable on ties by accumulation
    /// order). Sets larger than `min_filtered` are re-ranked by the model;
    /// smaller sets and any re-rank failure fall back to score order.
    pub async fn select_context(
        &self,
        query: &str,
        accumulated: Vec<RetrievedChunk>,
        follow_up: bool,
        config: &RagConfig,
    ) -> Vec<RetrievedChunk> {
        let threshold = if follow_up {
            config.follow_up_threshold
        } else {
            config.relevance_threshold
        };

        let mut filtered: Vec<RetrievedChunk> =
            accumulated.iter().filter(|c| c.score > threshold).cloned().collect();

        if filtered.len() < config.min_filtered && !accumulated.is_empty() {
            debug!(
                surviving = filtered.len(),
                threshold, "too few chunks above threshold, falling back to top by score"
            );
            filtered = top_by_score(accumulated, config.recall_fallback_top);
        }

        let mut ranked = if filtered.len() > config.min_filtered {
            self.rerank(query, filtered, config).await
        } else {
            sort_by_score(filtered)
        };

        ranked.truncate(config.context_budget);
        ranked
    }

    /// Ask the model for a relevance ordering of `chunks`.
    ///
    /// On provider error or an unparseable response, returns the chunks in
    /// raw score order. When the model omits indices, the corresponding
    /// chunks are dropped from the ranked result.
    async fn rerank(
        &self,
        query: &str,
        chunks: Vec<RetrievedChunk>,
        config: &RagConfig,
    ) -> Vec<RetrievedChunk> {
        let prompt = rerank_prompt(query, &chunks, config.rerank_snippet_len);
        let generate_config =
            GenerateConfig { temperature: Some(0.0), max_output_tokens: Some(128) };

        let response = match self
            .model
            .generate(&[Message::user(prompt)], &generate_config)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "re-ranking failed, falling back to score order");
                return sort_by_score(chunks);
            }
        };

        match parse_index_list(&response, chunks.len()) {
            Some(order) => {
                debug!(kept = order.len(), total = chunks.len(), "model re-ranked chunks");
                apply_order(chunks, &order)
            }
            None => {
                warn!("re-rank response had no valid indices, falling back to score order");
                sort_by_score(chunks)
            }
        }
    }
}

/// Build the re-ranking instruction prompt: numbered snippets plus a
/// request for a comma-separated index permutation.
fn rerank_prompt(query: &str, chunks: &[RetrievedChunk], snippet_len: usize) -> String {
    let mut prompt = format!(
        "Order the following passages by relevance to the question.\n\
         Question: {query}\n\nPassages:\n"
    );
    for (i, chunk) in chunks.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, truncate_chars(&chunk.text, snippet_len)));
    }
    prompt.push_str(
        "\nReply with the passage numbers only, most relevant first, \
         separated by commas (for example: 2,1,3).",
    );
    prompt
}

/// Parse a best-effort ordered index list from a model response.
///
/// Accepts comma-separated 1-based indices, discarding non-numeric tokens,
/// out-of-range values, and duplicates. Returns 0-based indices, or `None`
/// when not a single valid index was found.
pub fn parse_index_list(response: &str, len: usize) -> Option<Vec<usize>> {
    let mut order = Vec::new();
    for token in response.split(',') {
        if let Ok(value) = token.trim().parse::<usize>() {
            if value >= 1 && value <= len {
                let index = value - 1;
                if !order.contains(&index) {
                    order.push(index);
                }
            }
        }
    }
    if order.is_empty() { None } else { Some(order) }
}

/// Reorder chunks by the given index order, dropping chunks not listed.
fn apply_order(chunks: Vec<RetrievedChunk>, order: &[usize]) -> Vec<RetrievedChunk> {
    let mut slots: Vec<Option<RetrievedChunk>> = chunks.into_iter().map(Some).collect();
    order.iter().filter_map(|&i| slots.get_mut(i).and_then(Option::take)).collect()
}

/// Sort descending by score, stable on ties.
fn sort_by_score(mut chunks: Vec<RetrievedChunk>) -> Vec<RetrievedChunk> {
    chunks.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    chunks
}

/// Top `n` by score, stable on ties by original order.
fn top_by_score(chunks: Vec<RetrievedChunk>, n: usize) -> Vec<RetrievedChunk> {
    let mut sorted = sort_by_score(chunks);
    sorted.truncate(n);
    sorted
}
