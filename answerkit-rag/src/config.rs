//! Configuration for the retrieval pipeline.

use crate::error::{RagError, Result};

/// Tunable parameters for the retrieval pipeline.
///
/// The defaults reproduce the production behavior; construct variants
/// through [`RagConfig::builder`], which validates consistency.
#[derive(Debug, Clone, PartialEq)]
pub struct RagConfig {
    /// Search depth for each expanded-query retrieval pass.
    pub top_k_per_query: usize,
    /// How many expanded queries are actually retrieved.
    pub max_expanded_queries: usize,
    /// Cap on the expansion list, original query included.
    pub max_expansions: usize,
    /// Score cutoff for ordinary queries.
    pub relevance_threshold: f32,
    /// Looser score cutoff applied to follow-up queries.
    pub follow_up_threshold: f32,
    /// Below this many surviving chunks, the threshold is abandoned.
    pub min_filtered: usize,
    /// How many top-by-score chunks the recall fallback keeps.
    pub recall_fallback_top: usize,
    /// Maximum chunks handed to generation.
    pub context_budget: usize,
    /// The history-enhanced pass runs only while the accumulator is smaller
    /// than this.
    pub min_unique_before_history_pass: usize,
    /// Search depth of the last-resort pass.
    pub last_resort_top_k: usize,
    /// Score cutoff of the last-resort pass.
    pub last_resort_threshold: f32,
    /// How many chunks the last-resort pass keeps.
    pub last_resort_take: usize,
    /// Trailing history turns used for context extraction and prompting.
    pub history_window: usize,
    /// Trailing history turns replayed to the chat model.
    pub answer_history_window: usize,
    /// Chunk truncation length inside the re-ranking prompt, in chars.
    pub rerank_snippet_len: usize,
    /// Chunk truncation length in `sources` diagnostics, in chars.
    pub source_snippet_len: usize,
    /// Length of the text-prefix deduplication key, in chars.
    pub dedup_prefix_len: usize,
    /// Hard clamp on any `top_k` sent to the vector index.
    pub max_top_k: usize,
    /// Answer generation temperature.
    pub temperature: f32,
    /// Answer generation output-token budget.
    pub max_output_tokens: u32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k_per_query: 10,
            max_expanded_queries: 3,
            max_expansions: 5,
            relevance_threshold: 0.4,
            follow_up_threshold: 0.25,
            min_filtered: 3,
            recall_fallback_top: 10,
            context_budget: 8,
            min_unique_before_history_pass: 5,
            last_resort_top_k: 15,
            last_resort_threshold: 0.2,
            last_resort_take: 5,
            history_window: 6,
            answer_history_window: 8,
            rerank_snippet_len: 300,
            source_snippet_len: 200,
            dedup_prefix_len: 100,
            max_top_k: 20,
            temperature: 0.1,
            max_output_tokens: 1024,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the search depth per expanded query.
    pub fn top_k_per_query(mut self, k: usize) -> Self {
        self.config.top_k_per_query = k;
        self
    }

    /// Set how many expanded queries are retrieved.
    pub fn max_expanded_queries(mut self, n: usize) -> Self {
        self.config.max_expanded_queries = n;
        self
    }

    /// Set the cap on the expansion list.
    pub fn max_expansions(mut self, n: usize) -> Self {
        self.config.max_expansions = n;
        self
    }

    /// Set the score cutoff for ordinary queries.
    pub fn relevance_threshold(mut self, threshold: f32) -> Self {
        self.config.relevance_threshold = threshold;
        self
    }

    /// Set the score cutoff for follow-up queries.
    pub fn follow_up_threshold(mut self, threshold: f32) -> Self {
        self.config.follow_up_threshold = threshold;
        self
    }

    /// Set the survivor count below which the threshold is abandoned.
    pub fn min_filtered(mut self, n: usize) -> Self {
        self.config.min_filtered = n;
        self
    }

    /// Set how many chunks the recall fallback keeps.
    pub fn recall_fallback_top(mut self, n: usize) -> Self {
        self.config.recall_fallback_top = n;
        self
    }

    /// Set the maximum number of chunks handed to generation.
    pub fn context_budget(mut self, budget: usize) -> Self {
        self.config.context_budget = budget;
        self
    }

    /// Set the accumulator size that suppresses the history-enhanced pass.
    pub fn min_unique_before_history_pass(mut self, n: usize) -> Self {
        self.config.min_unique_before_history_pass = n;
        self
    }

    /// Set the search depth of the last-resort pass.
    pub fn last_resort_top_k(mut self, k: usize) -> Self {
        self.config.last_resort_top_k = k;
        self
    }

    /// Set the score cutoff of the last-resort pass.
    pub fn last_resort_threshold(mut self, threshold: f32) -> Self {
        self.config.last_resort_threshold = threshold;
        self
    }

    /// Set how many chunks the last-resort pass keeps.
    pub fn last_resort_take(mut self, n: usize) -> Self {
        self.config.last_resort_take = n;
        self
    }

    /// Set the trailing history window used for context extraction and
    /// prompting.
    pub fn history_window(mut self, turns: usize) -> Self {
        self.config.history_window = turns;
        self
    }

    /// Set the trailing history window replayed to the chat model.
    pub fn answer_history_window(mut self, turns: usize) -> Self {
        self.config.answer_history_window = turns;
        self
    }

    /// Set the chunk truncation length inside the re-ranking prompt.
    pub fn rerank_snippet_len(mut self, len: usize) -> Self {
        self.config.rerank_snippet_len = len;
        self
    }

    /// Set the chunk truncation length in `sources` diagnostics.
    pub fn source_snippet_len(mut self, len: usize) -> Self {
        self.config.source_snippet_len = len;
        self
    }

    /// Set the dedup key prefix length.
    pub fn dedup_prefix_len(mut self, len: usize) -> Self {
        self.config.dedup_prefix_len = len;
        self
    }

    /// Set the hard clamp on any `top_k` sent to the vector index.
    pub fn max_top_k(mut self, k: usize) -> Self {
        self.config.max_top_k = k;
        self
    }

    /// Set the answer generation temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the answer generation output-token budget.
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.max_output_tokens = tokens;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `top_k_per_query` or `context_budget` is zero
    /// - either threshold is outside `[0, 1]`
    /// - `follow_up_threshold > relevance_threshold`
    pub fn build(self) -> Result<RagConfig> {
        let config = self.config;
        if config.top_k_per_query == 0 {
            return Err(RagError::Config("top_k_per_query must be greater than zero".into()));
        }
        if config.context_budget == 0 {
            return Err(RagError::Config("context_budget must be greater than zero".into()));
        }
        for (name, value) in [
            ("relevance_threshold", config.relevance_threshold),
            ("follow_up_threshold", config.follow_up_threshold),
            ("last_resort_threshold", config.last_resort_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RagError::Config(format!("{name} must be within [0, 1]")));
            }
        }
        if config.follow_up_threshold > config.relevance_threshold {
            return Err(RagError::Config(format!(
                "follow_up_threshold ({}) must not exceed relevance_threshold ({})",
                config.follow_up_threshold, config.relevance_threshold
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(RagConfig::builder().build().is_ok());
    }

    #[test]
    fn every_field_is_settable_through_the_builder() {
        let config = RagConfig::builder()
            .top_k_per_query(5)
            .max_expanded_queries(2)
            .max_expansions(4)
            .relevance_threshold(0.5)
            .follow_up_threshold(0.3)
            .min_filtered(2)
            .recall_fallback_top(6)
            .context_budget(4)
            .min_unique_before_history_pass(3)
            .last_resort_top_k(12)
            .last_resort_threshold(0.15)
            .last_resort_take(3)
            .history_window(4)
            .answer_history_window(6)
            .rerank_snippet_len(150)
            .source_snippet_len(80)
            .dedup_prefix_len(50)
            .max_top_k(25)
            .temperature(0.0)
            .max_output_tokens(512)
            .build()
            .unwrap();

        let expected = RagConfig {
            top_k_per_query: 5,
            max_expanded_queries: 2,
            max_expansions: 4,
            relevance_threshold: 0.5,
            follow_up_threshold: 0.3,
            min_filtered: 2,
            recall_fallback_top: 6,
            context_budget: 4,
            min_unique_before_history_pass: 3,
            last_resort_top_k: 12,
            last_resort_threshold: 0.15,
            last_resort_take: 3,
            history_window: 4,
            answer_history_window: 6,
            rerank_snippet_len: 150,
            source_snippet_len: 80,
            dedup_prefix_len: 50,
            max_top_k: 25,
            temperature: 0.0,
            max_output_tokens: 512,
        };
        assert_eq!(config, expected);
    }

    #[test]
    fn zero_context_budget_rejected() {
        let err = RagConfig::builder().context_budget(0).build().unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let err = RagConfig::builder()
            .relevance_threshold(0.2)
            .follow_up_threshold(0.5)
            .build()
            .unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
    }
}
