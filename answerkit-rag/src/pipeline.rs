//! The query-answering pipeline orchestrator.
//!
//! [`RagPipeline`] sequences intent detection, query expansion, retrieval,
//! relevance ranking, and answer generation, and implements the fallback
//! ladder: conversational short-circuit → normal retrieval → last-resort
//! retrieval → fixed apology.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use answerkit_rag::{RagPipeline, RagConfig};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedder(Arc::new(embedder))
//!     .index(Arc::new(index))
//!     .chat_model(Arc::new(model))
//!     .build()?;
//!
//! let result = pipeline.answer("What is the price of Widget A?", &[]).await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use answerkit_core::{ChatModel, Message};

use crate::answer::AnswerGenerator;
use crate::config::RagConfig;
use crate::document::{truncate_chars, RagAnswer, RetrievedChunk, SourceRef};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::expand::QueryExpander;
use crate::history::{history_context, is_follow_up};
use crate::index::VectorIndex;
use crate::intent::{canned_response, classify, IntentVocabulary};
use crate::prompt::build_prompt;
use crate::rerank::RelevanceRanker;
use crate::retrieve::Retriever;

/// Returned when both the main retrieval path and the last resort come up
/// empty.
pub const NO_CONTEXT_APOLOGY: &str =
    "I'm sorry, I could not find information about that in our knowledge base. \
     Could you rephrase the question or ask about a specific product?";

/// The question-answering pipeline.
///
/// Stateless between requests; conversation history is supplied by the
/// caller on every call and never stored. Collaborators are injected once
/// at construction via [`RagPipeline::builder`].
pub struct RagPipeline {
    config: RagConfig,
    vocabulary: IntentVocabulary,
    retriever: Retriever,
    expander: QueryExpander,
    ranker: RelevanceRanker,
    generator: AnswerGenerator,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Answer a question against the knowledge base.
    ///
    /// Runs the full ladder: conversational short-circuit (empty history
    /// only), expansion + retrieval + ranking, the last-resort retrieval
    /// pass, and finally the fixed apology when nothing relevant exists.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidQuery`] for a blank query. Any failure of
    /// the primary or last-resort embedding, or of answer generation, is
    /// wrapped as [`RagError::Pipeline`] carrying the original message.
    /// Expansion, individual retrieval passes, and re-ranking degrade
    /// instead of failing.
    pub async fn answer(&self, query: &str, history: &[Message]) -> Result<RagAnswer> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RagError::InvalidQuery("query must not be empty".into()));
        }

        // Conversational short-circuit: no provider calls for chit-chat.
        if history.is_empty() {
            if let Some(intent) = classify(query, &self.vocabulary) {
                info!(?intent, "conversational short-circuit");
                return Ok(RagAnswer::plain(canned_response(intent)));
            }
        }

        self.run_retrieval_pipeline(query, history).await.map_err(|e| match e {
            e @ RagError::Pipeline(_) => e,
            other => {
                error!(error = %other, "retrieval pipeline failed");
                RagError::Pipeline(other.to_string())
            }
        })
    }

    /// Steps 2–6 of the ladder: everything past the short-circuit.
    async fn run_retrieval_pipeline(
        &self,
        query: &str,
        history: &[Message],
    ) -> Result<RagAnswer> {
        let follow_up = is_follow_up(query);
        let context_summary = history_context(history, self.config.history_window);
        let expanded = self.expander.expand(query, history, &self.config).await;

        let accumulated = self
            .retriever
            .gather(query, &expanded, follow_up, &context_summary, &self.config)
            .await;

        let context = self
            .ranker
            .select_context(query, accumulated, follow_up, &self.config)
            .await;

        let context = if context.is_empty() {
            let rescued = self.last_resort(query).await?;
            if rescued.is_empty() {
                info!("no context found, returning apology");
                return Ok(RagAnswer::plain(NO_CONTEXT_APOLOGY));
            }
            rescued
        } else {
            context
        };

        let prompt_history =
            &history[history.len().saturating_sub(self.config.history_window)..];
        let prompt = build_prompt(query, &context, prompt_history);
        let answer = self.generator.generate(prompt, history, &self.config).await?;

        let sources = self.sources_for(&context);
        info!(context_chunks = context.len(), "request answered");
        Ok(RagAnswer { answer, sources: Some(sources) })
    }

    /// The last-resort retrieval pass: the original query alone, deeper
    /// search, a very low score bar, and a small take.
    ///
    /// An embedding or index failure here is fatal; this is the final rung
    /// before the apology, and silently skipping it could hide a provider
    /// outage behind a "not found" answer.
    async fn last_resort(&self, query: &str) -> Result<Vec<RetrievedChunk>> {
        info!("primary retrieval yielded no context, trying last-resort pass");
        let results = self
            .retriever
            .search_one(query, self.config.last_resort_top_k, &self.config)
            .await?;

        let mut kept: Vec<RetrievedChunk> = results
            .into_iter()
            .filter(|c| c.score > self.config.last_resort_threshold)
            .collect();
        kept.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        kept.truncate(self.config.last_resort_take);
        Ok(kept)
    }

    /// Build the diagnostic source list for the final context.
    fn sources_for(&self, context: &[RetrievedChunk]) -> Vec<SourceRef> {
        context
            .iter()
            .map(|chunk| SourceRef {
                source: chunk.metadata.source.clone(),
                row: chunk.metadata.row,
                text: truncate_chars(&chunk.text, self.config.source_snippet_len),
            })
            .collect()
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// The embedder, index, and chat model are required; config and intent
/// vocabulary fall back to defaults.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    vocabulary: Option<IntentVocabulary>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
    chat_model: Option<Arc<dyn ChatModel>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration (defaults to [`RagConfig::default`]).
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the conversational-intent vocabulary.
    pub fn vocabulary(mut self, vocabulary: IntentVocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector index.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the chat model used for expansion, re-ranking, and generation.
    pub fn chat_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.chat_model = Some(model);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required collaborator is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let vocabulary = self.vocabulary.unwrap_or_default();
        let embedder =
            self.embedder.ok_or_else(|| RagError::Config("embedder is required".into()))?;
        let index = self.index.ok_or_else(|| RagError::Config("index is required".into()))?;
        let chat_model =
            self.chat_model.ok_or_else(|| RagError::Config("chat_model is required".into()))?;

        Ok(RagPipeline {
            config,
            vocabulary,
            retriever: Retriever::new(embedder, index),
            expander: QueryExpander::new(chat_model.clone()),
            ranker: RelevanceRanker::new(chat_model.clone()),
            generator: AnswerGenerator::new(chat_model),
        })
    }
}
