//! # answerkit-rag
//!
//! The query-answering pipeline behind the answerkit chat endpoint:
//! conversational-intent detection, LLM query expansion, multi-pass vector
//! retrieval with deduplication, relevance filtering and re-ranking,
//! history-aware prompt construction, and a fallback ladder that degrades
//! to an apologetic answer when the knowledge base has nothing relevant.
//!
//! The pipeline is stateless between requests. External collaborators —
//! the embedding provider, the vector index, and the chat model — are
//! injected as trait objects at construction time, so every seam can be
//! replaced with a test double.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use answerkit_rag::{RagPipeline, RagConfig, InMemoryVectorIndex};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedder(Arc::new(embedder))
//!     .index(Arc::new(index))
//!     .chat_model(Arc::new(model))
//!     .build()?;
//!
//! let result = pipeline.answer("What is the price of Widget A?", &[]).await?;
//! println!("{}", result.answer);
//! ```

pub mod answer;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod expand;
pub mod history;
pub mod index;
pub mod inmemory;
pub mod intent;
pub mod openai;
pub mod pipeline;
pub mod prompt;
#[cfg(feature = "qdrant")]
pub mod qdrant;
pub mod rerank;
pub mod retrieve;

pub use config::{RagConfig, RagConfigBuilder};
pub use document::{ChunkMetadata, IndexedChunk, RagAnswer, RetrievedChunk, SourceRef};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::VectorIndex;
pub use inmemory::InMemoryVectorIndex;
pub use openai::OpenAiEmbeddingProvider;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorIndex;
