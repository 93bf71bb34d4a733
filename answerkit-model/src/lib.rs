//! # answerkit-model
//!
//! [`ChatModel`](answerkit_core::ChatModel) implementations for the
//! answerkit service.
//!
//! - [`OpenAiChatModel`] — the OpenAI chat completions API, or any
//!   OpenAI-compatible endpoint via a base URL override.
//! - [`MockChatModel`] — a scripted model for tests.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use answerkit_model::OpenAiChatModel;
//!
//! let model = OpenAiChatModel::from_env()?; // reads OPENAI_API_KEY
//! let answer = model.generate(&messages, &GenerateConfig::default()).await?;
//! ```

pub mod mock;
pub mod openai;

pub use mock::MockChatModel;
pub use openai::OpenAiChatModel;
