//! # answerkit-core
//!
//! Shared types for the answerkit question-answering service: chat messages,
//! generation parameters, the [`ChatModel`] trait implemented by text
//! generation providers, and the base error type.
//!
//! Provider implementations live in `answerkit-model`; the retrieval
//! pipeline that consumes them lives in `answerkit-rag`.

mod error;
mod message;
mod model;

pub use error::{CoreError, Result};
pub use message::{Message, Role};
pub use model::{ChatModel, GenerateConfig};
