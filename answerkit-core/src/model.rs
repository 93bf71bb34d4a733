//! The text generation provider trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::Message;

/// Generation parameters passed with every [`ChatModel`] call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GenerateConfig {
    /// Sampling temperature. `None` uses the provider default.
    pub temperature: Option<f32>,
    /// Upper bound on completion length in tokens.
    pub max_output_tokens: Option<u32>,
}

/// A text generation provider: role-tagged messages in, one completion out.
///
/// Implementations wrap specific chat-completion backends behind a unified
/// async interface. Callers inject them as `Arc<dyn ChatModel>` so tests can
/// substitute scripted doubles.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// The provider or model name, used in logs and error messages.
    fn name(&self) -> &str;

    /// Generate a single completion for the given message list.
    ///
    /// May return an empty string; callers decide whether that is acceptable.
    async fn generate(&self, messages: &[Message], config: &GenerateConfig) -> Result<String>;
}
