//! Final answer generation.

use std::sync::Arc;

use tracing::debug;

use answerkit_core::{ChatModel, GenerateConfig, Message, Role};

use crate::config::RagConfig;
use crate::error::Result;
use crate::prompt::SYSTEM_PERSONA;

/// Returned when the provider completes successfully but with empty content.
pub const EMPTY_COMPLETION_PLACEHOLDER: &str =
    "I was unable to produce an answer for that question. Please try rephrasing it.";

/// Generates the final answer from the built prompt and history.
///
/// Unlike expansion and re-ranking, generation failures are hard failures:
/// they propagate so the caller never returns a fabricated or empty answer
/// silently.
pub struct AnswerGenerator {
    model: Arc<dyn ChatModel>,
}

impl AnswerGenerator {
    /// Create a generator backed by the given chat model.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Generate the answer text for `prompt`.
    ///
    /// Builds the message list as: system persona, the last
    /// `answer_history_window` history turns (user/assistant roles only),
    /// then one user message carrying the prompt.
    ///
    /// # Errors
    ///
    /// Propagates any provider error unchanged.
    pub async fn generate(
        &self,
        prompt: String,
        history: &[Message],
        config: &RagConfig,
    ) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(SYSTEM_PERSONA));

        let recent = &history[history.len().saturating_sub(config.answer_history_window)..];
        messages.extend(
            recent
                .iter()
                .filter(|m| matches!(m.role, Role::User | Role::Assistant))
                .cloned(),
        );
        messages.push(Message::user(prompt));

        let generate_config = GenerateConfig {
            temperature: Some(config.temperature),
            max_output_tokens: Some(config.max_output_tokens),
        };

        let completion = self.model.generate(&messages, &generate_config).await?;
        debug!(model = self.model.name(), completion_len = completion.len(), "answer generated");

        if completion.trim().is_empty() {
            return Ok(EMPTY_COMPLETION_PLACEHOLDER.to_string());
        }
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answerkit_model::MockChatModel;

    #[tokio::test]
    async fn builds_system_history_prompt_message_list() {
        let model = Arc::new(MockChatModel::new(["the answer"]));
        let generator = AnswerGenerator::new(model.clone());
        let history = vec![Message::user("earlier question"), Message::assistant("earlier answer")];

        let answer = generator
            .generate("the prompt".into(), &history, &RagConfig::default())
            .await
            .unwrap();

        assert_eq!(answer, "the answer");
        let calls = model.calls();
        let messages = &calls[0];
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].content, "earlier question");
        assert_eq!(messages[2].content, "earlier answer");
        assert_eq!(messages.last().unwrap().content, "the prompt");
    }

    #[tokio::test]
    async fn history_is_windowed_to_answer_history_window() {
        let model = Arc::new(MockChatModel::new(["ok"]));
        let generator = AnswerGenerator::new(model.clone());
        let history: Vec<Message> =
            (0..12).map(|i| Message::user(format!("turn {i}"))).collect();

        generator.generate("p".into(), &history, &RagConfig::default()).await.unwrap();

        let calls = model.calls();
        // system + 8 history turns + prompt
        assert_eq!(calls[0].len(), 10);
        assert_eq!(calls[0][1].content, "turn 4");
    }

    #[tokio::test]
    async fn empty_completion_becomes_placeholder() {
        let model = Arc::new(MockChatModel::new(["   "]));
        let generator = AnswerGenerator::new(model);
        let answer =
            generator.generate("p".into(), &[], &RagConfig::default()).await.unwrap();
        assert_eq!(answer, EMPTY_COMPLETION_PLACEHOLDER);
    }

    #[tokio::test]
    async fn provider_error_propagates() {
        let generator = AnswerGenerator::new(Arc::new(MockChatModel::failing()));
        assert!(generator.generate("p".into(), &[], &RagConfig::default()).await.is_err());
    }
}
