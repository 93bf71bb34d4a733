//! A scripted chat model for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use answerkit_core::{ChatModel, CoreError, GenerateConfig, Message, Result};

/// A [`ChatModel`] that replays scripted responses and records every call.
///
/// Responses are consumed in order; when the script is exhausted, the last
/// response repeats. An empty script makes every call fail, and
/// [`failing_at`](Self::failing_at) injects a failure at a single call
/// without disturbing the rest of the script, which is useful for
/// exercising degradation paths.
///
/// # Example
///
/// ```rust,ignore
/// let model = MockChatModel::new(["first reply", "second reply"]);
/// let out = model.generate(&messages, &GenerateConfig::default()).await?;
/// assert_eq!(model.call_count(), 1);
/// ```
pub struct MockChatModel {
    responses: Vec<String>,
    failures: Vec<usize>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockChatModel {
    /// Create a mock that replays the given responses in order.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            failures: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock whose every call returns a model error.
    pub fn failing() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Make the 0-based `call`-th `generate` call return a model error.
    ///
    /// Failing calls do not consume a scripted response; the next
    /// successful call picks up where the script left off.
    pub fn failing_at(mut self, call: usize) -> Self {
        self.failures.push(call);
        self
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The message lists passed to each `generate` call, in order.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, messages: &[Message], _config: &GenerateConfig) -> Result<String> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(messages.to_vec());
        let index = calls.len() - 1;

        if self.failures.contains(&index) {
            return Err(CoreError::Model {
                provider: "mock".into(),
                message: "scripted failure".into(),
            });
        }

        let consumed = (0..index).filter(|i| !self.failures.contains(i)).count();
        match self.responses.get(consumed).or_else(|| self.responses.last()) {
            Some(response) => Ok(response.clone()),
            None => Err(CoreError::Model {
                provider: "mock".into(),
                message: "no scripted response".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_then_repeats_last() {
        let model = MockChatModel::new(["a", "b"]);
        let config = GenerateConfig::default();
        assert_eq!(model.generate(&[], &config).await.unwrap(), "a");
        assert_eq!(model.generate(&[], &config).await.unwrap(), "b");
        assert_eq!(model.generate(&[], &config).await.unwrap(), "b");
        assert_eq!(model.call_count(), 3);
    }

    #[tokio::test]
    async fn empty_script_fails() {
        let model = MockChatModel::failing();
        assert!(model.generate(&[], &GenerateConfig::default()).await.is_err());
    }

    #[tokio::test]
    async fn failing_at_skips_one_call_without_consuming_the_script() {
        let model = MockChatModel::new(["a", "b"]).failing_at(1);
        let config = GenerateConfig::default();
        assert_eq!(model.generate(&[], &config).await.unwrap(), "a");
        assert!(model.generate(&[], &config).await.is_err());
        assert_eq!(model.generate(&[], &config).await.unwrap(), "b");
        assert_eq!(model.call_count(), 3);
    }
}
