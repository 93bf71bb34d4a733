//! OpenAI chat completion provider.
//!
//! Calls the `/v1/chat/completions` endpoint directly with `reqwest`.
//! Works against any OpenAI-compatible API via [`OpenAiChatModel::compatible`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use answerkit_core::{ChatModel, CoreError, GenerateConfig, Message, Result, Role};

/// The default OpenAI chat completions endpoint.
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default chat model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// A [`ChatModel`] backed by the OpenAI chat completions API.
///
/// # Configuration
///
/// - `model` – defaults to `gpt-4o-mini`.
/// - `api_key` – from the constructor or the `OPENAI_API_KEY` environment
///   variable.
/// - `base_url` – override for OpenAI-compatible servers (Ollama, vLLM, etc.).
#[derive(Debug)]
pub struct OpenAiChatModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl OpenAiChatModel {
    /// Create a new provider with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(CoreError::Config("OpenAI API key must not be empty".into()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            url: OPENAI_CHAT_URL.into(),
        })
    }

    /// Create a new provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            CoreError::Config("OPENAI_API_KEY environment variable not set".into())
        })?;
        Self::new(api_key)
    }

    /// Create a provider for an OpenAI-compatible API at `base_url`.
    ///
    /// `base_url` is the API root (e.g. `http://localhost:11434/v1`); the
    /// `/chat/completions` path is appended.
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let mut this = Self::new(api_key)?;
        this.model = model.into();
        this.url = format!("{}/chat/completions", base_url.into().trim_end_matches('/'));
        Ok(this)
    }

    /// Set the model name (e.g. `gpt-4o`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

// ── ChatModel implementation ───────────────────────────────────────

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, messages: &[Message], config: &GenerateConfig) -> Result<String> {
        debug!(
            provider = "OpenAI",
            model = %self.model,
            message_count = messages.len(),
            "chat completion request"
        );

        let request_body = ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| WireMessage { role: wire_role(m.role), content: &m.content })
                .collect(),
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "request failed");
                CoreError::Model {
                    provider: "OpenAI".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "OpenAI", %status, "API error");
            return Err(CoreError::Model {
                provider: "OpenAI".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = "OpenAI", error = %e, "failed to parse response");
            CoreError::Model {
                provider: "OpenAI".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_a_config_error() {
        let err = OpenAiChatModel::new("").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn compatible_appends_completions_path() {
        let model =
            OpenAiChatModel::compatible("key", "http://localhost:11434/v1/", "llama3").unwrap();
        assert_eq!(model.url, "http://localhost:11434/v1/chat/completions");
        assert_eq!(model.name(), "llama3");
    }
}
