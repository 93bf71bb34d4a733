//! Environment-driven server configuration.

use answerkit_core::CoreError;

/// Configuration read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind, from `ANSWERKIT_BIND` (default `0.0.0.0:8080`).
    pub bind_addr: String,
    /// OpenAI API key, from `OPENAI_API_KEY`. Required.
    pub openai_api_key: String,
    /// Chat model name, from `ANSWERKIT_CHAT_MODEL` (default `gpt-4o-mini`).
    pub chat_model: String,
    /// Embedding model name, from `ANSWERKIT_EMBEDDING_MODEL`
    /// (default `text-embedding-3-small`).
    pub embedding_model: String,
    /// Qdrant URL, from `ANSWERKIT_QDRANT_URL`. When unset, the in-memory
    /// index is used (an empty knowledge base unless seeded by the caller).
    pub qdrant_url: Option<String>,
    /// Qdrant collection name, from `ANSWERKIT_COLLECTION`
    /// (default `products`).
    pub collection: String,
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] when `OPENAI_API_KEY` is absent or
    /// empty. Configuration errors are fatal and are surfaced with a
    /// message instructing credential verification.
    pub fn from_env() -> Result<Self, CoreError> {
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                CoreError::Config(
                    "OPENAI_API_KEY is not set; verify your provider credentials".into(),
                )
            })?;

        Ok(Self {
            bind_addr: env_or("ANSWERKIT_BIND", "0.0.0.0:8080"),
            openai_api_key,
            chat_model: env_or("ANSWERKIT_CHAT_MODEL", "gpt-4o-mini"),
            embedding_model: env_or("ANSWERKIT_EMBEDDING_MODEL", "text-embedding-3-small"),
            qdrant_url: std::env::var("ANSWERKIT_QDRANT_URL").ok().filter(|s| !s.is_empty()),
            collection: env_or("ANSWERKIT_COLLECTION", "products"),
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).ok().filter(|s| !s.is_empty()).unwrap_or_else(|| default.to_string())
}
