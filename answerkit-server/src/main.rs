//! answerkit server binary.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use answerkit_model::OpenAiChatModel;
use answerkit_rag::{InMemoryVectorIndex, OpenAiEmbeddingProvider, RagConfig, RagPipeline};
use answerkit_server::{app, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env().context("configuration error")?;

    let embedder = Arc::new(
        OpenAiEmbeddingProvider::new(config.openai_api_key.clone())?
            .with_model(config.embedding_model.clone()),
    );
    let chat_model = Arc::new(
        OpenAiChatModel::new(config.openai_api_key.clone())?
            .with_model(config.chat_model.clone()),
    );

    let pipeline = {
        let builder = RagPipeline::builder()
            .config(RagConfig::default())
            .embedder(embedder)
            .chat_model(chat_model);

        #[cfg(feature = "qdrant")]
        let builder = match &config.qdrant_url {
            Some(url) => builder.index(Arc::new(answerkit_rag::QdrantVectorIndex::new(
                url,
                config.collection.clone(),
            )?)),
            None => builder.index(Arc::new(InMemoryVectorIndex::new())),
        };
        #[cfg(not(feature = "qdrant"))]
        let builder = {
            if config.qdrant_url.is_some() {
                anyhow::bail!(
                    "ANSWERKIT_QDRANT_URL is set but this build lacks the 'qdrant' feature"
                );
            }
            builder.index(Arc::new(InMemoryVectorIndex::new()))
        };

        builder.build()?
    };

    let state = AppState { pipeline: Arc::new(pipeline) };
    let router = app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "answerkit server listening");

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
