//! The chat endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use answerkit_core::Message;
use answerkit_rag::{RagError, RagPipeline, SourceRef};

/// Shared state: the pipeline, constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    /// The retrieval pipeline handling every request.
    pub pipeline: Arc<RagPipeline>,
}

/// The chat request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user's question. Must be non-empty after trimming.
    pub query: String,
    /// Prior turns, oldest first. Optional.
    #[serde(default)]
    pub conversation_history: Vec<Message>,
}

/// The chat success response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// The generated (or canned) answer.
    pub answer: String,
    /// Ranked source diagnostics, when retrieval contributed context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceRef>>,
}

/// The error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error category: `invalid_request`, `configuration`, or `internal`.
    pub error: &'static str,
    /// Human-readable detail, when safe to expose.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let result = state
        .pipeline
        .answer(&request.query, &request.conversation_history)
        .await
        .map_err(map_error)?;

    Ok(Json(ChatResponse { answer: result.answer, sources: result.sources }))
}

fn map_error(err: RagError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        RagError::InvalidQuery(message) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: "invalid_request", message: Some(message) }),
        ),
        RagError::Config(_) | RagError::Core(answerkit_core::CoreError::Config(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "configuration",
                message: Some("verify provider credentials and configuration".into()),
            }),
        ),
        other => {
            error!(error = %other, "chat request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: "internal", message: None }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use answerkit_model::MockChatModel;
    use answerkit_rag::{EmbeddingProvider, InMemoryVectorIndex, RagConfig};

    struct UnitEmbedder;

    #[async_trait]
    impl EmbeddingProvider for UnitEmbedder {
        async fn embed(&self, _text: &str) -> answerkit_rag::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn test_app() -> Router {
        let pipeline = RagPipeline::builder()
            .config(RagConfig::default())
            .embedder(Arc::new(UnitEmbedder))
            .index(Arc::new(InMemoryVectorIndex::new()))
            .chat_model(Arc::new(MockChatModel::new(["alt"])))
            .build()
            .unwrap();
        app(AppState { pipeline: Arc::new(pipeline) })
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::post("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn blank_query_is_a_client_error() {
        let (status, body) = post_json(test_app(), r#"{"query": "   "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_request");
    }

    #[tokio::test]
    async fn greeting_returns_canned_answer_without_sources() {
        let (status, body) = post_json(test_app(), r#"{"query": "Hello"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["answer"].as_str().unwrap().contains("product assistant"));
        assert!(body.get("sources").is_none());
    }

    #[tokio::test]
    async fn empty_knowledge_base_yields_apology() {
        let (status, body) =
            post_json(test_app(), r#"{"query": "What is the price of Widget A?"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["answer"].as_str().unwrap().contains("could not find"));
    }

    #[tokio::test]
    async fn history_is_accepted_in_camel_case() {
        let body = r#"{
            "query": "what about the price",
            "conversationHistory": [
                {"role": "user", "content": "Tell me about Widget A"},
                {"role": "assistant", "content": "Widget A is a widget."}
            ]
        }"#;
        let (status, _) = post_json(test_app(), body).await;
        assert_eq!(status, StatusCode::OK);
    }
}
