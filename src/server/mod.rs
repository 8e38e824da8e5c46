//! HTTP surface for roadmap generation.
//!
//! `POST /generate` with `{topic, level}` answers `{root, source}`. The LLM
//! path is tried first when an API key is configured; any failure there
//! falls back to the local generator, so a valid request always gets a tree.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{
        HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    response::{IntoResponse, Response},
    routing::{any, get},
};
use serde::Serialize;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::acquire::{Acquired, GenerateRequest, Source, generate_local, now_millis};
use crate::llm::{CompletionClient, LlmConfig, LlmError, OpenAiClient, RoadmapGenerator};

mod config;

pub use config::ServerConfig;

/// Level used when a request does not name one.
const DEFAULT_LEVEL: &str = "Beginner";

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// `None` when no API key is configured; every request then uses the
    /// local generator.
    generator: Option<RoadmapGenerator>,
}

impl AppState {
    pub fn new(generator: Option<RoadmapGenerator>) -> Self {
        Self { generator }
    }

    pub fn with_client(client: Arc<dyn CompletionClient>) -> Self {
        Self::new(Some(RoadmapGenerator::new(client)))
    }

    /// Build from `OPENAI_*` settings. A missing key only disables the LLM.
    pub fn from_llm_config(config: LlmConfig) -> Result<Self, LlmError> {
        match OpenAiClient::new(config) {
            Ok(client) => Ok(Self::with_client(Arc::new(client))),
            Err(LlmError::MissingApiKey) => {
                warn!("OPENAI_API_KEY not set, serving local roadmaps only");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Router with permissive CORS headers and request tracing.
///
/// CORS headers are stamped onto every response rather than handled by a
/// preflight-answering layer, so `OPTIONS /generate` still reaches the
/// handler and gets its `ok` body.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/generate", any(generate))
        .route("/health", get(health))
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn generate(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    if method == Method::OPTIONS {
        return (StatusCode::OK, "ok").into_response();
    }
    if method != Method::POST {
        return error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    }

    // An unreadable body is treated like an empty one.
    let request: GenerateRequest = serde_json::from_slice(&body).unwrap_or_default();
    let Some(topic) = request.topic.filter(|t| !t.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "topic required");
    };
    let level = request
        .level
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());

    Json(roadmap_for(&state, &topic, &level).await).into_response()
}

async fn roadmap_for(state: &AppState, topic: &str, level: &str) -> Acquired {
    if let Some(generator) = &state.generator {
        match generator.generate(topic, level).await {
            Ok(root) => {
                return Acquired {
                    root,
                    source: Source::Llm,
                };
            }
            Err(e) => warn!(topic, error = %e, "LLM generation failed, using local roadmap"),
        }
    }
    info!(topic, level, "serving local roadmap");
    Acquired {
        root: generate_local(topic, level, now_millis()),
        source: Source::Local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatMessage;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    struct Fixed(&'static str);

    #[async_trait]
    impl CompletionClient for Fixed {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    async fn call(state: AppState, method: Method, body: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri("/generate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = create_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_topic_is_400() {
        let (status, body) = call(AppState::default(), Method::POST, r#"{"level":"Beginner"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["error"], "topic required");

        let (status, _) = call(AppState::default(), Method::POST, r#"{"topic":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(AppState::default(), Method::POST, "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let (status, body) = call(AppState::default(), Method::GET, "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json(&body)["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn test_options_acknowledged() {
        let (status, body) = call(AppState::default(), Method::OPTIONS, "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_preflight_reaches_handler_with_cors_headers() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/generate")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();
        let response = create_router(AppState::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(
            headers[ACCESS_CONTROL_ALLOW_METHODS]
                .to_str()
                .unwrap()
                .contains("POST")
        );
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_errors_carry_cors_headers() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/generate")
            .body(Body::from("{}"))
            .unwrap();
        let response = create_router(AppState::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_without_key_serves_local() {
        let (status, body) = call(
            AppState::default(),
            Method::POST,
            r#"{"topic":"Web Development","level":"Beginner"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["source"], "local");
        assert_eq!(body["root"]["label"], "Web Development");
        assert_eq!(body["root"]["children"][0]["label"], "Frontend");
    }

    #[tokio::test]
    async fn test_llm_answer_served() {
        let state = AppState::with_client(Arc::new(Fixed(
            r#"{"id":"r","label":"Rust","children":[{"id":"c","label":"Cargo"}]}"#,
        )));
        let (status, body) = call(state, Method::POST, r#"{"topic":"Rust"}"#).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["source"], "llm");
        assert_eq!(body["root"]["children"][0]["label"], "Cargo");
    }

    #[tokio::test]
    async fn test_unusable_llm_answer_falls_back() {
        let state = AppState::with_client(Arc::new(Fixed("I would rather not.")));
        let (status, body) = call(state, Method::POST, r#"{"topic":"Gardening"}"#).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["source"], "local");
        assert_eq!(body["root"]["children"][0]["label"], "Soil Basics");
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = create_router(AppState::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
