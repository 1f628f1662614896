//! Shared fixtures for assistant-service integration tests.

#![allow(dead_code)]

use assistant_service::config::{AssistantConfig, StatusMode};
use assistant_service::instructions::Instructions;
use assistant_service::services::providers::ChatProvider;
use assistant_service::startup::build_router;
use assistant_service::AppState;
use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Configuration bound to a random local port.
pub fn test_config() -> AssistantConfig {
    let mut config = AssistantConfig::default();
    config.common.host = "127.0.0.1".to_string();
    config.common.port = 0;
    config.log_level = "error".to_string();
    config
}

pub fn test_router(provider: Arc<dyn ChatProvider>, status_mode: StatusMode) -> Router {
    let mut config = test_config();
    config.status_mode = status_mode;

    let instructions = Instructions::embedded().expect("Embedded instructions must load");
    let state = AppState::new(config, instructions, provider);
    build_router(state).expect("Failed to build router")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// What the fake model endpoint does with each chat completion request.
#[derive(Debug, Clone)]
pub enum FakeBehavior {
    /// Answer with a single choice containing this text.
    Reply(String),
    /// Answer with this raw JSON body and status 200.
    Raw(Value),
    /// Fail with the given status and body.
    Status(u16, String),
    /// Wait, then reply.
    Delay(Duration, String),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct FakeState {
    behavior: Arc<FakeBehavior>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// In-process OpenAI-compatible endpoint serving `/v1/chat/completions` and `/v1/models`.
pub struct FakeModel {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeModel {
    pub async fn spawn(behavior: FakeBehavior) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            behavior: Arc::new(behavior),
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1/chat/completions", post(fake_completion))
            .route(
                "/v1/models",
                get(|| async { Json(json!({ "object": "list", "data": [] })) }),
            )
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake model listener");
        let addr = listener.local_addr().expect("Fake model has no address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("Fake model lock poisoned").clone()
    }
}

/// A base URL on which nothing is listening.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Probe listener has no address");
    drop(listener);
    format!("http://{}/v1", addr)
}

fn completion(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gemma3:4b",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 12, "total_tokens": 132 }
    })
}

async fn fake_completion(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state
        .requests
        .lock()
        .expect("Fake model lock poisoned")
        .push(RecordedRequest {
            authorization: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string()),
            body,
        });

    match state.behavior.as_ref() {
        FakeBehavior::Reply(text) => Json(completion(text)).into_response(),
        FakeBehavior::Raw(value) => Json(value.clone()).into_response(),
        FakeBehavior::Status(code, body) => (
            StatusCode::from_u16(*code).expect("Invalid fake status"),
            body.clone(),
        )
            .into_response(),
        FakeBehavior::Delay(delay, text) => {
            tokio::time::sleep(*delay).await;
            Json(completion(text)).into_response()
        }
    }
}
