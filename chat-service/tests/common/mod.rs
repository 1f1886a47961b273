//! Test helpers for chat-service integration tests.

#![allow(dead_code)]

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chat_service::config::{
    ChatConfig, CorsConfig, MemoryConfig, UpstreamConfig, DEFAULT_DEGRADED_REPLY,
};
use chat_service::services::ChatProvider;
use chat_service::startup::{AppState, Application};
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub state: AppState,
    client: reqwest::Client,
}

pub fn test_config(upstream_base_url: &str, enabled: bool) -> ChatConfig {
    ChatConfig {
        common: CoreConfig::ephemeral(),
        upstream: UpstreamConfig {
            enabled,
            base_url: upstream_base_url.to_string(),
            api_key: "test-api-key".to_string(),
            model: "test-model".to_string(),
            timeout_secs: 5,
            degraded_reply: DEFAULT_DEGRADED_REPLY.to_string(),
        },
        memory: MemoryConfig { history_window: 10 },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
    }
}

impl TestApp {
    /// Spawn with the provider chosen by `config`.
    pub async fn spawn(config: ChatConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    /// Spawn around an injected provider.
    pub async fn spawn_with_provider(provider: Arc<dyn ChatProvider>) -> Self {
        let app = Application::build_with_provider(test_config("http://unused", false), provider)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    async fn start(app: Application) -> Self {
        let port = app.port();
        let state = app.state().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            state,
            client,
        }
    }

    pub async fn post_chat(&self, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/chat", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Stand-in for an OpenAI-compatible upstream.
pub struct FakeUpstream {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<Value>>>,
}

#[derive(Clone)]
struct FakeUpstreamState {
    status: StatusCode,
    body: Value,
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn fake_completions(
    State(state): State<FakeUpstreamState>,
    Json(request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().await.push(request);
    (state.status, Json(state.body.clone()))
}

impl FakeUpstream {
    pub async fn replying(text: &str) -> Self {
        Self::start(
            StatusCode::OK,
            json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": text },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 20, "completion_tokens": 5, "total_tokens": 25 }
            }),
        )
        .await
    }

    pub async fn failing(status: StatusCode) -> Self {
        Self::start(status, json!({ "error": { "message": "upstream exploded" } })).await
    }

    pub async fn start(status: StatusCode, body: Value) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeUpstreamState {
            status,
            body,
            requests: requests.clone(),
        };

        let router = Router::new()
            .route("/v1/chat/completions", post(fake_completions))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake upstream");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        FakeUpstream {
            base_url: format!("http://127.0.0.1:{}/v1", port),
            requests,
        }
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    pub async fn last_request(&self) -> Option<Value> {
        self.requests.lock().await.last().cloned()
    }
}
