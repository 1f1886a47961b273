//! Application startup and lifecycle management.

use crate::config::{ChatConfig, CorsConfig, UpstreamConfig};
use crate::error::panic_response;
use crate::handlers::{
    chat::chat,
    health::{health_check, metrics_endpoint},
};
use crate::services::{
    ChatOrchestrator, ChatProvider, InMemoryConversationStore, MockChatProvider,
    OpenAiChatProvider, OpenAiConfig, PromptBuilder,
};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ChatConfig,
    pub orchestrator: Arc<ChatOrchestrator>,
}

/// Pick the upstream provider from configuration.
pub fn build_provider(config: &UpstreamConfig) -> Result<Arc<dyn ChatProvider>, AppError> {
    if !config.enabled {
        tracing::info!("Upstream disabled, using mock chat provider");
        return Ok(Arc::new(MockChatProvider::new(true)));
    }

    let provider = OpenAiChatProvider::new(OpenAiConfig {
        base_url: config.base_url.clone(),
        api_key: config.api_key.clone(),
        model: config.model.clone(),
        timeout: config.timeout(),
    })
    .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

    tracing::info!(
        model = %config.model,
        base_url = %config.base_url,
        "Initialized chat completions provider"
    );

    Ok(Arc::new(provider))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the provider selected by `config`.
    pub async fn build(config: ChatConfig) -> Result<Self, AppError> {
        let provider = build_provider(&config.upstream)?;
        Self::build_with_provider(config, provider).await
    }

    /// Build the application around an explicit provider.
    pub async fn build_with_provider(
        config: ChatConfig,
        provider: Arc<dyn ChatProvider>,
    ) -> Result<Self, AppError> {
        let store = Arc::new(InMemoryConversationStore::new());

        let orchestrator = ChatOrchestrator::new(store, provider)
            .with_prompt_builder(PromptBuilder::new(config.memory.history_window))
            .with_upstream_timeout(config.upstream.timeout())
            .with_degraded_reply(config.upstream.degraded_reply.clone());

        let state = AppState {
            config: config.clone(),
            orchestrator: Arc::new(orchestrator),
        };

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            history_window = config.memory.history_window,
            "Chat service listening"
        );

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}
