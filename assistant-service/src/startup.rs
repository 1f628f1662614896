//! Application startup and lifecycle management.

use crate::config::AssistantConfig;
use crate::handlers::{health_check, readiness_check, run_agent};
use crate::instructions::Instructions;
use crate::middleware::{cors_layer, origin_guard_middleware, AllowedOrigins};
use crate::services::providers::{ChatProvider, OpenAiCompatibleProvider};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Result<Router, AppError> {
    let allowed_origins = AllowedOrigins::new(state.config.allowed_origins()?);

    let router = Router::new()
        // Message size is unbounded; every body reaches the handler
        .route(
            "/run-agent",
            post(run_agent).layer(DefaultBodyLimit::disable()),
        )
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .with_state(state)
        .layer(cors_layer(&allowed_origins))
        // Outside the CORS layer so disallowed preflights are refused too
        .layer(from_fn_with_state(allowed_origins, origin_guard_middleware))
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
        .layer(from_fn(request_id_middleware));

    Ok(router)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application against the configured model endpoint.
    pub async fn build(config: AssistantConfig) -> Result<Self, AppError> {
        let provider = OpenAiCompatibleProvider::new(config.model.clone()).map_err(|e| {
            tracing::error!("Failed to create model client: {}", e);
            AppError::ConfigError(anyhow::anyhow!(e))
        })?;

        tracing::info!(
            base_url = %config.model.base_url,
            model = %config.model.model,
            timeout_secs = config.model.request_timeout_secs,
            "Initialized OpenAI-compatible model client"
        );

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build the application with an explicit provider (used by tests).
    pub async fn build_with_provider(
        config: AssistantConfig,
        provider: Arc<dyn ChatProvider>,
    ) -> Result<Self, AppError> {
        config.validate()?;

        let instructions = Instructions::load(config.assistant.instructions_path.as_deref())
            .map_err(|e| {
                tracing::error!("Failed to load assistant instructions: {}", e);
                AppError::ConfigError(anyhow::anyhow!(e))
            })?;

        let source = match &config.assistant.instructions_path {
            Some(path) => path.display().to_string(),
            None => "embedded".to_string(),
        };
        tracing::info!(
            assistant = %config.assistant.name,
            instructions_version = %instructions.version,
            source = %source,
            "Loaded assistant instructions"
        );

        let address = config.common.address();
        let state = AppState::new(config, instructions, provider);
        let router = build_router(state)?;

        // Port 0 picks a random port for testing
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Assistant service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT or SIGTERM, then drain in-flight requests.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
