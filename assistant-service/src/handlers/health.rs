use axum::{extract::State, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

use crate::AppState;

/// Liveness probe. Does not contact the model endpoint.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "assistant-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: ready once the model endpoint answers.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.provider.health_check().await.map_err(|e| {
        tracing::warn!(
            model = %state.provider.model(),
            error = %e,
            "Model endpoint health check failed"
        );
        AppError::ServiceUnavailable
    })?;

    Ok(Json(json!({
        "status": "ready",
        "model": state.provider.model()
    })))
}
