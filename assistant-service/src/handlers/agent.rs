use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::dtos::{extract_message, AgentError, RunAgentResponse};
use crate::AppState;

/// `POST /run-agent`: answers one message with the configured assistant.
///
/// The body is read raw so that a malformed or absent JSON body produces the
/// service's own error shape instead of the extractor's rejection.
pub async fn run_agent(State(state): State<AppState>, body: Bytes) -> Response {
    match answer(&state, &body).await {
        Ok(output) => (StatusCode::OK, Json(RunAgentResponse::Output(output))).into_response(),
        Err(err) => {
            let status = state.config.status_mode.status_for(&err);
            if !matches!(err, AgentError::Upstream(_)) {
                tracing::warn!(
                    status = status.as_u16(),
                    body_len = body.len(),
                    error = %err,
                    "Rejected run-agent request"
                );
            }
            (status, Json(RunAgentResponse::from_error(&err))).into_response()
        }
    }
}

async fn answer(state: &AppState, body: &[u8]) -> Result<String, AgentError> {
    let message = extract_message(body)?;
    let output = state.invoker().run(&message).await?;
    Ok(output)
}
