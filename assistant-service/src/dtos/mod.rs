//! Request and response bodies for `/run-agent`.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::services::providers::ProviderError;

pub const INVALID_BODY_MESSAGE: &str = "Invalid or missing JSON body";
pub const MISSING_MESSAGE_MESSAGE: &str = "Missing 'message' field";
pub const UPSTREAM_FAILURE_MESSAGE: &str =
    "The assistant is currently unavailable. Please try again later.";

/// Why a `/run-agent` call produced no output.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{}", INVALID_BODY_MESSAGE)]
    InvalidBody,

    #[error("{}", MISSING_MESSAGE_MESSAGE)]
    MissingMessage,

    #[error("Model call failed: {0}")]
    Upstream(#[from] ProviderError),
}

impl AgentError {
    /// Text returned to the caller. Provider details are never exposed.
    pub fn public_message(&self) -> &'static str {
        match self {
            AgentError::InvalidBody => INVALID_BODY_MESSAGE,
            AgentError::MissingMessage => MISSING_MESSAGE_MESSAGE,
            AgentError::Upstream(_) => UPSTREAM_FAILURE_MESSAGE,
        }
    }
}

/// Exactly one of `output` or `error`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunAgentResponse {
    Output(String),
    Error(String),
}

impl RunAgentResponse {
    pub fn from_error(error: &AgentError) -> Self {
        RunAgentResponse::Error(error.public_message().to_string())
    }
}

/// Extracts the user message from a raw request body.
///
/// The body must be JSON and `message` must be a non-empty string. Absent,
/// `null` and other falsy values (`false`, `0`, `[]`, `{}`) count as missing,
/// as do values that are not text. Only strict JSON is accepted, so bare
/// `NaN` or `Infinity` tokens make the whole body invalid.
pub fn extract_message(body: &[u8]) -> Result<String, AgentError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| AgentError::InvalidBody)?;

    match value.get("message") {
        Some(Value::String(message)) if !message.is_empty() => Ok(message.clone()),
        _ => Err(AgentError::MissingMessage),
    }
}
