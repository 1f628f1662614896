//! Chat model provider abstractions and implementations.
//!
//! The service talks to one OpenAI-compatible endpoint; the trait keeps the
//! HTTP client swappable for the mock used in tests.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use mock::MockChatProvider;
pub use openai::OpenAiCompatibleProvider;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request to model endpoint timed out")]
    Timeout,

    #[error("Rate limited by model endpoint")]
    RateLimited,

    #[error("Model endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response from model endpoint: {0}")]
    InvalidResponse(String),

    #[error("Model returned no content")]
    EmptyResponse,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn from_openai(reason: Option<&str>) -> Self {
        match reason {
            Some("stop") | None => FinishReason::Complete,
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            Some(_) => FinishReason::Other,
        }
    }
}

/// Result of one chat completion.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Reply text, exactly as the model produced it.
    pub text: String,

    /// Prompt tokens consumed, when the endpoint reports usage.
    pub input_tokens: Option<u32>,

    /// Completion tokens generated, when the endpoint reports usage.
    pub output_tokens: Option<u32>,

    pub finish_reason: FinishReason,
}

/// A chat completion backend.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Model identifier, for logging.
    fn model(&self) -> &str;

    /// Send one system prompt and one user message; one round trip, no history.
    async fn complete(&self, system: &str, message: &str)
        -> Result<ProviderResponse, ProviderError>;

    /// Reachability probe.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
