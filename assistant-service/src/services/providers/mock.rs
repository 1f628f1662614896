//! Mock provider implementation for testing.

use super::{ChatProvider, FinishReason, ProviderError, ProviderResponse};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock chat provider for testing.
///
/// Replies with `Mock response for: <message>`; when disabled every call
/// fails the way an unreachable endpoint would.
pub struct MockChatProvider {
    enabled: bool,
    calls: AtomicUsize,
}

impl MockChatProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `complete` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        system: &str,
        message: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(ProviderError::Network(
                "Mock chat provider not enabled".to_string(),
            ));
        }

        Ok(ProviderResponse {
            text: format!("Mock response for: {}", message),
            input_tokens: Some(((system.len() + message.len()) / 4) as u32),
            output_tokens: Some(10),
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock chat provider not enabled".to_string(),
            ))
        }
    }
}
