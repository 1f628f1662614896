use std::sync::Arc;
use std::time::Instant;

use crate::instructions::Instructions;
use crate::services::providers::{ChatProvider, ProviderError};

/// Binds the assistant's instructions to a chat provider.
///
/// Built per request from shared handles. Holds no conversation history:
/// every `run` is one independent model call.
pub struct AssistantInvoker {
    name: String,
    instructions: Arc<Instructions>,
    provider: Arc<dyn ChatProvider>,
}

impl AssistantInvoker {
    pub fn new(
        name: impl Into<String>,
        instructions: Arc<Instructions>,
        provider: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions,
            provider,
        }
    }

    /// Answers one message. The reply is returned exactly as the model wrote it.
    pub async fn run(&self, message: &str) -> Result<String, ProviderError> {
        let started = Instant::now();

        let result = self
            .provider
            .complete(&self.instructions.text, message)
            .await;

        match result {
            Ok(response) => {
                tracing::info!(
                    assistant = %self.name,
                    model = %self.provider.model(),
                    instructions_version = %self.instructions.version,
                    input_tokens = ?response.input_tokens,
                    output_tokens = ?response.output_tokens,
                    finish_reason = ?response.finish_reason,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Assistant replied"
                );
                Ok(response.text)
            }
            Err(e) => {
                tracing::error!(
                    assistant = %self.name,
                    model = %self.provider.model(),
                    instructions_version = %self.instructions.version,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "Assistant model call failed"
                );
                Err(e)
            }
        }
    }
}
