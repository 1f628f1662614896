pub mod config;
pub mod dtos;
pub mod handlers;
pub mod instructions;
pub mod middleware;
pub mod services;
pub mod startup;

use crate::config::AssistantConfig;
use crate::instructions::Instructions;
use crate::services::providers::ChatProvider;
use crate::services::AssistantInvoker;
use std::sync::Arc;

/// Shared application state. Everything in it is read-only.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AssistantConfig>,
    pub instructions: Arc<Instructions>,
    pub provider: Arc<dyn ChatProvider>,
}

impl AppState {
    pub fn new(
        config: AssistantConfig,
        instructions: Instructions,
        provider: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            instructions: Arc::new(instructions),
            provider,
        }
    }

    /// A fresh invoker bound to this state's instructions and provider.
    pub fn invoker(&self) -> AssistantInvoker {
        AssistantInvoker::new(
            self.config.assistant.name.clone(),
            self.instructions.clone(),
            self.provider.clone(),
        )
    }
}
