use axum::http::{HeaderValue, StatusCode};
use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::path::PathBuf;

use crate::dtos::AgentError;
use crate::services::providers::ProviderError;

/// Keys whose `APP_*` environment value is a comma separated list.
const LIST_KEYS: &[&str] = &["cors.allowed_origins"];

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub status_mode: StatusMode,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub assistant: AssistantSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ],
        }
    }
}

/// Connection settings for the OpenAI-compatible model endpoint.
///
/// Every call is a single attempt: failures are reported, never retried.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key")]
    pub api_key: Secret<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Upper bound on one model call; `0` waits indefinitely.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            model: default_model(),
            temperature: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantSettings {
    #[serde(default = "default_assistant_name")]
    pub name: String,
    /// External instructions document; the embedded one is used when unset.
    #[serde(default)]
    pub instructions_path: Option<PathBuf>,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            instructions_path: None,
        }
    }
}

/// How `/run-agent` chooses HTTP status codes for error bodies.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusMode {
    /// 400 for client mistakes, 5xx for model endpoint failures.
    #[default]
    Http,
    /// 200 for every response; the body alone carries the outcome.
    Legacy,
}

impl StatusMode {
    pub fn status_for(&self, error: &AgentError) -> StatusCode {
        if *self == StatusMode::Legacy {
            return StatusCode::OK;
        }

        match error {
            AgentError::InvalidBody | AgentError::MissingMessage => StatusCode::BAD_REQUEST,
            AgentError::Upstream(ProviderError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            AgentError::Upstream(ProviderError::RateLimited) => StatusCode::SERVICE_UNAVAILABLE,
            AgentError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_api_key() -> Secret<String> {
    Secret::new("ollama".to_string())
}

fn default_model() -> String {
    "gemma3:4b".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_assistant_name() -> String {
    "CodeWaveAI Assistant".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            log_level: default_log_level(),
            status_mode: StatusMode::default(),
            cors: CorsConfig::default(),
            model: ModelConfig::default(),
            assistant: AssistantSettings::default(),
        }
    }
}

impl AssistantConfig {
    pub fn load() -> Result<Self, AppError> {
        let config: AssistantConfig = core_config::builder(LIST_KEYS)?
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.allowed_origins()?;

        if self.model.model.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "model.model must not be empty"
            )));
        }

        reqwest::Url::parse(&self.model.base_url).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "model.base_url '{}' is not a valid URL: {}",
                self.model.base_url,
                e
            ))
        })?;

        Ok(())
    }

    /// The CORS allow-list as header values.
    ///
    /// Wildcards are refused because credentialed requests are allowed.
    pub fn allowed_origins(&self) -> Result<Vec<HeaderValue>, AppError> {
        self.cors
            .allowed_origins
            .iter()
            .map(|origin| {
                let origin = origin.trim();
                if origin == "*" {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "cors.allowed_origins must list explicit origins, not '*'"
                    )));
                }
                origin.parse::<HeaderValue>().map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "Invalid CORS origin '{}': {}",
                        origin,
                        e
                    ))
                })
            })
            .collect()
    }
}
