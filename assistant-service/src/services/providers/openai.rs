//! OpenAI-compatible chat completion provider.
//!
//! Targets any endpoint serving `POST {base_url}/chat/completions`, such as
//! Ollama's `/v1` API. Each call is a single attempt.

use super::{ChatProvider, FinishReason, ProviderError, ProviderResponse};
use crate::config::ModelConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat provider backed by an OpenAI-compatible HTTP API.
pub struct OpenAiCompatibleProvider {
    config: ModelConfig,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: ModelConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }

        let client = builder.build().map_err(|e| {
            ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn build_request<'a>(&'a self, system: &'a str, message: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
            temperature: self.config.temperature,
        }
    }
}

fn map_send_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(err.to_string())
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(
        &self,
        system: &str,
        message: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let request = self.build_request(system, message);
        let url = self.endpoint("chat/completions");

        tracing::debug!(
            model = %self.config.model,
            url = %url,
            system_len = system.len(),
            message_len = message.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let api_response: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::InvalidResponse(e.to_string())
            }
        })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;
        let text = choice.message.content.ok_or(ProviderError::EmptyResponse)?;
        let usage = api_response.usage.unwrap_or_default();

        Ok(ProviderResponse {
            text,
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            finish_reason: FinishReason::from_openai(choice.finish_reason.as_deref()),
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(self.config.api_key.expose_secret())
            .send()
            .await
            .map_err(map_send_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::Api {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider(base_url: &str) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(ModelConfig {
            base_url: base_url.to_string(),
            ..ModelConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            provider("http://localhost:11434/v1/").endpoint("chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            provider("http://localhost:11434/v1").endpoint("models"),
            "http://localhost:11434/v1/models"
        );
    }

    #[test]
    fn request_carries_system_then_user_message() {
        let provider = provider("http://localhost:11434/v1");
        let body = serde_json::to_value(provider.build_request("Be helpful.", "Hi")).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "gemma3:4b",
                "messages": [
                    { "role": "system", "content": "Be helpful." },
                    { "role": "user", "content": "Hi" }
                ]
            })
        );
    }

    #[test]
    fn response_without_usage_parses() {
        let parsed: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hello" } }]
        }))
        .unwrap();

        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Hello"));
        assert!(parsed.usage.is_none());
    }
}
