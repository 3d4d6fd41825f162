//! Anthropic Claude API Provider
//!
//! Cloud LLM provider using the Anthropic messages API. The API has no
//! response-schema parameter, so the output shape travels in the prompt only.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{http_client, resolve_api_key, CompletionRequest, CompletionResponse, LlmError, LlmProvider};
use crate::llm::config::{AnthropicConfig, ProviderType};

/// Anthropic API version
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic provider
#[derive(Debug)]
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
    api_key: String,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    pub fn new(config: AnthropicConfig) -> Result<Self, LlmError> {
        let api_key =
            resolve_api_key(config.api_key.as_deref(), &["ANTHROPIC_API_KEY"], "Anthropic")?;
        let client = http_client(config.timeout_secs)?;

        Ok(Self { config, client, api_key })
    }

    /// Get the messages API URL
    fn messages_url(&self) -> String {
        format!("{}/messages", self.config.base_url.trim_end_matches('/'))
    }
}

/// Anthropic messages request
#[derive(Debug, Serialize)]
struct AnthropicMessagesRequest {
    model: String,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

/// Anthropic messages response
#[derive(Debug, Deserialize)]
struct AnthropicMessagesResponse {
    #[serde(default)]
    content: Vec<AnthropicContent>,
    model: String,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: usize,
    output_tokens: usize,
}

/// Anthropic error response
#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Anthropic
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let start = Instant::now();

        let anthropic_request = AnthropicMessagesRequest {
            model: self.config.model.clone(),
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            system: request.system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: request.prompt,
            }],
            temperature: request.temperature,
        };

        debug!("Sending Anthropic request: model={}", self.config.model);

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&anthropic_request)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(e, self.config.timeout_secs))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            if let Ok(error) = serde_json::from_str::<AnthropicError>(&text) {
                warn!("Anthropic error: {}", error.error.message);
                if error.error.error_type == "not_found_error" {
                    return Err(LlmError::ModelNotFound(self.config.model.clone()));
                }
                if error.error.error_type == "overloaded_error" {
                    return Err(LlmError::RateLimited(error.error.message));
                }
                return Err(LlmError::from_status(status, error.error.message, &self.config.model));
            }

            return Err(LlmError::from_status(status, text, &self.config.model));
        }

        let anthropic_response: AnthropicMessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let text = anthropic_response
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        Ok(CompletionResponse {
            text,
            prompt_tokens: Some(anthropic_response.usage.input_tokens),
            completion_tokens: Some(anthropic_response.usage.output_tokens),
            model: anthropic_response.model,
            finish_reason: anthropic_response.stop_reason,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_messages_url() {
        let provider = AnthropicProvider::new(AnthropicConfig {
            api_key: Some("test".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.messages_url(), "https://api.anthropic.com/v1/messages");
        assert!(!ANTHROPIC_VERSION.is_empty());
    }

    #[test]
    fn test_text_blocks_only() {
        let raw = json!({
            "content": [
                {"type": "text", "text": "{\"briefing\": "},
                {"type": "tool_use", "id": "x", "name": "n", "input": {}},
                {"type": "text", "text": "\"ok\"}"}
            ],
            "model": "claude-3-5-haiku-latest",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 4}
        });
        let parsed: AnthropicMessagesResponse = serde_json::from_value(raw).unwrap();
        let text: String = parsed
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(text, "{\"briefing\": \"ok\"}");
    }
}
