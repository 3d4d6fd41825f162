//! OpenAI API Provider
//!
//! Cloud LLM provider using the OpenAI chat completions API.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{http_client, resolve_api_key, CompletionRequest, CompletionResponse, LlmError, LlmProvider};
use crate::llm::config::{OpenAIConfig, ProviderType};

/// OpenAI provider
#[derive(Debug)]
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
    api_key: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(config: OpenAIConfig) -> Result<Self, LlmError> {
        let api_key = resolve_api_key(config.api_key.as_deref(), &["OPENAI_API_KEY"], "OpenAI")?;
        let client = http_client(config.timeout_secs)?;

        Ok(Self { config, client, api_key })
    }

    /// Get the chat completions URL
    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

/// OpenAI chat request
#[derive(Debug, Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    schema: Value,
    strict: bool,
}

/// OpenAI chat response
#[derive(Debug, Deserialize)]
struct OpenAIChatResponse {
    model: String,
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

/// OpenAI error response
#[derive(Debug, Deserialize)]
struct OpenAIError {
    error: OpenAIErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorDetail {
    message: String,
    code: Option<String>,
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::OpenAI
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let start = Instant::now();

        let mut messages = Vec::new();
        if let Some(system) = request.system {
            messages.push(OpenAIMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(OpenAIMessage {
            role: "user",
            content: request.prompt,
        });

        let openai_request = OpenAIChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.output_schema.map(|s| ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: s.name,
                    schema: s.schema,
                    strict: false,
                },
            }),
        };

        debug!("Sending OpenAI request: model={}", self.config.model);

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(e, self.config.timeout_secs))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            if let Ok(error) = serde_json::from_str::<OpenAIError>(&text) {
                warn!("OpenAI error: {}", error.error.message);
                if error.error.code.as_deref() == Some("model_not_found") {
                    return Err(LlmError::ModelNotFound(self.config.model.clone()));
                }
                return Err(LlmError::from_status(status, error.error.message, &self.config.model));
            }

            return Err(LlmError::from_status(status, text, &self.config.model));
        }

        let openai_response: OpenAIChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let choice = openai_response.choices.into_iter().next();
        let finish_reason = choice.as_ref().and_then(|c| c.finish_reason.clone());
        let text = match choice {
            Some(c) => {
                if let Some(refusal) = &c.message.refusal {
                    warn!("OpenAI refused the request: {}", refusal);
                }
                c.message.content.unwrap_or_default()
            }
            None => String::new(),
        };

        Ok(CompletionResponse {
            text,
            prompt_tokens: openai_response.usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens: openai_response.usage.as_ref().map(|u| u.completion_tokens),
            model: openai_response.model,
            finish_reason,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_url_trims_slash() {
        let provider = OpenAIProvider::new(OpenAIConfig {
            api_key: Some("sk-test".to_string()),
            base_url: "http://localhost:8000/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.chat_url(), "http://localhost:8000/v1/chat/completions");
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_response_format_shape() {
        let format = ResponseFormat {
            format_type: "json_schema",
            json_schema: JsonSchemaFormat {
                name: "SuggestResponseOutput".to_string(),
                schema: json!({"type": "object"}),
                strict: false,
            },
        };
        let value = serde_json::to_value(format).unwrap();
        assert_eq!(value["type"], "json_schema");
        assert_eq!(value["json_schema"]["name"], "SuggestResponseOutput");
    }

    #[test]
    fn test_null_content_decodes() {
        let raw = json!({
            "model": "gpt-4o-mini",
            "choices": [{"message": {"role": "assistant", "content": null, "refusal": "no"}, "finish_reason": "stop"}],
        });
        let parsed: OpenAIChatResponse = serde_json::from_value(raw).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
