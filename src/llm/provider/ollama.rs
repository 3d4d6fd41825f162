//! Ollama LLM Provider
//!
//! Local LLM provider using an Ollama server.
//! https://ollama.ai/

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{http_client, CompletionRequest, CompletionResponse, LlmError, LlmProvider};
use crate::llm::config::{OllamaConfig, ProviderType};

/// Ollama provider
#[derive(Debug)]
pub struct OllamaProvider {
    config: OllamaConfig,
    client: Client,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    pub fn new(config: OllamaConfig) -> Result<Self, LlmError> {
        let client = http_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    /// Get the chat API URL
    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.url.trim_end_matches('/'))
    }
}

/// Ollama chat request
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
    /// JSON schema constraining the reply
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
}

/// Ollama message
#[derive(Debug, Serialize)]
struct OllamaMessage {
    role: &'static str,
    content: String,
}

/// Ollama options
#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    num_ctx: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<usize>,
}

/// Ollama chat response
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: String,
    message: OllamaChatMessage,
    done: bool,
    #[serde(default)]
    prompt_eval_count: Option<usize>,
    #[serde(default)]
    eval_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Ollama
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let start = Instant::now();

        let mut messages = Vec::new();
        if let Some(system) = request.system {
            messages.push(OllamaMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(OllamaMessage {
            role: "user",
            content: request.prompt,
        });

        let ollama_request = OllamaChatRequest {
            model: self.config.model.clone(),
            messages,
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_ctx: self.config.num_ctx,
                num_predict: request.max_tokens,
            },
            format: request.output_schema.map(|s| s.schema),
        };

        debug!("Sending Ollama request: model={}", self.config.model);

        let response = self
            .client
            .post(self.chat_url())
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(e, self.config.timeout_secs))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Ollama error: {} - {}", status, body);
            return Err(LlmError::from_status(status, body, &self.config.model));
        }

        let ollama_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(CompletionResponse {
            text: ollama_response.message.content,
            prompt_tokens: ollama_response.prompt_eval_count,
            completion_tokens: ollama_response.eval_count,
            model: ollama_response.model,
            finish_reason: if ollama_response.done {
                Some("stop".to_string())
            } else {
                None
            },
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
