//! LLM Provider Abstraction
//!
//! Provides a unified interface for the remote generative-model backends.

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::config::{LlmConfig, ProviderType};

/// LLM Provider error types
#[derive(Debug, Error)]
pub enum LlmError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
    /// Request timeout
    #[error("Request timeout after {0}s")]
    Timeout(u64),
    /// Rate limited or out of quota
    #[error("Rate limited: {0}")]
    RateLimited(String),
    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),
    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),
    /// Provider answered with an error status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// Response envelope could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LlmError {
    /// Classify a transport error; `timeout_secs` is the client timeout in force
    pub fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout_secs)
        } else if err.is_connect() {
            LlmError::Connection(err.to_string())
        } else if err.is_decode() {
            LlmError::InvalidResponse(err.to_string())
        } else {
            LlmError::Internal(err.to_string())
        }
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: StatusCode, body: String, model: &str) -> Self {
        match status.as_u16() {
            401 | 403 => LlmError::Authentication(body),
            404 => LlmError::ModelNotFound(model.to_string()),
            429 => LlmError::RateLimited(body),
            code => LlmError::Http { status: code, body },
        }
    }
}

/// Output shape requested from the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSchema {
    /// Schema name
    pub name: String,
    /// JSON-Schema object
    pub schema: Value,
}

/// Completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// System prompt
    pub system: Option<String>,
    /// User prompt
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: Option<usize>,
    /// Temperature (0-2)
    pub temperature: Option<f32>,
    /// Structured output descriptor
    pub output_schema: Option<OutputSchema>,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens: None,
            temperature: None,
            output_schema: None,
        }
    }

    /// Set system prompt
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Request JSON output matching a schema
    pub fn with_output_schema(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.output_schema = Some(OutputSchema {
            name: name.into(),
            schema,
        });
        self
    }
}

/// Completion response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text; empty when the model produced nothing
    pub text: String,
    /// Tokens used in prompt
    pub prompt_tokens: Option<usize>,
    /// Tokens generated
    pub completion_tokens: Option<usize>,
    /// Model used
    pub model: String,
    /// Finish reason
    pub finish_reason: Option<String>,
    /// Response time in milliseconds
    pub duration_ms: u64,
}

/// LLM Provider trait
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Get provider name
    fn name(&self) -> &str;

    /// Get provider type
    fn provider_type(&self) -> ProviderType;

    /// Model requests are sent to
    fn model(&self) -> &str;

    /// Generate completion
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Create the configured provider
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.provider {
        ProviderType::Gemini => Ok(Arc::new(GeminiProvider::new(config.gemini.clone())?)),
        ProviderType::OpenAI => Ok(Arc::new(OpenAIProvider::new(config.openai.clone())?)),
        ProviderType::Anthropic => Ok(Arc::new(AnthropicProvider::new(config.anthropic.clone())?)),
        ProviderType::Ollama => Ok(Arc::new(OllamaProvider::new(config.ollama.clone())?)),
    }
}

/// Build the shared HTTP client for a provider
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| LlmError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Resolve an API key from config, then from the environment
pub(crate) fn resolve_api_key(
    configured: Option<&str>,
    env_vars: &[&str],
    provider: &str,
) -> Result<String, LlmError> {
    configured
        .filter(|k| !k.trim().is_empty())
        .map(String::from)
        .or_else(|| {
            env_vars
                .iter()
                .filter_map(|var| std::env::var(var).ok())
                .find(|k| !k.trim().is_empty())
        })
        .ok_or_else(|| {
            LlmError::Authentication(format!(
                "{} API key not found (set {} or configure api_key)",
                provider,
                env_vars.join(" / ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completion_request() {
        let req = CompletionRequest::new("Hello")
            .with_system("You are a helpful assistant")
            .with_max_tokens(100)
            .with_temperature(0.5)
            .with_output_schema("Out", json!({"type": "object"}));

        assert_eq!(req.prompt, "Hello");
        assert_eq!(req.system, Some("You are a helpful assistant".to_string()));
        assert_eq!(req.max_tokens, Some(100));
        assert_eq!(req.output_schema.unwrap().name, "Out");
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            LlmError::from_status(StatusCode::UNAUTHORIZED, "bad key".into(), "m"),
            LlmError::Authentication(_)
        ));
        assert!(matches!(
            LlmError::from_status(StatusCode::TOO_MANY_REQUESTS, "quota".into(), "m"),
            LlmError::RateLimited(_)
        ));
        match LlmError::from_status(StatusCode::NOT_FOUND, String::new(), "gemini-x") {
            LlmError::ModelNotFound(model) => assert_eq!(model, "gemini-x"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            LlmError::from_status(StatusCode::BAD_GATEWAY, "upstream".into(), "m"),
            LlmError::Http { status: 502, .. }
        ));
    }

    #[test]
    fn test_resolve_api_key_prefers_config() {
        let key = resolve_api_key(Some("from-config"), &["THREATDESK_TEST_UNSET_KEY"], "Test").unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let err = resolve_api_key(Some("  "), &["THREATDESK_TEST_UNSET_KEY"], "Test").unwrap_err();
        assert!(matches!(err, LlmError::Authentication(_)));
    }
}
