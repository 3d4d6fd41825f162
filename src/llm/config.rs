//! LLM Configuration
//!
//! Provider selection and per-provider settings. Read once at start-up and
//! shared read-only afterwards. API keys left unset here are taken from the
//! environment when the provider is created.

use serde::{Deserialize, Serialize};

/// Main LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider to use
    pub provider: ProviderType,
    /// Temperature for generation
    pub temperature: f32,
    /// Reject values outside a field's described choices (e.g. risk level)
    pub strict_choices: bool,
    /// Gemini configuration
    pub gemini: GeminiConfig,
    /// OpenAI configuration
    pub openai: OpenAIConfig,
    /// Anthropic configuration
    pub anthropic: AnthropicConfig,
    /// Ollama configuration
    pub ollama: OllamaConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::Gemini,
            temperature: 0.2,
            strict_choices: false,
            gemini: GeminiConfig::default(),
            openai: OpenAIConfig::default(),
            anthropic: AnthropicConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Model name of the selected provider
    pub fn model(&self) -> &str {
        match self.provider {
            ProviderType::Gemini => &self.gemini.model,
            ProviderType::OpenAI => &self.openai.model,
            ProviderType::Anthropic => &self.anthropic.model,
            ProviderType::Ollama => &self.ollama.model,
        }
    }
}

/// LLM provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Google generative-language API
    #[default]
    Gemini,
    /// OpenAI API
    OpenAI,
    /// Anthropic Claude API
    Anthropic,
    /// Ollama local server
    Ollama,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenAI => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "googleai" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key (falls back to GEMINI_API_KEY / GOOGLE_API_KEY)
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Model to use
    pub model: String,
    /// Request timeout
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            timeout_secs: 60,
        }
    }
}

/// OpenAI API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAIConfig {
    /// API key (falls back to OPENAI_API_KEY)
    pub api_key: Option<String>,
    /// API base URL (for Azure or proxies)
    pub base_url: String,
    /// Model to use
    pub model: String,
    /// Request timeout
    pub timeout_secs: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Anthropic Claude API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    /// API key (falls back to ANTHROPIC_API_KEY)
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Model to use
    pub model: String,
    /// Request timeout
    pub timeout_secs: u64,
    /// Max tokens per request when a prompt sets none
    pub max_tokens: usize,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com/v1".to_string(),
            model: "claude-3-5-haiku-latest".to_string(),
            timeout_secs: 60,
            max_tokens: 4096,
        }
    }
}

/// Ollama configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Server URL
    pub url: String,
    /// Model name to use
    pub model: String,
    /// Request timeout
    pub timeout_secs: u64,
    /// Context window size
    pub num_ctx: usize,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434".to_string(),
            model: "llama3.2".to_string(),
            timeout_secs: 120,
            num_ctx: 8192,
        }
    }
}
