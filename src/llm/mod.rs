//! LLM Integration Module
//!
//! Structured prompt invocation for security data:
//! - Threat data summarization with a risk level
//! - Remediation strategy suggestions
//! - Threat briefings
//!
//! Each flow validates its input record, renders a fixed template, makes one
//! round trip to the configured provider and validates the JSON reply against
//! the flow's output schema. Nothing is retried or cached.
//!
//! # Example
//!
//! ```ignore
//! use threatdesk::llm::{FlowSet, LlmConfig, SummarizeInput};
//!
//! let flows = FlowSet::from_config(&LlmConfig::default())?;
//! let input = SummarizeInput::new("5 failed logins from IP 10.0.0.5 in 2 minutes");
//! let result = flows.summarize_threat_data(&input).await?;
//! println!("{} ({})", result.summary, result.risk_level);
//! ```
//!
//! # Providers
//!
//! - **Gemini** (default): Google generative-language API
//! - **OpenAI**: chat completions with a JSON schema response format
//! - **Anthropic**: messages API, output shape described in the prompt
//! - **Ollama**: local server, schema passed as `format`

pub mod client;
pub mod config;
pub mod error;
pub mod flow;
pub mod flows;
pub mod prompts;
pub mod provider;
pub mod schema;

pub use client::ModelClient;
pub use config::{LlmConfig, ProviderType};
pub use error::{FailureKind, FlowError};
pub use flow::{Flow, FlowSpec};
pub use flows::{
    Briefing, BriefingInput, BriefingOutput, FlowSet, SuggestResponse, SuggestResponseInput,
    SuggestResponseOutput, Summarize, SummarizeInput, SummarizeOutput,
};
pub use prompts::{PromptTemplate, RenderError};
pub use provider::{create_provider, CompletionRequest, CompletionResponse, LlmError, LlmProvider};
pub use schema::{Record, Schema, ValidationError, ValidationMode};
