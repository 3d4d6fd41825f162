//! Concrete flows
//!
//! Each flow is a [`FlowSpec`](super::flow::FlowSpec) binding; [`FlowSet`]
//! bundles the three over one shared model client.

pub mod briefing;
pub mod suggest_response;
pub mod summarize;

pub use briefing::{Briefing, BriefingInput, BriefingOutput};
pub use suggest_response::{SuggestResponse, SuggestResponseInput, SuggestResponseOutput};
pub use summarize::{Summarize, SummarizeInput, SummarizeOutput};

use super::client::ModelClient;
use super::config::LlmConfig;
use super::error::FlowError;
use super::flow::Flow;
use super::provider::{create_provider, LlmError};

/// The three flows over one provider
#[derive(Debug, Clone)]
pub struct FlowSet {
    pub summarize: Flow<Summarize>,
    pub suggest_response: Flow<SuggestResponse>,
    pub briefing: Flow<Briefing>,
}

impl FlowSet {
    pub fn new(client: ModelClient) -> Self {
        Self {
            summarize: Flow::new(client.clone()),
            suggest_response: Flow::new(client.clone()),
            briefing: Flow::new(client),
        }
    }

    /// Build the configured provider and wrap it in a client
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let provider = create_provider(config)?;
        let client = ModelClient::new(provider)
            .with_temperature(config.temperature)
            .with_strict_choices(config.strict_choices);
        Ok(Self::new(client))
    }

    /// `summarizeThreatData`
    pub async fn summarize_threat_data(
        &self,
        input: &SummarizeInput,
    ) -> Result<SummarizeOutput, FlowError> {
        self.summarize.invoke(input).await
    }

    /// `suggestResponse`
    pub async fn suggest_response(
        &self,
        input: &SuggestResponseInput,
    ) -> Result<SuggestResponseOutput, FlowError> {
        self.suggest_response.invoke(input).await
    }

    /// `generateThreatBriefing`
    pub async fn generate_threat_briefing(
        &self,
        input: &BriefingInput,
    ) -> Result<BriefingOutput, FlowError> {
        self.briefing.invoke(input).await
    }
}
