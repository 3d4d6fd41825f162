//! Threat briefing flow

use serde::{Deserialize, Serialize};

use crate::llm::flow::FlowSpec;
use crate::llm::prompts::ThreatBriefingPrompt;
use crate::llm::schema::{FieldSpec, Record, Schema};

static INPUT_SCHEMA: Schema = Schema {
    name: "GenerateThreatBriefingInput",
    fields: &[FieldSpec::required(
        "threatData",
        "Aggregated cybersecurity data from various sources, including transactional records, device logs, user activity analytics, and threat intelligence feeds.",
    )],
};

static OUTPUT_SCHEMA: Schema = Schema {
    name: "GenerateThreatBriefingOutput",
    fields: &[FieldSpec::required(
        "briefing",
        "A comprehensive threat briefing summarizing the current threat landscape, potential risks, and recommended mitigation strategies.",
    )],
};

/// Aggregated data to brief on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefingInput {
    pub threat_data: String,
}

impl BriefingInput {
    pub fn new(threat_data: impl Into<String>) -> Self {
        Self {
            threat_data: threat_data.into(),
        }
    }
}

impl Record for BriefingInput {
    fn schema() -> &'static Schema {
        &INPUT_SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingOutput {
    pub briefing: String,
}

impl Record for BriefingOutput {
    fn schema() -> &'static Schema {
        &OUTPUT_SCHEMA
    }
}

/// `generateThreatBriefing`
pub struct Briefing;

impl FlowSpec for Briefing {
    type Input = BriefingInput;
    type Output = BriefingOutput;
    type Template = ThreatBriefingPrompt;

    const NAME: &'static str = "generateThreatBriefingFlow";
}
