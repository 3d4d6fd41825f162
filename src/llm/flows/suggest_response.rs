//! Remediation strategy flow

use serde::{Deserialize, Serialize};

use crate::llm::flow::FlowSpec;
use crate::llm::prompts::ResponsePlanPrompt;
use crate::llm::schema::{FieldSpec, Record, Schema};

static INPUT_SCHEMA: Schema = Schema {
    name: "SuggestResponseInput",
    fields: &[
        FieldSpec::required(
            "threatDescription",
            "A detailed description of the cybersecurity threat detected.",
        ),
        FieldSpec::required(
            "affectedSystems",
            "List of systems affected by the threat, including IP addresses or hostnames.",
        ),
        FieldSpec::required(
            "dataSensitivity",
            "The sensitivity level of the data potentially compromised (e.g., high, medium, low).",
        ),
        FieldSpec::required(
            "regulatoryCompliance",
            "Any regulatory compliance requirements applicable (e.g., GDPR, HIPAA).",
        ),
    ],
};

static OUTPUT_SCHEMA: Schema = Schema {
    name: "SuggestResponseOutput",
    fields: &[
        FieldSpec::required(
            "suggestedStrategy",
            "A detailed strategy to remediate the identified threat.",
        ),
        FieldSpec::required(
            "estimatedImpact",
            "The estimated impact of the suggested strategy on business operations.",
        ),
        FieldSpec::required(
            "resourceRequirements",
            "The resources (e.g., personnel, software) required to implement the suggested strategy.",
        ),
        FieldSpec::required(
            "communicationPlan",
            "A plan for communicating the incident and remediation steps to stakeholders.",
        ),
    ],
};

/// Details of a detected anomaly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResponseInput {
    pub threat_description: String,
    pub affected_systems: String,
    pub data_sensitivity: String,
    pub regulatory_compliance: String,
}

impl Record for SuggestResponseInput {
    fn schema() -> &'static Schema {
        &INPUT_SCHEMA
    }
}

/// Suggested remediation plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResponseOutput {
    pub suggested_strategy: String,
    pub estimated_impact: String,
    pub resource_requirements: String,
    pub communication_plan: String,
}

impl Record for SuggestResponseOutput {
    fn schema() -> &'static Schema {
        &OUTPUT_SCHEMA
    }
}

/// `suggestResponse`
pub struct SuggestResponse;

impl FlowSpec for SuggestResponse {
    type Input = SuggestResponseInput;
    type Output = SuggestResponseOutput;
    type Template = ResponsePlanPrompt;

    const NAME: &'static str = "suggestResponseFlow";
}
