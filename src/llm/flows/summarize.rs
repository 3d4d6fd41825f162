//! Threat data summarization flow

use serde::{Deserialize, Serialize};

use crate::llm::flow::FlowSpec;
use crate::llm::prompts::ThreatSummaryPrompt;
use crate::llm::schema::{FieldSpec, Record, Schema};
use crate::models::RiskLevel;

static INPUT_SCHEMA: Schema = Schema {
    name: "SummarizeThreatDataInput",
    fields: &[FieldSpec::required(
        "threatData",
        "A comprehensive set of threat data including logs, anomaly reports, and security alerts.",
    )],
};

static OUTPUT_SCHEMA: Schema = Schema {
    name: "SummarizeThreatDataOutput",
    fields: &[
        FieldSpec::required("summary", "A concise summary of the threat data."),
        FieldSpec::required(
            "riskLevel",
            "The risk level associated with the threat data.",
        )
        .with_choices(RiskLevel::CHOICES),
        FieldSpec::optional(
            "recommendations",
            "Recommended actions to mitigate the identified threat, if possible.",
        ),
    ],
};

/// Raw threat data to summarize
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeInput {
    pub threat_data: String,
}

impl SummarizeInput {
    pub fn new(threat_data: impl Into<String>) -> Self {
        Self {
            threat_data: threat_data.into(),
        }
    }
}

impl Record for SummarizeInput {
    fn schema() -> &'static Schema {
        &INPUT_SCHEMA
    }
}

/// Summary and risk assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeOutput {
    pub summary: String,
    /// Free text as returned by the model; see [`SummarizeOutput::risk`]
    pub risk_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
}

impl SummarizeOutput {
    /// Risk level normalized into the described scale, if recognizable
    pub fn risk(&self) -> Option<RiskLevel> {
        RiskLevel::parse(&self.risk_level)
    }
}

impl Record for SummarizeOutput {
    fn schema() -> &'static Schema {
        &OUTPUT_SCHEMA
    }
}

/// `summarizeThreatData`
pub struct Summarize;

impl FlowSpec for Summarize {
    type Input = SummarizeInput;
    type Output = SummarizeOutput;
    type Template = ThreatSummaryPrompt;

    const NAME: &'static str = "summarizeThreatDataFlow";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::schema::ValidationMode;
    use serde_json::json;

    #[test]
    fn test_wire_names() {
        let value = serde_json::to_value(SummarizeInput::new("x")).unwrap();
        assert_eq!(value, json!({"threatData": "x"}));

        let out = SummarizeOutput {
            summary: "s".to_string(),
            risk_level: "high".to_string(),
            recommendations: None,
        };
        assert_eq!(
            serde_json::to_value(out).unwrap(),
            json!({"summary": "s", "riskLevel": "high"})
        );
    }

    #[test]
    fn test_risk_normalization() {
        let out = SummarizeOutput {
            summary: "s".to_string(),
            risk_level: "High".to_string(),
            recommendations: None,
        };
        assert_eq!(out.risk(), Some(RiskLevel::High));
    }

    #[test]
    fn test_free_text_risk_unless_strict() {
        let value = json!({"summary": "s", "riskLevel": "elevated"});
        assert!(OUTPUT_SCHEMA.validate(&value, ValidationMode::output(false)).is_ok());
        let err = OUTPUT_SCHEMA
            .validate(&value, ValidationMode::output(true))
            .unwrap_err();
        assert_eq!(err.fields(), vec!["riskLevel"]);
    }
}
