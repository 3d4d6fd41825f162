//! Threat Summary Prompt
//!
//! Prompts for condensing raw threat data into a summary and risk level.

use super::PromptTemplate;

/// Threat data summarization prompt template
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreatSummaryPrompt;

impl ThreatSummaryPrompt {
    /// Create a new threat summary prompt
    pub fn new() -> Self {
        Self
    }
}

impl PromptTemplate for ThreatSummaryPrompt {
    fn name(&self) -> &'static str {
        "summarizeThreatDataPrompt"
    }

    fn system_prompt(&self) -> &'static str {
        SUMMARY_SYSTEM_PROMPT
    }

    fn template(&self) -> &'static str {
        SUMMARY_TEMPLATE
    }

    fn max_tokens(&self) -> usize {
        1024
    }
}

const SUMMARY_TEMPLATE: &str = "You are a cybersecurity expert. Summarize the following threat data and determine its risk level.

Threat Data:
{{{threatData}}}

Respond with a summary, a risk level (low, medium, high, or critical), and recommendations to mitigate the threat.";

const SUMMARY_SYSTEM_PROMPT: &str = r#"You are a security analyst working through data-lake exports: logs, anomaly reports and security alerts.

Keep the summary short and factual. Rate risk as low, medium, high or critical based on likely impact and the strength of the evidence. Recommendations should be concrete actions an operator can take now.

Respond only with valid JSON."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::prompts::placeholders;
    use serde_json::{json, Map, Value};

    #[test]
    fn test_summary_prompt() {
        let prompt = ThreatSummaryPrompt::new();
        let fields: Map<String, Value> = json!({"threatData": "5 failed logins from IP 10.0.0.5"})
            .as_object()
            .cloned()
            .unwrap();

        let built = prompt.build_prompt(&fields).unwrap();
        assert!(built.contains("Threat Data:\n5 failed logins from IP 10.0.0.5\n"));
        assert!(built.contains("risk level"));
    }

    #[test]
    fn test_summary_placeholders() {
        assert_eq!(placeholders(ThreatSummaryPrompt.template()), vec!["threatData"]);
    }
}
