//! Threat Briefing Prompt
//!
//! Prompts for turning aggregated security data into an analyst briefing.

use super::PromptTemplate;

/// Threat briefing prompt template
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreatBriefingPrompt;

impl ThreatBriefingPrompt {
    /// Create a new threat briefing prompt
    pub fn new() -> Self {
        Self
    }
}

impl PromptTemplate for ThreatBriefingPrompt {
    fn name(&self) -> &'static str {
        "generateThreatBriefingPrompt"
    }

    fn system_prompt(&self) -> &'static str {
        BRIEFING_SYSTEM_PROMPT
    }

    fn template(&self) -> &'static str {
        BRIEFING_TEMPLATE
    }

    fn max_tokens(&self) -> usize {
        4096
    }
}

const BRIEFING_TEMPLATE: &str = "You are a cybersecurity expert tasked with creating threat briefings for security analysts.

Based on the provided cybersecurity data, generate a comprehensive threat briefing that includes:
- A summary of the current threat landscape
- Identification of potential risks and vulnerabilities
- Recommended mitigation strategies

Cybersecurity Data: {{{threatData}}}";

const BRIEFING_SYSTEM_PROMPT: &str = r#"You are a senior threat intelligence analyst writing the daily briefing for a SOC.

The input aggregates transactional records, device logs, user activity analytics and threat intelligence feeds. Write for analysts who will act on it: lead with what changed, call out the riskiest exposures, and close with mitigations. Say so when the data does not support a conclusion.

Respond only with valid JSON."#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_briefing_prompt() {
        let fields = json!({"threatData": "Spike in phishing reports"});
        let built = ThreatBriefingPrompt::new()
            .build_prompt(fields.as_object().unwrap())
            .unwrap();
        assert!(built.ends_with("Cybersecurity Data: Spike in phishing reports"));
        assert!(built.contains("Recommended mitigation strategies"));
    }

    #[test]
    fn test_briefing_token_budget() {
        assert_eq!(ThreatBriefingPrompt.max_tokens(), 4096);
    }
}
