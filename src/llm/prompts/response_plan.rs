//! Response Plan Prompt
//!
//! Prompts for suggesting a remediation strategy for a detected threat.

use super::PromptTemplate;

/// Remediation strategy prompt template
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponsePlanPrompt;

impl ResponsePlanPrompt {
    /// Create a new response plan prompt
    pub fn new() -> Self {
        Self
    }
}

impl PromptTemplate for ResponsePlanPrompt {
    fn name(&self) -> &'static str {
        "suggestResponsePrompt"
    }

    fn system_prompt(&self) -> &'static str {
        RESPONSE_SYSTEM_PROMPT
    }

    fn template(&self) -> &'static str {
        RESPONSE_TEMPLATE
    }
}

const RESPONSE_TEMPLATE: &str = "You are an expert cybersecurity analyst. Given the details of a cybersecurity threat, you will suggest a comprehensive remediation strategy.

Threat Description: {{{threatDescription}}}
Affected Systems: {{{affectedSystems}}}
Data Sensitivity: {{{dataSensitivity}}}
Regulatory Compliance: {{{regulatoryCompliance}}}

Based on the information provided, suggest a strategy to remediate the threat, estimate the impact of the strategy, list the required resources, and create a communication plan.";

const RESPONSE_SYSTEM_PROMPT: &str = r#"You are an incident responder advising a security operations team during an active incident.

Order remediation steps by urgency: contain first, then eradicate, then recover. Estimate business impact honestly, including downtime. Name the people, tools and access each step needs. The communication plan must cover internal stakeholders and any notification duties the listed regulations impose.

Respond only with valid JSON."#;
