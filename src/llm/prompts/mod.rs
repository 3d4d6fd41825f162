//! LLM Prompt Templates
//!
//! Fixed natural-language templates with `{{{field}}}` placeholders, one per
//! input field, and the pure renderer that fills them.

pub mod response_plan;
pub mod threat_briefing;
pub mod threat_summary;

pub use response_plan::ResponsePlanPrompt;
pub use threat_briefing::ThreatBriefingPrompt;
pub use threat_summary::ThreatSummaryPrompt;

use serde_json::{Map, Value};
use thiserror::Error;

const OPEN: &str = "{{{";
const CLOSE: &str = "}}}";

/// Template rendering errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Placeholder names a field the record does not carry
    #[error("Template field '{0}' is missing from the input record")]
    MissingField(String),
    /// `{{{` without a matching `}}}`
    #[error("Unterminated placeholder at byte {0}")]
    Unterminated(usize),
}

/// Base prompt template
pub trait PromptTemplate: Send + Sync {
    /// Prompt name, used in logs
    fn name(&self) -> &'static str;

    /// Get the system prompt
    fn system_prompt(&self) -> &'static str;

    /// Template text with `{{{field}}}` placeholders
    fn template(&self) -> &'static str;

    /// Get maximum tokens for response
    fn max_tokens(&self) -> usize {
        2048
    }

    /// Build the user prompt from a validated input record
    fn build_prompt(&self, fields: &Map<String, Value>) -> Result<String, RenderError> {
        render(self.template(), fields)
    }
}

/// Substitute every `{{{name}}}` in `template` with the named field, verbatim.
pub fn render(template: &str, fields: &Map<String, Value>) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);

        let after_open = &rest[start + OPEN.len()..];
        let end = after_open
            .find(CLOSE)
            .ok_or(RenderError::Unterminated(offset + start))?;
        let name = after_open[..end].trim();

        match fields.get(name) {
            Some(Value::String(s)) => out.push_str(s),
            Some(Value::Null) | None => return Err(RenderError::MissingField(name.to_string())),
            Some(other) => out.push_str(&other.to_string()),
        }

        let consumed = start + OPEN.len() + end + CLOSE.len();
        offset += consumed;
        rest = &rest[consumed..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Field names referenced by a template, in order of appearance
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };
        names.push(after_open[..end].trim());
        rest = &after_open[end + CLOSE.len()..];
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_render_substitutes_verbatim() {
        let out = render(
            "Data: {{{threatData}}} / again {{{ threatData }}}",
            &fields(json!({"threatData": "<script>{{x}}</script>"})),
        )
        .unwrap();
        assert_eq!(out, "Data: <script>{{x}}</script> / again <script>{{x}}</script>");
    }

    #[test]
    fn test_render_is_deterministic() {
        let input = fields(json!({"a": "one", "b": "two"}));
        let template = "A={{{a}}}\nB={{{b}}}";
        assert_eq!(render(template, &input).unwrap(), render(template, &input).unwrap());
    }

    #[test]
    fn test_render_missing_field() {
        let err = render("Hello {{{name}}}", &Map::new()).unwrap_err();
        assert_eq!(err, RenderError::MissingField("name".to_string()));
    }

    #[test]
    fn test_render_unterminated() {
        let err = render("ok {{{broken", &fields(json!({"broken": "x"}))).unwrap_err();
        assert_eq!(err, RenderError::Unterminated(3));
    }

    #[test]
    fn test_render_without_placeholders() {
        assert_eq!(render("plain text", &Map::new()).unwrap(), "plain text");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders("{{{a}}} and {{{b}}} then {{{a}}}"), vec!["a", "b", "a"]);
    }
}
