//! Model Client
//!
//! One request/response round trip to a provider, with the reply coerced into
//! a record that satisfies the declared output schema. No retries, no caching:
//! every call goes to the provider.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::error::FlowError;
use super::prompts::PromptTemplate;
use super::provider::{CompletionRequest, LlmProvider};
use super::schema::{Record, Schema, ValidationError, ValidationMode};

/// Shared model client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ModelClient {
    provider: Arc<dyn LlmProvider>,
    temperature: Option<f32>,
    strict_choices: bool,
}

impl ModelClient {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            temperature: None,
            strict_choices: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Reject output values outside a field's described choices
    pub fn with_strict_choices(mut self, strict: bool) -> Self {
        self.strict_choices = strict;
        self
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Send a rendered prompt and return the validated output record.
    pub async fn generate<T: Record>(
        &self,
        template: &dyn PromptTemplate,
        prompt: String,
    ) -> Result<T, FlowError> {
        let schema = T::schema();

        let mut request = CompletionRequest::new(prompt)
            .with_system(system_with_format(template.system_prompt(), schema))
            .with_max_tokens(template.max_tokens())
            .with_output_schema(schema.name, schema.json_schema());
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        debug!(
            "Dispatching {} to {} (model={})",
            template.name(),
            self.provider.name(),
            self.provider.model()
        );

        let response = self.provider.complete(request).await?;

        debug!(
            "{} answered in {}ms (finish_reason={:?})",
            self.provider.name(),
            response.duration_ms,
            response.finish_reason
        );

        coerce(&response.text, schema, ValidationMode::output(self.strict_choices))
    }
}

/// Append the output contract to a template's system prompt.
fn system_with_format(system: &str, schema: &Schema) -> String {
    format!(
        "{}\n\nReturn a single JSON object with these fields:\n{}",
        system,
        schema.describe()
    )
}

/// Turn raw model text into a validated record.
pub fn coerce<T: Record>(text: &str, schema: &Schema, mode: ValidationMode) -> Result<T, FlowError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FlowError::EmptyResult);
    }

    let payload = extract_json(text).ok_or_else(|| {
        FlowError::InvalidOutput(ValidationError::Malformed {
            schema: schema.name,
            reason: "no JSON object in model response".to_string(),
        })
    })?;

    let value: Value = serde_json::from_str(payload).map_err(|e| {
        FlowError::InvalidOutput(ValidationError::Malformed {
            schema: schema.name,
            reason: e.to_string(),
        })
    })?;

    schema
        .validate_into(&value, mode)
        .map_err(FlowError::InvalidOutput)
}

/// Locate the JSON object in a reply: a ```json fence, else the first `{`
/// that starts a complete JSON value. Trailing prose is ignored.
pub fn extract_json(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```") {
        let fenced = &text[start + 3..];
        let body_start = fenced.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &fenced[body_start..];
        if let Some(end) = body.find("```") {
            let inner = body[..end].trim();
            if inner.starts_with('{') {
                return Some(inner);
            }
        }
    }

    text.match_indices('{').find_map(|(start, _)| {
        let candidate = &text[start..];
        let mut values = serde_json::Deserializer::from_str(candidate).into_iter::<Value>();
        match values.next() {
            Some(Ok(_)) => Some(&candidate[..values.byte_offset()]),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::schema::FieldSpec;
    use serde::{Deserialize, Serialize};

    static OUT: Schema = Schema {
        name: "Out",
        fields: &[FieldSpec::required("briefing", "The briefing.")],
    };

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Out {
        briefing: String,
    }

    impl Record for Out {
        fn schema() -> &'static Schema {
            &OUT
        }
    }

    #[test]
    fn test_extract_plain_object() {
        assert_eq!(extract_json("{\"a\":1}"), Some("{\"a\":1}"));
    }

    #[test]
    fn test_extract_fenced() {
        let text = "Here you go:\n```json\n{\"briefing\": \"x\"}\n```\nThanks";
        assert_eq!(extract_json(text), Some("{\"briefing\": \"x\"}"));
    }

    #[test]
    fn test_extract_prose_wrapped() {
        let text = "Sure! {\"briefing\": \"nested {braces}\"} Hope this helps.";
        assert_eq!(extract_json(text), Some("{\"briefing\": \"nested {braces}\"}"));
    }

    #[test]
    fn test_extract_ignores_trailing_braces() {
        let text = "{\"briefing\":\"ok\"} :-}";
        assert_eq!(extract_json(text), Some("{\"briefing\":\"ok\"}"));

        let out: Out = coerce(text, &OUT, ValidationMode::default()).unwrap();
        assert_eq!(out, Out { briefing: "ok".to_string() });
    }

    #[test]
    fn test_extract_skips_stray_brace() {
        let text = "Notes {draft} follow: {\"briefing\": \"ok\"} end }";
        assert_eq!(extract_json(text), Some("{\"briefing\": \"ok\"}"));
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn test_coerce_ok() {
        let out: Out = coerce("```\n{\"briefing\": \"ok\"}\n```", &OUT, ValidationMode::default()).unwrap();
        assert_eq!(out, Out { briefing: "ok".to_string() });
    }

    #[test]
    fn test_coerce_empty() {
        let err = coerce::<Out>("   \n", &OUT, ValidationMode::default()).unwrap_err();
        assert!(matches!(err, FlowError::EmptyResult));
    }

    #[test]
    fn test_coerce_prose_is_validation_failure() {
        let err = coerce::<Out>("I cannot help with that.", &OUT, ValidationMode::default()).unwrap_err();
        assert!(matches!(err, FlowError::InvalidOutput(ValidationError::Malformed { .. })));
    }

    #[test]
    fn test_coerce_missing_field() {
        let err = coerce::<Out>("{\"summary\": \"x\"}", &OUT, ValidationMode::default()).unwrap_err();
        match err {
            FlowError::InvalidOutput(e) => assert_eq!(e.fields(), vec!["briefing"]),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_system_with_format() {
        let system = system_with_format("Be brief.", &OUT);
        assert!(system.starts_with("Be brief.\n\n"));
        assert!(system.contains("- briefing (string, required): The briefing."));
    }
}
