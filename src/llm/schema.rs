//! Record Schemas
//!
//! Declarative field lists for flow inputs and outputs. A schema validates a
//! candidate JSON value into a typed record or reports every offending field,
//! and describes itself to model providers as a JSON-Schema object.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Primitive type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
}

impl FieldType {
    /// JSON-Schema type name
    pub fn json_type(&self) -> &'static str {
        match self {
            FieldType::String => "string",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
        }
    }
}

/// One named field of a record
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire name (camelCase)
    pub name: &'static str,
    pub kind: FieldType,
    pub required: bool,
    /// Steers the model's formatting of this field
    pub description: &'static str,
    /// Described set of accepted values; empty means free text
    pub choices: &'static [&'static str],
}

impl FieldSpec {
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldType::String,
            required: true,
            description,
            choices: &[],
        }
    }

    pub const fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldType::String,
            required: false,
            description,
            choices: &[],
        }
    }

    pub const fn with_choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }
}

/// Validation switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationMode {
    /// Reject required strings that are empty or whitespace
    pub reject_blank: bool,
    /// Reject values outside a field's described choices
    pub strict_choices: bool,
}

impl ValidationMode {
    /// Mode used for caller-supplied inputs
    pub fn input() -> Self {
        Self {
            reject_blank: true,
            strict_choices: false,
        }
    }

    /// Mode used for model outputs
    pub fn output(strict_choices: bool) -> Self {
        Self {
            reject_blank: false,
            strict_choices,
        }
    }
}

/// What is wrong with a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    Null,
    WrongType {
        expected: FieldType,
        found: &'static str,
    },
    Blank,
    NotAChoice {
        value: String,
    },
}

impl std::fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldProblem::Missing => write!(f, "missing"),
            FieldProblem::Null => write!(f, "null"),
            FieldProblem::WrongType { expected, found } => {
                write!(f, "expected {}, found {}", expected.json_type(), found)
            }
            FieldProblem::Blank => write!(f, "blank"),
            FieldProblem::NotAChoice { value } => write!(f, "'{}' is not an accepted value", value),
        }
    }
}

/// A field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub problem: FieldProblem,
}

/// Schema validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{schema}: expected a JSON object, found {found}")]
    NotAnObject {
        schema: &'static str,
        found: &'static str,
    },
    #[error("{schema}: invalid fields: {}", describe_violations(.violations))]
    Fields {
        schema: &'static str,
        violations: Vec<FieldViolation>,
    },
    #[error("{schema}: malformed content: {reason}")]
    Malformed {
        schema: &'static str,
        reason: String,
    },
}

impl ValidationError {
    /// Names of the offending fields (empty when the value was not an object)
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            ValidationError::Fields { violations, .. } => {
                violations.iter().map(|v| v.field).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn describe_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} ({})", v.field, v.problem))
        .collect::<Vec<_>>()
        .join(", ")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Declared shape of one record
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Validate a candidate and return only the declared fields that are set.
    pub fn validate(
        &self,
        candidate: &Value,
        mode: ValidationMode,
    ) -> Result<Map<String, Value>, ValidationError> {
        let object = candidate.as_object().ok_or(ValidationError::NotAnObject {
            schema: self.name,
            found: json_kind(candidate),
        })?;

        let mut violations = Vec::new();
        let mut accepted = Map::new();

        for spec in self.fields {
            let problem = match object.get(spec.name) {
                None if spec.required => Some(FieldProblem::Missing),
                Some(Value::Null) if spec.required => Some(FieldProblem::Null),
                None | Some(Value::Null) => None,
                Some(value) if !spec.kind.matches(value) => Some(FieldProblem::WrongType {
                    expected: spec.kind,
                    found: json_kind(value),
                }),
                Some(value) => {
                    let text = value.as_str().unwrap_or_default();
                    if mode.reject_blank && spec.required && text.trim().is_empty() {
                        Some(FieldProblem::Blank)
                    } else if mode.strict_choices
                        && !spec.choices.is_empty()
                        && !spec
                            .choices
                            .iter()
                            .any(|c| c.eq_ignore_ascii_case(text.trim()))
                    {
                        Some(FieldProblem::NotAChoice {
                            value: text.to_string(),
                        })
                    } else {
                        accepted.insert(spec.name.to_string(), value.clone());
                        None
                    }
                }
            };

            if let Some(problem) = problem {
                violations.push(FieldViolation {
                    field: spec.name,
                    problem,
                });
            }
        }

        if violations.is_empty() {
            Ok(accepted)
        } else {
            Err(ValidationError::Fields {
                schema: self.name,
                violations,
            })
        }
    }

    /// Validate a candidate and deserialize it into its typed record.
    pub fn validate_into<T: DeserializeOwned>(
        &self,
        candidate: &Value,
        mode: ValidationMode,
    ) -> Result<T, ValidationError> {
        let accepted = self.validate(candidate, mode)?;
        serde_json::from_value(Value::Object(accepted)).map_err(|e| ValidationError::Malformed {
            schema: self.name,
            reason: e.to_string(),
        })
    }

    /// JSON-Schema descriptor sent to providers that support structured output
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        for spec in self.fields {
            properties.insert(
                spec.name.to_string(),
                json!({
                    "type": spec.kind.json_type(),
                    "description": self.field_description(spec),
                }),
            );
        }

        let required: Vec<&str> = self.required_fields().map(|f| f.name).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Plain-text field list for providers without structured output
    pub fn describe(&self) -> String {
        self.fields
            .iter()
            .map(|spec| {
                format!(
                    "- {} ({}, {}): {}",
                    spec.name,
                    spec.kind.json_type(),
                    if spec.required { "required" } else { "optional" },
                    self.field_description(spec)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn field_description(&self, spec: &FieldSpec) -> String {
        if spec.choices.is_empty() {
            spec.description.to_string()
        } else {
            format!("{} One of: {}.", spec.description, spec.choices.join(", "))
        }
    }
}

/// A record with a declared schema
pub trait Record: Serialize + DeserializeOwned {
    fn schema() -> &'static Schema;

    /// Validate this record against its own schema
    fn to_fields(&self, mode: ValidationMode) -> Result<Map<String, Value>, ValidationError> {
        let value = serde_json::to_value(self).map_err(|e| ValidationError::Malformed {
            schema: Self::schema().name,
            reason: e.to_string(),
        })?;
        Self::schema().validate(&value, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SAMPLE: Schema = Schema {
        name: "Sample",
        fields: &[
            FieldSpec::required("summary", "A concise summary."),
            FieldSpec::required("level", "The level.").with_choices(&["low", "high"]),
            FieldSpec::optional("notes", "Extra notes."),
        ],
    };

    #[test]
    fn test_validate_accepts_complete_record() {
        let value = json!({"summary": "ok", "level": "high", "notes": "n"});
        let fields = SAMPLE.validate(&value, ValidationMode::default()).unwrap();
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_validate_optional_may_be_absent_or_null() {
        let value = json!({"summary": "ok", "level": "low"});
        assert!(SAMPLE.validate(&value, ValidationMode::default()).is_ok());

        let value = json!({"summary": "ok", "level": "low", "notes": null});
        let fields = SAMPLE.validate(&value, ValidationMode::default()).unwrap();
        assert!(!fields.contains_key("notes"));
    }

    #[test]
    fn test_validate_lists_every_offending_field() {
        let value = json!({"level": 3, "notes": false});
        let err = SAMPLE.validate(&value, ValidationMode::default()).unwrap_err();
        assert_eq!(err.fields(), vec!["summary", "level", "notes"]);
        let msg = err.to_string();
        assert!(msg.contains("summary (missing)"));
        assert!(msg.contains("expected string, found number"));
    }

    #[test]
    fn test_validate_null_required_field() {
        let value = json!({"summary": null, "level": "low"});
        match SAMPLE.validate(&value, ValidationMode::default()) {
            Err(ValidationError::Fields { violations, .. }) => {
                assert_eq!(violations[0].problem, FieldProblem::Null);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_validate_not_an_object() {
        let err = SAMPLE
            .validate(&json!(["summary"]), ValidationMode::default())
            .unwrap_err();
        assert!(matches!(err, ValidationError::NotAnObject { found: "array", .. }));
    }

    #[test]
    fn test_blank_rejected_only_when_asked() {
        let value = json!({"summary": "  ", "level": "low"});
        assert!(SAMPLE.validate(&value, ValidationMode::default()).is_ok());
        let err = SAMPLE.validate(&value, ValidationMode::input()).unwrap_err();
        assert_eq!(err.fields(), vec!["summary"]);
    }

    #[test]
    fn test_choices_enforced_only_when_strict() {
        let value = json!({"summary": "ok", "level": "Severe"});
        assert!(SAMPLE.validate(&value, ValidationMode::output(false)).is_ok());
        assert!(SAMPLE.validate(&value, ValidationMode::output(true)).is_err());

        let value = json!({"summary": "ok", "level": "HIGH"});
        assert!(SAMPLE.validate(&value, ValidationMode::output(true)).is_ok());
    }

    #[test]
    fn test_json_schema_descriptor() {
        let schema = SAMPLE.json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["summary"]["type"], "string");
        assert_eq!(schema["required"], json!(["summary", "level"]));
        let level = schema["properties"]["level"]["description"].as_str().unwrap();
        assert!(level.contains("One of: low, high."));
    }

    #[test]
    fn test_describe_marks_optional() {
        let text = SAMPLE.describe();
        assert!(text.contains("- notes (string, optional): Extra notes."));
        assert!(text.contains("- summary (string, required)"));
    }
}
