//! Flow invocation errors

use thiserror::Error;

use super::prompts::RenderError;
use super::provider::LlmError;
use super::schema::ValidationError;

/// Coarse failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A record did not satisfy its schema
    Validation,
    /// The remote call could not complete
    Transport,
    /// The remote call completed with no usable content
    EmptyResult,
}

/// The single rejection type of a flow call. Nothing is retried.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Invalid input: {0}")]
    InvalidInput(ValidationError),
    #[error("Prompt rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("Model provider failed: {0}")]
    Provider(#[from] LlmError),
    #[error("Model returned no content")]
    EmptyResult,
    #[error("Model output rejected: {0}")]
    InvalidOutput(ValidationError),
}

impl FlowError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FlowError::InvalidInput(_) | FlowError::Render(_) | FlowError::InvalidOutput(_) => {
                FailureKind::Validation
            }
            FlowError::Provider(_) => FailureKind::Transport,
            FlowError::EmptyResult => FailureKind::EmptyResult,
        }
    }

    /// Whether the caller's input was at fault rather than the model
    pub fn is_input_error(&self) -> bool {
        matches!(self, FlowError::InvalidInput(_) | FlowError::Render(_))
    }
}
