//! Named Flows
//!
//! A flow binds an input schema, a prompt template and an output schema around
//! the shared model client. The concrete flows only supply a [`FlowSpec`]; the
//! composition below is the same for all of them.

use std::marker::PhantomData;

use tracing::{debug, warn};

use super::client::ModelClient;
use super::error::FlowError;
use super::prompts::PromptTemplate;
use super::schema::{Record, ValidationMode};

/// Schema/template binding of one flow
pub trait FlowSpec: Send + Sync + 'static {
    type Input: Record + Send + Sync;
    type Output: Record + Send;
    type Template: PromptTemplate + Default;

    /// Flow name, used in logs
    const NAME: &'static str;
}

/// A callable flow over an injected model client
pub struct Flow<S: FlowSpec> {
    client: ModelClient,
    template: S::Template,
    _spec: PhantomData<fn() -> S>,
}

impl<S: FlowSpec> Flow<S> {
    pub fn new(client: ModelClient) -> Self {
        Self {
            client,
            template: S::Template::default(),
            _spec: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        S::NAME
    }

    pub fn client(&self) -> &ModelClient {
        &self.client
    }

    pub fn template(&self) -> &S::Template {
        &self.template
    }

    /// Validate the input and render the exact prompt text the model receives.
    pub fn render(&self, input: &S::Input) -> Result<String, FlowError> {
        let fields = input
            .to_fields(ValidationMode::input())
            .map_err(FlowError::InvalidInput)?;
        Ok(self.template.build_prompt(&fields)?)
    }

    /// Run the flow: validate, render, one model round trip, validate output.
    pub async fn invoke(&self, input: &S::Input) -> Result<S::Output, FlowError> {
        let prompt = self.render(input)?;

        debug!("Invoking {} ({} prompt bytes)", S::NAME, prompt.len());

        let result = self
            .client
            .generate::<S::Output>(&self.template, prompt)
            .await;

        if let Err(e) = &result {
            warn!("{} failed: {}", S::NAME, e);
        }

        result
    }
}

impl<S: FlowSpec> Clone for Flow<S>
where
    S::Template: Clone,
{
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            template: self.template.clone(),
            _spec: PhantomData,
        }
    }
}

impl<S: FlowSpec> std::fmt::Debug for Flow<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flow")
            .field("name", &S::NAME)
            .field("provider", &self.client.provider().name())
            .finish()
    }
}
