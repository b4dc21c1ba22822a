//! Staged message builders.
//!
//! The chain runs `expects_to_receive -> (given | with_metadata)* ->
//! with_content -> (record | verify)`. Content is a separate stage, so an
//! interaction without content cannot be expressed through the typed chain;
//! [`InteractionDraft`] is the dynamic escape hatch for callers assembling
//! expectations from data, and it enforces the same rule at commit time.

use crate::error::{ConsumerError, ConsumerResult};
use crate::pact::MessagePactBuilder;
use msgpact_contract::{ExpectedMessage, Interaction};
use msgpact_matching::Template;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// First stage: a described message accumulating state and metadata.
#[derive(Debug)]
pub struct MessageBuilder<'a> {
    pact: &'a mut MessagePactBuilder,
    description: String,
    provider_state: Option<String>,
    metadata: BTreeMap<String, Template>,
}

impl<'a> MessageBuilder<'a> {
    pub(crate) fn new(pact: &'a mut MessagePactBuilder, description: String) -> Self {
        Self {
            pact,
            description,
            provider_state: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Set the provider state precondition.
    #[must_use]
    pub fn given(mut self, state: impl Into<String>) -> Self {
        self.provider_state = Some(state.into());
        self
    }

    /// Add a metadata expectation. Literal values mean equality; pass a
    /// rule for anything looser.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, template: impl Into<Template>) -> Self {
        self.metadata.insert(key.into(), template.into());
        self
    }

    /// Supply the content template and move to the sealed stage.
    #[must_use]
    pub fn with_content(self, template: impl Into<Template>) -> SealedMessage<'a> {
        let mut expected = ExpectedMessage::new(template);
        expected.metadata = self.metadata;
        let mut interaction = Interaction::new(self.description, expected);
        interaction.provider_state = self.provider_state;
        SealedMessage {
            pact: self.pact,
            interaction,
        }
    }
}

/// Final stage: a complete interaction ready to record.
#[derive(Debug)]
pub struct SealedMessage<'a> {
    pact: &'a mut MessagePactBuilder,
    interaction: Interaction,
}

impl SealedMessage<'_> {
    /// Record the interaction into the contract.
    ///
    /// # Errors
    /// Returns [`ConsumerError::Contract`] when the description duplicates
    /// an already recorded interaction.
    pub fn record(self) -> ConsumerResult<()> {
        debug!(description = %self.interaction.description, "message interaction recorded");
        self.pact.commit(self.interaction)
    }

    /// Run the example message through consumer code, then record.
    ///
    /// The example projection of the content template is deserialized into
    /// `T` and handed to the handler. Nothing is recorded when the handler
    /// rejects the message, so broken consumer code cannot publish a
    /// contract it does not honor.
    ///
    /// # Errors
    /// Returns [`ConsumerError::HandlerRejected`] when the example does not
    /// deserialize or the handler fails, [`ConsumerError::Contract`] on a
    /// duplicate description.
    pub fn verify<T, F, E>(self, handler: F) -> ConsumerResult<()>
    where
        T: DeserializeOwned,
        F: FnOnce(T) -> Result<(), E>,
        E: fmt::Display,
    {
        let example = self.interaction.expected.contents.example();
        let message: T = serde_json::from_value(example).map_err(|err| {
            ConsumerError::handler_rejected(format!("example does not deserialize: {err}"))
        })?;
        handler(message).map_err(|err| ConsumerError::handler_rejected(err.to_string()))?;
        self.record()
    }
}

/// Dynamically assembled interaction for callers that build expectations
/// from data instead of the typed chain.
#[derive(Debug, Clone, Default)]
pub struct InteractionDraft {
    /// Interaction description
    pub description: String,
    /// Provider state precondition
    pub provider_state: Option<String>,
    /// Metadata expectations
    pub metadata: BTreeMap<String, Template>,
    /// Content template; committing without one fails
    pub contents: Option<Template>,
}

impl InteractionDraft {
    /// Create an empty draft.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }
}

pub(crate) fn draft_into_interaction(draft: InteractionDraft) -> ConsumerResult<Interaction> {
    let Some(contents) = draft.contents else {
        return Err(ConsumerError::incomplete(draft.description));
    };
    let mut expected = ExpectedMessage::new(contents);
    expected.metadata = draft.metadata;
    let mut interaction = Interaction::new(draft.description, expected);
    interaction.provider_state = draft.provider_state;
    Ok(interaction)
}
