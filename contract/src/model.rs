//! Contract model types.

use crate::error::{ContractError, ContractResult};
use msgpact_matching::Template;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A participant in a contract (consumer or provider).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    /// Participant name
    pub name: String,
}

impl Participant {
    /// Create a new participant.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The message a consumer expects: metadata expectations plus a content
/// template. Metadata matches openly, like object templates.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedMessage {
    /// Per-key metadata expectations
    pub metadata: BTreeMap<String, Template>,
    /// Content template
    pub contents: Template,
}

impl ExpectedMessage {
    /// Expected message with the given content template and no metadata.
    #[must_use]
    pub fn new(contents: impl Into<Template>) -> Self {
        Self {
            metadata: BTreeMap::new(),
            contents: contents.into(),
        }
    }

    /// Add a metadata expectation.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, template: impl Into<Template>) -> Self {
        self.metadata.insert(key.into(), template.into());
        self
    }
}

/// One asynchronous interaction: a described message the consumer expects,
/// optionally preconditioned on a provider state.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    /// Unique description; verification resolves triggers by this key
    pub description: String,
    /// Provider state precondition
    pub provider_state: Option<String>,
    /// The expected message
    pub expected: ExpectedMessage,
}

impl Interaction {
    /// Create an interaction.
    #[must_use]
    pub fn new(description: impl Into<String>, expected: ExpectedMessage) -> Self {
        Self {
            description: description.into(),
            provider_state: None,
            expected,
        }
    }

    /// Set the provider state precondition.
    #[must_use]
    pub fn with_provider_state(mut self, state: impl Into<String>) -> Self {
        self.provider_state = Some(state.into());
        self
    }
}

/// A message contract between one consumer and one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    /// Consumer participant
    pub consumer: Participant,
    /// Provider participant
    pub provider: Participant,
    /// Recorded interactions, in authoring order
    pub interactions: Vec<Interaction>,
    /// Artifact metadata
    pub metadata: ArtifactMetadata,
}

impl Contract {
    /// Create an empty contract between two participants.
    #[must_use]
    pub fn new(consumer: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            consumer: Participant::new(consumer),
            provider: Participant::new(provider),
            interactions: Vec::new(),
            metadata: ArtifactMetadata::default(),
        }
    }

    /// Append an interaction.
    ///
    /// # Errors
    /// Returns [`ContractError::DuplicateDescription`] when an interaction
    /// with the same description is already recorded.
    pub fn add_interaction(&mut self, interaction: Interaction) -> ContractResult<()> {
        if self.find_interaction(&interaction.description).is_some() {
            return Err(ContractError::duplicate(interaction.description));
        }
        self.interactions.push(interaction);
        Ok(())
    }

    /// Find an interaction by description.
    #[must_use]
    pub fn find_interaction(&self, description: &str) -> Option<&Interaction> {
        self.interactions
            .iter()
            .find(|interaction| interaction.description == description)
    }

    /// Conventional artifact file name, `<consumer>-<provider>.json`.
    #[must_use]
    pub fn default_file_name(&self) -> String {
        format!("{}-{}.json", self.consumer.name, self.provider.name)
    }
}

/// Artifact-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactMetadata {
    /// Pact specification version marker
    #[serde(rename = "pactSpecification")]
    pub pact_specification: PactSpecification,
}

/// Pact specification version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PactSpecification {
    /// Version string
    pub version: String,
}

impl Default for ArtifactMetadata {
    fn default() -> Self {
        Self {
            pact_specification: PactSpecification {
                version: "3.0.0".to_string(),
            },
        }
    }
}
