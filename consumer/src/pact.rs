//! The pact handle: owns the contract during an authoring session.

use crate::builder::{draft_into_interaction, InteractionDraft, MessageBuilder};
use crate::config::PactConfig;
use crate::error::ConsumerResult;
use msgpact_contract::{Contract, Interaction};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Builder for a message pact between one consumer and one provider.
///
/// Interactions are recorded through [`MessagePactBuilder::expects_to_receive`]
/// and the contract is persisted once at the end of the session with
/// [`MessagePactBuilder::write_pact`].
#[derive(Debug)]
pub struct MessagePactBuilder {
    contract: Contract,
    config: PactConfig,
}

impl MessagePactBuilder {
    /// Start a pact between two participants.
    #[must_use]
    pub fn new(consumer: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            contract: Contract::new(consumer, provider),
            config: PactConfig::default(),
        }
    }

    /// Replace the output configuration.
    #[must_use]
    pub fn with_config(mut self, config: PactConfig) -> Self {
        self.config = config;
        self
    }

    /// Start describing the next expected message.
    pub fn expects_to_receive(&mut self, description: impl Into<String>) -> MessageBuilder<'_> {
        MessageBuilder::new(self, description.into())
    }

    /// Commit a dynamically assembled draft.
    ///
    /// # Errors
    /// Returns [`crate::ConsumerError::IncompleteInteraction`] when the
    /// draft has no content, [`crate::ConsumerError::Contract`] on a
    /// duplicate description.
    pub fn commit_draft(&mut self, draft: InteractionDraft) -> ConsumerResult<()> {
        let interaction = draft_into_interaction(draft)?;
        self.commit(interaction)
    }

    pub(crate) fn commit(&mut self, interaction: Interaction) -> ConsumerResult<()> {
        self.contract.add_interaction(interaction)?;
        Ok(())
    }

    /// The contract recorded so far.
    #[must_use]
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Render the artifact document without touching the filesystem.
    ///
    /// # Errors
    /// Returns [`crate::ConsumerError::Contract`] when rendering fails.
    pub fn render_pact(&self) -> ConsumerResult<String> {
        Ok(self.contract.to_artifact_string()?)
    }

    /// Write the artifact to `<pact_dir>/<consumer>-<provider>.json`,
    /// creating the directory and replacing any previous artifact for the
    /// pair. Returns the written path.
    ///
    /// # Errors
    /// Returns [`crate::ConsumerError::Io`] on filesystem failures,
    /// [`crate::ConsumerError::Contract`] when rendering fails.
    pub fn write_pact(&self) -> ConsumerResult<PathBuf> {
        let rendered = self.render_pact()?;
        fs::create_dir_all(&self.config.pact_dir)?;
        let path = self.config.pact_dir.join(self.contract.default_file_name());
        fs::write(&path, rendered)?;
        info!(
            path = %path.display(),
            interactions = self.contract.interactions.len(),
            "pact file written"
        );
        Ok(path)
    }
}
