//! The verification engine.
//!
//! A run walks the contract's interactions in order: resolve the trigger,
//! invoke it to completion under the configured timeout, evaluate the
//! produced messages against the recorded rules, and aggregate one result
//! per interaction. Trigger failures and unregistered scenarios fail their
//! own interaction; the run itself keeps going so the report covers the
//! whole contract.

use crate::error::{VerifierError, VerifierResult};
use crate::report::{InteractionOutcome, VerificationReport, VerificationResult};
use crate::scenario::{ProducedMessage, ScenarioRegistry, Trigger};
use msgpact_contract::{Contract, ExpectedMessage, Interaction};
use msgpact_matching::{
    match_metadata, match_metadata_at, match_template, ContentPath, Mismatch,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

/// Where a contract artifact comes from.
#[derive(Debug, Clone)]
pub enum ArtifactSource {
    /// Read from a pact file on disk
    File(PathBuf),
    /// Parse from an in-memory document
    Inline(String),
}

impl ArtifactSource {
    /// Load and parse the contract.
    ///
    /// # Errors
    /// Returns [`VerifierError::ArtifactRead`] when the file cannot be read
    /// and [`VerifierError::ArtifactParse`] when the document is invalid.
    pub fn load(&self) -> VerifierResult<Contract> {
        let text = match self {
            Self::File(path) => {
                std::fs::read_to_string(path).map_err(|source| VerifierError::ArtifactRead {
                    path: path.clone(),
                    source,
                })?
            }
            Self::Inline(text) => text.clone(),
        };
        Ok(Contract::from_artifact_str(&text)?)
    }
}

impl From<PathBuf> for ArtifactSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for ArtifactSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Upper bound on one trigger invocation; `None` waits indefinitely
    pub trigger_timeout: Option<Duration>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            trigger_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl VerifierConfig {
    /// Create a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the trigger timeout.
    #[must_use]
    pub const fn with_trigger_timeout(mut self, timeout: Duration) -> Self {
        self.trigger_timeout = Some(timeout);
        self
    }

    /// Remove the trigger timeout.
    #[must_use]
    pub const fn without_trigger_timeout(mut self) -> Self {
        self.trigger_timeout = None;
        self
    }
}

/// Provider-side verifier for message contracts.
#[derive(Debug)]
pub struct MessageVerifier {
    registry: ScenarioRegistry,
    config: VerifierConfig,
    cancel: Option<watch::Receiver<bool>>,
}

impl MessageVerifier {
    /// Create a verifier over a populated registry.
    #[must_use]
    pub fn new(registry: ScenarioRegistry) -> Self {
        Self {
            registry,
            config: VerifierConfig::default(),
            cancel: None,
        }
    }

    /// Replace the engine configuration.
    #[must_use]
    pub fn with_config(mut self, config: VerifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Install a cooperative cancellation signal.
    ///
    /// The signal is checked between interactions only: an in-flight
    /// trigger is bounded by the timeout, never interrupted mid-run, so a
    /// cancelled report always holds completed interactions.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The scenario registry backing this verifier.
    #[must_use]
    pub fn registry(&self) -> &ScenarioRegistry {
        &self.registry
    }

    /// Run verification against an artifact source.
    ///
    /// A cancelled run is not an error: the report carries the completed
    /// results with `cancelled` set.
    ///
    /// # Errors
    /// Returns [`VerifierError::ArtifactRead`] or
    /// [`VerifierError::ArtifactParse`] when the artifact cannot be loaded;
    /// verification outcomes are reported, not raised.
    #[instrument(skip(self, source))]
    pub async fn verify(&self, source: &ArtifactSource) -> VerifierResult<VerificationReport> {
        let contract = source.load()?;
        info!(
            consumer = %contract.consumer.name,
            provider = %contract.provider.name,
            interactions = contract.interactions.len(),
            "verification started"
        );

        let mut report =
            VerificationReport::new(&contract.consumer.name, &contract.provider.name);
        for interaction in &contract.interactions {
            if self.is_cancelled() {
                warn!(completed = report.results.len(), "verification cancelled");
                report.cancelled = true;
                break;
            }
            let outcome = self.verify_interaction(interaction).await;
            match &outcome {
                InteractionOutcome::Pass => {
                    info!(description = %interaction.description, "interaction passed");
                }
                InteractionOutcome::Fail { mismatches } => {
                    warn!(
                        description = %interaction.description,
                        mismatches = mismatches.len(),
                        "interaction failed"
                    );
                }
            }
            report.results.push(VerificationResult {
                description: interaction.description.clone(),
                outcome,
            });
        }

        info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            cancelled = report.cancelled,
            "verification finished"
        );
        Ok(report)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    async fn verify_interaction(&self, interaction: &Interaction) -> InteractionOutcome {
        let trigger = match self.registry.find(&interaction.description) {
            Ok(trigger) => trigger,
            Err(err) => {
                return InteractionOutcome::fail_with(root_mismatch(
                    "registered scenario",
                    err.to_string(),
                ));
            }
        };

        let produced = match self.invoke(trigger).await {
            Ok(messages) => messages,
            Err(reason) => {
                return InteractionOutcome::fail_with(root_mismatch("successful trigger", reason));
            }
        };

        let mismatches = evaluate_produced(&interaction.expected, &produced);
        if mismatches.is_empty() {
            InteractionOutcome::Pass
        } else {
            InteractionOutcome::Fail { mismatches }
        }
    }

    async fn invoke(&self, trigger: &Trigger) -> Result<Vec<ProducedMessage>, String> {
        let result = match self.config.trigger_timeout {
            Some(limit) => match tokio::time::timeout(limit, trigger.run()).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(format!("trigger execution failed: timed out after {limit:?}"));
                }
            },
            None => trigger.run().await,
        };
        result.map_err(|err| format!("trigger execution failed: {err:#}"))
    }
}

fn root_mismatch(expected: &str, reason: impl Into<String>) -> Mismatch {
    Mismatch::new("$", expected, Value::Null, reason)
}

/// Match a trigger's output against the expected message.
///
/// A single message is matched directly, except that a lone non-array
/// payload under an array shaped expectation is treated as a batch of one.
/// Batches are aggregated into a single array value, with every message's
/// metadata checked under its batch position; against a non-array
/// expectation a batch is itself a mismatch.
fn evaluate_produced(expected: &ExpectedMessage, produced: &[ProducedMessage]) -> Vec<Mismatch> {
    match produced {
        [] if expected.contents.expects_array() => {
            match_template(&expected.contents, &Value::Array(Vec::new()))
        }
        [] => vec![root_mismatch(
            "a produced message",
            "trigger produced no messages",
        )],
        // One array-payload message is already the whole batch.
        [message] if !expected.contents.expects_array() || message.contents.is_array() => {
            let mut mismatches = match_template(&expected.contents, &message.contents);
            mismatches.extend(match_metadata(&expected.metadata, &message.metadata));
            mismatches
        }
        batch if expected.contents.expects_array() => {
            let aggregated =
                Value::Array(batch.iter().map(|message| message.contents.clone()).collect());
            let mut mismatches = match_template(&expected.contents, &aggregated);
            for (index, message) in batch.iter().enumerate() {
                mismatches.extend(match_metadata_at(
                    &expected.metadata,
                    &message.metadata,
                    &ContentPath::root().index(index),
                ));
            }
            mismatches
        }
        batch => vec![root_mismatch(
            "a single produced message",
            format!(
                "trigger produced {} messages but contract expects a single message",
                batch.len()
            ),
        )],
    }
}
