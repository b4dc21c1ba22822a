//! Verification results and the run report.

use crate::error::{VerifierError, VerifierResult};
use msgpact_matching::Mismatch;
use serde::{Deserialize, Serialize};

/// Outcome of one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum InteractionOutcome {
    /// Every rule was satisfied
    Pass,
    /// One or more rules failed
    Fail {
        /// Every mismatch found in the interaction
        mismatches: Vec<Mismatch>,
    },
}

impl InteractionOutcome {
    /// Failure carrying a single mismatch.
    #[must_use]
    pub fn fail_with(mismatch: Mismatch) -> Self {
        Self::Fail {
            mismatches: vec![mismatch],
        }
    }

    /// Whether the interaction passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Result for one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Interaction description
    pub description: String,
    /// Pass, or fail with every mismatch found
    #[serde(flatten)]
    pub outcome: InteractionOutcome,
}

/// Report for one verification run.
///
/// Reports carry no timestamps or run identifiers: verifying the same
/// artifact against the same triggers produces an identical report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Consumer name from the artifact
    pub consumer: String,
    /// Provider name from the artifact
    pub provider: String,
    /// Per-interaction results, in contract order
    pub results: Vec<VerificationResult>,
    /// True when the run stopped at a cancellation checkpoint
    pub cancelled: bool,
}

impl VerificationReport {
    /// Empty report for a participant pair.
    #[must_use]
    pub fn new(consumer: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            consumer: consumer.into(),
            provider: provider.into(),
            results: Vec::new(),
            cancelled: false,
        }
    }

    /// True when every interaction passed and the run was not cancelled.
    #[must_use]
    pub fn success(&self) -> bool {
        !self.cancelled && self.results.iter().all(|result| result.outcome.passed())
    }

    /// Number of passed interactions.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.outcome.passed())
            .count()
    }

    /// Number of failed interactions.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    /// Human-readable rendering listing every interaction and mismatch.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!(
            "Verifying pact between {} and {}\n",
            self.consumer, self.provider
        );
        for result in &self.results {
            match &result.outcome {
                InteractionOutcome::Pass => {
                    out.push_str(&format!("  PASS {}\n", result.description));
                }
                InteractionOutcome::Fail { mismatches } => {
                    out.push_str(&format!("  FAIL {}\n", result.description));
                    for mismatch in mismatches {
                        out.push_str(&format!("       {mismatch}\n"));
                    }
                }
            }
        }
        if self.cancelled {
            out.push_str("  cancelled before completion\n");
        }
        out.push_str(&format!(
            "{} interactions, {} passed, {} failed\n",
            self.results.len(),
            self.passed_count(),
            self.failed_count()
        ));
        out
    }

    /// Assert the run passed, for raise-on-failure harness use.
    ///
    /// # Errors
    /// Returns [`VerifierError::Cancelled`] for a cancelled run and
    /// [`VerifierError::VerificationFailed`] when any interaction failed.
    pub fn ensure_passed(self) -> VerifierResult<Self> {
        if self.cancelled {
            return Err(VerifierError::Cancelled {
                completed: self.results.len(),
            });
        }
        let failed = self.failed_count();
        if failed > 0 {
            return Err(VerifierError::VerificationFailed {
                failed,
                total: self.results.len(),
            });
        }
        Ok(self)
    }
}
