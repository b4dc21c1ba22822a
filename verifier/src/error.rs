//! Verifier error types using thiserror 2.0.

use msgpact_contract::ContractError;
use std::path::PathBuf;
use thiserror::Error;

/// Verifier-side errors.
///
/// Trigger failures and unregistered scenarios are not listed here when
/// they occur inside a run: the engine contains them as failed interactions
/// so the remaining interactions still verify.
#[derive(Error, Debug)]
pub enum VerifierError {
    /// Scenario registered twice for the same description
    #[error("Duplicate scenario registration: {0}")]
    DuplicateScenario(String),

    /// No trigger registered for an interaction description
    #[error("No scenario registered for description: {0}")]
    UnregisteredScenario(String),

    /// Artifact file could not be read
    #[error("Failed to read artifact {path}: {source}")]
    ArtifactRead {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Artifact could not be parsed into a contract
    #[error("Artifact parse failed: {0}")]
    ArtifactParse(#[from] ContractError),

    /// Verification ran to completion and found mismatches
    #[error("Verification failed: {failed} of {total} interactions did not match")]
    VerificationFailed {
        /// Interactions with mismatches
        failed: usize,
        /// Interactions verified
        total: usize,
    },

    /// Verification stopped at a cancellation checkpoint
    #[error("Verification cancelled after {completed} completed interactions")]
    Cancelled {
        /// Interactions completed before the checkpoint
        completed: usize,
    },
}

impl VerifierError {
    /// Create a duplicate-scenario error.
    #[must_use]
    pub fn duplicate_scenario(description: impl Into<String>) -> Self {
        Self::DuplicateScenario(description.into())
    }

    /// Create an unregistered-scenario error.
    #[must_use]
    pub fn unregistered(description: impl Into<String>) -> Self {
        Self::UnregisteredScenario(description.into())
    }

    /// True when verification ran and found mismatches, as opposed to a
    /// harness or artifact problem.
    #[must_use]
    pub const fn is_verification_failure(&self) -> bool {
        matches!(self, Self::VerificationFailed { .. })
    }
}

/// Result type for verifier operations.
pub type VerifierResult<T> = Result<T, VerifierError>;
