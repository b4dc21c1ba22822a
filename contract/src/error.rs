//! Contract error types using thiserror 2.0.

use thiserror::Error;

/// Contract model and artifact errors.
#[derive(Error, Debug)]
pub enum ContractError {
    /// Interaction descriptions must be unique within a contract
    #[error("Duplicate interaction description: {0}")]
    DuplicateDescription(String),

    /// Artifact document did not follow the expected structure
    #[error("Malformed contract artifact: {0}")]
    Malformed(String),

    /// JSON syntax or shape error in an artifact
    #[error("Artifact JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContractError {
    /// Create a malformed-artifact error.
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create a duplicate-description error.
    #[must_use]
    pub fn duplicate(description: impl Into<String>) -> Self {
        Self::DuplicateDescription(description.into())
    }
}

/// Result type for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;
