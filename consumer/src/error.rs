//! Consumer error types using thiserror 2.0.

use msgpact_contract::ContractError;
use thiserror::Error;

/// Consumer-side recording errors.
#[derive(Error, Debug)]
pub enum ConsumerError {
    /// Interaction was committed without content
    #[error("Incomplete interaction '{0}': content is required before recording")]
    IncompleteInteraction(String),

    /// Consumer handler rejected the example message
    #[error("Handler rejected example message: {0}")]
    HandlerRejected(String),

    /// Contract model rejected the interaction
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Artifact file write failed
    #[error("Failed to write pact file: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsumerError {
    /// Create an incomplete-interaction error.
    #[must_use]
    pub fn incomplete(description: impl Into<String>) -> Self {
        Self::IncompleteInteraction(description.into())
    }

    /// Create a handler-rejected error.
    #[must_use]
    pub fn handler_rejected(msg: impl Into<String>) -> Self {
        Self::HandlerRejected(msg.into())
    }
}

/// Result type for consumer operations.
pub type ConsumerResult<T> = Result<T, ConsumerError>;
