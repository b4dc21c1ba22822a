//! Provider-side verification engine for message contracts.
//!
//! Providers register one trigger per interaction description in a
//! [`ScenarioRegistry`]; the [`MessageVerifier`] loads a contract artifact,
//! invokes each trigger, and checks the produced messages against the
//! recorded matching rules. Every interaction is evaluated even when an
//! earlier one fails, and the run ends in a [`VerificationReport`] listing
//! each outcome with full mismatch detail.
//!
//! # Features
//! - Fail-fast duplicate detection at scenario registration
//! - Triggers bounded by a configurable timeout
//! - Batch triggers matched against array-shaped expectations
//! - Cooperative cancellation between interactions
//! - Deterministic, serializable reports

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod report;
pub mod scenario;
pub mod sender;

pub use engine::{ArtifactSource, MessageVerifier, VerifierConfig};
pub use error::{VerifierError, VerifierResult};
pub use report::{InteractionOutcome, VerificationReport, VerificationResult};
pub use scenario::{IntoMessages, ProducedMessage, ScenarioRegistry, Trigger, TriggerFuture};
pub use sender::{CapturingSender, MessageSender};
