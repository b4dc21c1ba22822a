//! Message contract model and artifact format.
//!
//! A [`Contract`] records what one consumer expects from one provider's
//! messages. Contracts serialize to a Pact-v3-style message artifact whose
//! `contents` read as plain example JSON while `matchingRules` carry the
//! rule annotations.
//!
//! Re-serializing an unchanged contract is byte-identical: every map in the
//! model is ordered, so artifacts diff cleanly in version control.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
pub mod error;
pub mod model;

pub use error::{ContractError, ContractResult};
pub use model::{
    ArtifactMetadata, Contract, ExpectedMessage, Interaction, PactSpecification, Participant,
};
