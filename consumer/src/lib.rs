//! Consumer-side interaction recording.
//!
//! A consumer test declares the messages it can handle through
//! [`MessagePactBuilder`]: describe the message, attach matching rules,
//! optionally run the example through real consumer code, then record it.
//! At the end of the session [`MessagePactBuilder::write_pact`] persists the
//! contract artifact for providers to verify against.
//!
//! The builder is staged: content must be supplied before an interaction
//! can be recorded, and the borrow rules keep one interaction in flight at
//! a time.

pub mod builder;
pub mod config;
pub mod error;
pub mod pact;

pub use builder::{InteractionDraft, MessageBuilder, SealedMessage};
pub use config::PactConfig;
pub use error::{ConsumerError, ConsumerResult};
pub use pact::MessagePactBuilder;
