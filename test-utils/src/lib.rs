//! Shared test utilities for the message contract crates.
//!
//! This crate provides:
//! - Proptest generators for contract domain types
//! - Mock feeds and senders for provider-side tests
//! - Test fixtures with sample stock ticker data
//! - Tracing setup for test binaries

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod generators;
pub mod mocks;
pub mod fixtures;
pub mod logging;

pub use generators::*;
