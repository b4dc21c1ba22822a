//! Matching rule language for message contract testing.
//!
//! Expected message shapes are expressed as [`Template`] trees whose leaves
//! are [`MatchRule`]s. Evaluation compares a template against an actual
//! `serde_json::Value` and reports every disagreement as a [`Mismatch`]
//! record instead of failing fast.
//!
//! # Features
//! - Equality, type-only, regex, decimal, integer and min-array rules
//! - Open object matching (extra actual fields are ignored)
//! - Full-breadth mismatch collection across sibling paths
//! - JSON-path style locations for rule keys and mismatch reports

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod evaluate;
pub mod mismatch;
pub mod path;
pub mod rule;
pub mod template;

pub use evaluate::{match_metadata, match_metadata_at, match_template};
pub use mismatch::Mismatch;
pub use path::{ContentPath, PathToken};
pub use rule::{MatchRule, ValueClass};
pub use template::Template;
