//! Mismatch records: evaluation failures reported as data.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single point of disagreement between expected and actual content.
///
/// Mismatches are plain data, never errors. One evaluation pass collects
/// every mismatch in the message, so a report can show all problems at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Location of the disagreement, `$.a.b[0]` style
    pub path: String,
    /// Rule that was not satisfied, rendered for humans
    pub expected: String,
    /// Value found at the location, `null` when absent
    pub actual: Value,
    /// Why the rule rejected the value
    pub reason: String,
}

impl Mismatch {
    /// Record a mismatch.
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: Value,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [rule: {}, actual: {}]",
            self.path, self.reason, self.expected, self.actual
        )
    }
}
