//! Pact writing configuration.

use std::path::PathBuf;

/// Configuration for artifact output.
#[derive(Debug, Clone)]
pub struct PactConfig {
    /// Directory artifact files are written into
    pub pact_dir: PathBuf,
}

impl Default for PactConfig {
    fn default() -> Self {
        Self {
            pact_dir: PathBuf::from("./pacts"),
        }
    }
}

impl PactConfig {
    /// Create a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pact output directory.
    #[must_use]
    pub fn with_pact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pact_dir = dir.into();
        self
    }
}
