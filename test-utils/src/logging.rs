//! Tracing setup for test binaries.
//!
//! This module wires the contract crates' structured logging into test
//! runs so verification output lands in the captured test output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration for test harnesses.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter applied when `RUST_LOG` is unset
    pub log_level: String,
    /// Whether to output JSON format
    pub json_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_output: false,
        }
    }
}

impl LoggingConfig {
    /// Create config with custom log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Initialize tracing for a test binary.
///
/// Safe to call from every test in a binary; only the first call installs
/// the global subscriber.
pub fn init_test_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json_output {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_test_writer())
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init()
    };
    // A second init keeps the first subscriber.
    drop(installed);
}
