//! Error types for the scenario runner
//!
//! A failing verdict is never an error: it is a `RunResult` with
//! `Verdict::Fail`. The variants here are the faults that stop a record
//! (or, for fixture errors, the whole run) from producing a verdict at all.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the runner
#[derive(Error, Debug)]
pub enum Error {
    // === Fixture Errors ===
    #[error("Table '{table}' not found in '{resource}'. Available: {available}")]
    FixtureNotFound {
        resource: String,
        table: String,
        available: String,
    },

    #[error("Failed to read fixture '{resource}': {reason}")]
    FixtureRead { resource: String, reason: String },

    // === Scenario Errors ===
    #[error("Timed out after {waited_ms} ms waiting for a terminal state in {scenario} scenario")]
    ScenarioTimeout { scenario: String, waited_ms: u64 },

    #[error("Expected outcome is empty; use 'Success' or the expected error text")]
    InvalidExpectedOutcome,

    #[error("Scenario step failed: {0}")]
    Scenario(String),

    #[error("Unknown scenario '{0}'. Supported scenarios: 'login', 'checkout'")]
    UnknownScenario(String),

    // === Browser Driver Errors ===
    #[error("Browser driver error: {0}")]
    Driver(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Failed to open browser session at {url}: {reason}")]
    SessionStart { url: String, reason: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a fixture-not-found error listing the tables that do exist
    pub fn fixture_not_found<S: AsRef<str>>(resource: &str, table: &str, available: &[S]) -> Self {
        Self::FixtureNotFound {
            resource: resource.to_string(),
            table: table.to_string(),
            available: available
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create a fixture read error
    pub fn fixture_read(resource: &str, reason: impl std::fmt::Display) -> Self {
        Self::FixtureRead {
            resource: resource.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a scenario timeout error
    pub fn scenario_timeout(scenario: &str, waited: std::time::Duration) -> Self {
        Self::ScenarioTimeout {
            scenario: scenario.to_string(),
            waited_ms: waited.as_millis() as u64,
        }
    }
}

impl From<thirtyfour::prelude::WebDriverError> for Error {
    fn from(e: thirtyfour::prelude::WebDriverError) -> Self {
        Error::Driver(e.to_string())
    }
}
