//! Parameterized interaction flows
//!
//! A scenario declares its record fields, which input each field is typed
//! into, the single action that submits them, and the two terminal markers
//! that end the flow. The executor drives any scenario the same way.

mod checkout;
mod executor;
mod login;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::common::config::{Config, Timeouts};
use crate::common::{Error, Result};
use crate::target::{Locator, Marker, Target};

pub use checkout::CheckoutScenario;
pub use executor::execute;
pub use login::LoginScenario;

/// Supported scenario kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Login,
    Checkout,
}

impl ScenarioKind {
    /// Declared record fields, expected outcome last
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            ScenarioKind::Login => login::FIELDS,
            ScenarioKind::Checkout => checkout::FIELDS,
        }
    }

    /// Build the scenario with locations and credentials from configuration
    pub fn build(self, config: &Config) -> Box<dyn Scenario> {
        match self {
            ScenarioKind::Login => Box::new(LoginScenario::new(&config.site.base_url)),
            ScenarioKind::Checkout => Box::new(CheckoutScenario::new(
                &config.site.base_url,
                &config.checkout,
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioKind::Login => "login",
            ScenarioKind::Checkout => "checkout",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "login" => Ok(ScenarioKind::Login),
            "checkout" => Ok(ScenarioKind::Checkout),
            other => Err(Error::UnknownScenario(other.to_string())),
        }
    }
}

/// The terminal state a scenario run ended in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ObservedState {
    /// The success marker appeared and any follow-through completed
    Success { detail: String },
    /// The error marker appeared carrying this text
    Error { text: String },
}

impl ObservedState {
    /// Short descriptor used in verdict reasons
    pub fn descriptor(&self) -> &'static str {
        match self {
            ObservedState::Success { .. } => "success",
            ObservedState::Error { .. } => "error",
        }
    }
}

impl fmt::Display for ObservedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservedState::Success { detail } if detail.is_empty() => write!(f, "success"),
            ObservedState::Success { detail } => write!(f, "success: '{}'", detail),
            ObservedState::Error { text } => write!(f, "error: '{}'", text),
        }
    }
}

/// A record field and the input it is typed into
#[derive(Debug, Clone)]
pub struct Input {
    pub field: &'static str,
    pub locator: Locator,
}

impl Input {
    pub fn new(field: &'static str, locator: Locator) -> Self {
        Self { field, locator }
    }
}

/// One parameterized flow
#[async_trait]
pub trait Scenario: Send + Sync {
    fn kind(&self) -> ScenarioKind;

    /// Record fields in order; the expected outcome is last
    fn fields(&self) -> &'static [&'static str] {
        self.kind().fields()
    }

    /// Inputs filled from the record, in typing order
    fn inputs(&self) -> &[Input];

    /// The single action that submits the inputs
    fn trigger(&self) -> &Locator;

    /// Holds once the flow has moved past the submitted form
    fn success_marker(&self) -> &Marker;

    /// Holds once the form has rejected the submission
    fn error_marker(&self) -> &Marker;

    /// Element carrying the error message text
    fn error_text(&self) -> &Locator;

    /// Bring a fresh session to the scenario's starting state
    async fn prepare(&self, target: &mut dyn Target, timeouts: &Timeouts) -> Result<()>;

    /// Steps run after the success marker, returning a detail for the report
    async fn follow_through(&self, _target: &mut dyn Target, _timeouts: &Timeouts) -> Result<String> {
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("login".parse::<ScenarioKind>().unwrap(), ScenarioKind::Login);
        assert_eq!(" Checkout ".parse::<ScenarioKind>().unwrap(), ScenarioKind::Checkout);
        assert!(matches!(
            "cart".parse::<ScenarioKind>(),
            Err(Error::UnknownScenario(_))
        ));
    }

    #[test]
    fn test_field_arity() {
        assert_eq!(ScenarioKind::Login.fields().len(), 3);
        assert_eq!(ScenarioKind::Checkout.fields().len(), 4);
        for kind in [ScenarioKind::Login, ScenarioKind::Checkout] {
            assert_eq!(kind.fields().last(), Some(&crate::fixture::EXPECTED_OUTCOME));
        }
    }

    #[test]
    fn test_observed_state_display() {
        let state = ObservedState::Error {
            text: "Epic sadface: Username is required".to_string(),
        };
        assert_eq!(state.descriptor(), "error");
        assert_eq!(state.to_string(), "error: 'Epic sadface: Username is required'");
        assert_eq!(
            ObservedState::Success { detail: String::new() }.to_string(),
            "success"
        );
    }
}
