//! Outcome classification
//!
//! Compares where a record's run ended against the record's expected outcome.
//! A failing verdict is a normal result, not an error.

use serde::Serialize;

use crate::common::{Error, Result};
use crate::scenario::ObservedState;

/// Expected-outcome token selecting the success branch (ASCII case-insensitive)
pub const SUCCESS_TOKEN: &str = "Success";

/// Reason recorded when no terminal marker appeared in time
pub const TIMEOUT_REASON: &str = "timed out waiting for terminal state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

/// Verdict for one record; immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    verdict: Verdict,
    observed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl RunResult {
    fn pass(observed: &ObservedState) -> Self {
        Self {
            verdict: Verdict::Pass,
            observed: observed.descriptor().to_string(),
            reason: None,
        }
    }

    fn fail(observed: &ObservedState, reason: String) -> Self {
        Self {
            verdict: Verdict::Fail,
            observed: observed.descriptor().to_string(),
            reason: Some(reason),
        }
    }

    /// Failing result for a record whose run hit `Error::ScenarioTimeout`
    pub fn timed_out() -> Self {
        Self {
            verdict: Verdict::Fail,
            observed: "timeout".to_string(),
            reason: Some(TIMEOUT_REASON.to_string()),
        }
    }

    /// Failing result for any other fault during a record's run
    pub fn fault(reason: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Fail,
            observed: "fault".to_string(),
            reason: Some(reason.into()),
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Terminal state descriptor: success, error, timeout or fault
    pub fn observed(&self) -> &str {
        &self.observed
    }

    /// Why the record failed; `None` when it passed
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Classify an observed terminal state against an expected outcome
///
/// `"Success"` (any case) passes only on the success marker. Any other text
/// must appear, case-sensitively, inside the observed error message.
/// An empty expected outcome is rejected with `Error::InvalidExpectedOutcome`.
pub fn classify(expected: &str, observed: &ObservedState) -> Result<RunResult> {
    if expected.trim().is_empty() {
        return Err(Error::InvalidExpectedOutcome);
    }

    if expected.eq_ignore_ascii_case(SUCCESS_TOKEN) {
        return Ok(match observed {
            ObservedState::Success { .. } => RunResult::pass(observed),
            ObservedState::Error { text } => RunResult::fail(
                observed,
                format!("expected success, observed error: '{}'", text),
            ),
        });
    }

    Ok(match observed {
        ObservedState::Error { text } if text.contains(expected) => RunResult::pass(observed),
        ObservedState::Error { text } => RunResult::fail(
            observed,
            format!(
                "error text mismatch: expected text containing '{}', got '{}'",
                expected, text
            ),
        ),
        ObservedState::Success { .. } => RunResult::fail(
            observed,
            format!(
                "proceeded past expected error point (expected error containing '{}')",
                expected
            ),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success() -> ObservedState {
        ObservedState::Success {
            detail: String::new(),
        }
    }

    fn error(text: &str) -> ObservedState {
        ObservedState::Error {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_success_expected_and_observed() {
        for token in ["Success", "success", "SUCCESS"] {
            let result = classify(token, &success()).unwrap();
            assert!(result.passed());
            assert_eq!(result.observed(), "success");
            assert_eq!(result.reason(), None);
        }
    }

    #[test]
    fn test_success_expected_error_observed() {
        let result = classify(
            "Success",
            &error("Epic sadface: Username and password do not match any user in this service"),
        )
        .unwrap();
        assert_eq!(result.verdict(), Verdict::Fail);
        assert!(result
            .reason()
            .unwrap()
            .starts_with("expected success, observed error"));
    }

    #[test]
    fn test_error_substring_match() {
        let result = classify(
            "Sorry, this user has been locked out.",
            &error("Epic sadface: Sorry, this user has been locked out."),
        )
        .unwrap();
        assert!(result.passed());
        assert_eq!(result.observed(), "error");
    }

    #[test]
    fn test_error_match_is_case_sensitive() {
        let result = classify(
            "first name is required",
            &error("Error: First Name is required"),
        )
        .unwrap();
        assert!(!result.passed());
        let reason = result.reason().unwrap();
        assert!(reason.starts_with("error text mismatch"));
        assert!(reason.contains("'first name is required'"));
        assert!(reason.contains("'Error: First Name is required'"));
    }

    #[test]
    fn test_error_expected_success_observed_is_distinct() {
        let result = classify("Error: Postal Code is required", &success()).unwrap();
        assert!(!result.passed());
        assert!(result
            .reason()
            .unwrap()
            .starts_with("proceeded past expected error point"));
    }

    #[test]
    fn test_empty_expected_outcome_rejected() {
        assert!(matches!(
            classify("", &success()),
            Err(Error::InvalidExpectedOutcome)
        ));
        assert!(matches!(
            classify("   ", &error("anything")),
            Err(Error::InvalidExpectedOutcome)
        ));
    }

    #[test]
    fn test_timeout_and_fault_results() {
        let timed_out = RunResult::timed_out();
        assert_eq!(timed_out.verdict(), Verdict::Fail);
        assert_eq!(timed_out.reason(), Some(TIMEOUT_REASON));

        let fault = RunResult::fault("Element not found: id=continue");
        assert_eq!(fault.observed(), "fault");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(classify("Success", &success()).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"verdict": "pass", "observed": "success"}));
    }
}
