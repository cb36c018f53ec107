//! Scenario executor
//!
//! Types every non-empty record field into its input, fires the trigger once,
//! then waits (bounded) for the success or error marker.

use crate::common::config::Timeouts;
use crate::common::{Error, Result};
use crate::fixture::Record;
use crate::target::{wait_for_any, Target};
use crate::testing::SUCCESS_TOKEN;

use super::{ObservedState, Scenario};

/// Run one record through a prepared session and report where it ended
///
/// Empty fields are skipped, never typed as blank input, so a fixture can
/// leave a field out of the submission. Follow-through only runs for records
/// that expect success. Returns `Error::ScenarioTimeout` when neither
/// terminal marker shows up within `timeouts.terminal()`.
pub async fn execute(
    scenario: &dyn Scenario,
    target: &mut dyn Target,
    record: &Record,
    timeouts: &Timeouts,
) -> Result<ObservedState> {
    let name = scenario.kind().as_str();

    if record.arity() != scenario.fields().len() {
        return Err(Error::Internal(format!(
            "{} has {} fields but the {} scenario declares {}",
            record,
            record.arity(),
            name,
            scenario.fields().len()
        )));
    }

    for input in scenario.inputs() {
        match record.get(input.field) {
            Some(value) if !value.is_empty() => {
                tracing::trace!(field = input.field, locator = %input.locator, "typing field");
                target.send_keys(&input.locator, value).await?;
            }
            Some(_) => {
                tracing::debug!(row = record.row(), field = input.field, "field left untouched");
            }
            None => {
                return Err(Error::Internal(format!(
                    "{} scenario input '{}' is not a declared field",
                    name, input.field
                )))
            }
        }
    }

    target.click(scenario.trigger()).await?;

    let reached = wait_for_any(
        target,
        &[scenario.success_marker(), scenario.error_marker()],
        timeouts.terminal(),
        timeouts.poll_interval(),
        name,
    )
    .await?;

    if reached == 0 {
        if !record.expected_outcome().eq_ignore_ascii_case(SUCCESS_TOKEN) {
            // Already a failure; finishing the flow would only add side effects
            tracing::debug!(row = record.row(), "success reached but not expected; skipping follow-through");
            return Ok(ObservedState::Success {
                detail: String::new(),
            });
        }

        // The terminal state was reached; later waits are not terminal timeouts
        let detail = scenario
            .follow_through(target, timeouts)
            .await
            .map_err(|e| match e {
                Error::ScenarioTimeout { .. } => {
                    Error::Scenario(format!("follow-through failed: {}", e))
                }
                other => other,
            })?;
        Ok(ObservedState::Success { detail })
    } else {
        let text = target.text(scenario.error_text()).await?;
        Ok(ObservedState::Error {
            text: text.trim().to_string(),
        })
    }
}
