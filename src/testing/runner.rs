//! Run driver
//!
//! Feeds every fixture record through prepare, execute and classify, each in
//! its own freshly opened session. The session is closed on every exit path
//! before the record's result is recorded. A bad record never stops the run,
//! and no record runs longer than its time budget.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use futures_util::FutureExt;
use serde::Serialize;
use tokio::time::Instant;
use tracing::Instrument;

use crate::common::config::Timeouts;
use crate::common::{Error, Result};
use crate::fixture::{Fixture, Record};
use crate::scenario::{execute, Scenario};
use crate::target::SessionFactory;

use super::classifier::{classify, RunResult};

/// Run driver settings
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Records in flight at once. 1 runs strictly in fixture order.
    pub workers: usize,
    pub timeouts: Timeouts,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            timeouts: Timeouts::default(),
        }
    }
}

/// A record's result together with the record it came from
#[derive(Debug, Clone, Serialize)]
pub struct RecordRun {
    pub record: Record,
    pub result: RunResult,
    pub duration_ms: u64,
}

/// Totals over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub faulted: usize,
}

impl RunSummary {
    pub fn from_runs(runs: &[RecordRun]) -> Self {
        let mut summary = Self {
            total: runs.len(),
            ..Self::default()
        };
        for run in runs {
            if run.result.passed() {
                summary.passed += 1;
            } else {
                summary.failed += 1;
                match run.result.observed() {
                    "timeout" => summary.timed_out += 1,
                    "fault" => summary.faulted += 1,
                    _ => {}
                }
            }
        }
        summary
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Run every record of `fixture` through `scenario`
///
/// With `workers == 1` results come back in fixture order. With more workers
/// they come back in completion order; each still carries its record.
pub async fn run<F: SessionFactory>(
    fixture: &Fixture,
    scenario: &dyn Scenario,
    sessions: &F,
    options: &RunOptions,
) -> Vec<RecordRun> {
    run_with_progress(fixture, scenario, sessions, options, |_| {}).await
}

/// Like [`run`], calling `progress` as each record finishes
pub async fn run_with_progress<F, P>(
    fixture: &Fixture,
    scenario: &dyn Scenario,
    sessions: &F,
    options: &RunOptions,
    mut progress: P,
) -> Vec<RecordRun>
where
    F: SessionFactory,
    P: FnMut(&RecordRun),
{
    tracing::info!(
        scenario = %scenario.kind(),
        resource = fixture.resource(),
        table = fixture.table(),
        records = fixture.len(),
        workers = options.workers,
        "starting run"
    );

    let mut runs = Vec::with_capacity(fixture.len());

    if options.workers <= 1 {
        for record in fixture.records() {
            let run = run_record(record, scenario, sessions, &options.timeouts).await;
            progress(&run);
            runs.push(run);
        }
    } else {
        let mut pending = stream::iter(fixture.records())
            .map(|record| run_record(record, scenario, sessions, &options.timeouts))
            .buffer_unordered(options.workers);
        while let Some(run) = pending.next().await {
            progress(&run);
            runs.push(run);
        }
    }

    let summary = RunSummary::from_runs(&runs);
    tracing::info!(
        passed = summary.passed,
        failed = summary.failed,
        timed_out = summary.timed_out,
        faulted = summary.faulted,
        "run finished"
    );
    runs
}

async fn run_record<F: SessionFactory>(
    record: &Record,
    scenario: &dyn Scenario,
    sessions: &F,
    timeouts: &Timeouts,
) -> RecordRun {
    let started = Instant::now();
    let span = tracing::info_span!("record", row = record.row());

    let result = async {
        let mut session = match tokio::time::timeout(timeouts.record(), sessions.open()).await {
            Ok(Ok(session)) => session,
            Ok(Err(e)) => return record_fault(record, &e.to_string()),
            Err(_) => return record_fault(record, "no session available within the record budget"),
        };

        let outcome = tokio::time::timeout(
            timeouts.record(),
            AssertUnwindSafe(attempt(scenario, &mut session, record, timeouts)).catch_unwind(),
        )
        .await;

        if let Err(e) = sessions.close(session).await {
            tracing::warn!(error = %e, "failed to close session");
        }

        match outcome {
            Ok(Ok(Ok(result))) => result,
            Ok(Ok(Err(Error::ScenarioTimeout { waited_ms, .. }))) => {
                tracing::warn!(waited_ms, "no terminal state reached");
                RunResult::timed_out()
            }
            Ok(Ok(Err(e))) => record_fault(record, &e.to_string()),
            Ok(Err(panic)) => {
                record_fault(record, &format!("panicked: {}", panic_message(panic.as_ref())))
            }
            Err(_) => {
                tracing::warn!(
                    budget_secs = timeouts.record_secs,
                    "record exceeded its time budget"
                );
                RunResult::timed_out()
            }
        }
    }
    .instrument(span)
    .await;

    let run = RecordRun {
        record: record.clone(),
        result,
        duration_ms: elapsed_ms(started.elapsed()),
    };
    tracing::debug!(
        row = record.row(),
        verdict = ?run.result.verdict(),
        duration_ms = run.duration_ms,
        "record finished"
    );
    run
}

async fn attempt<T: crate::target::Target>(
    scenario: &dyn Scenario,
    session: &mut T,
    record: &Record,
    timeouts: &Timeouts,
) -> Result<RunResult> {
    scenario
        .prepare(session, timeouts)
        .await
        .map_err(|e| Error::Scenario(format!("preparation failed: {}", e)))?;
    let observed = execute(scenario, session, record, timeouts).await?;
    tracing::debug!(row = record.row(), %observed, "terminal state observed");
    classify(record.expected_outcome(), &observed)
}

fn record_fault(record: &Record, reason: &str) -> RunResult {
    tracing::error!(
        row = record.row(),
        fields = ?record.values(),
        error = reason,
        "record faulted"
    );
    RunResult::fault(reason)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn elapsed_ms(duration: Duration) -> u64 {
    duration.as_millis().min(u64::MAX as u128) as u64
}
