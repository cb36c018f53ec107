//! Data-driven test execution
//!
//! Classifies each record's observed terminal state against its expected
//! outcome and drives whole fixtures through isolated sessions.

mod classifier;
pub mod report;
mod runner;

pub use classifier::{classify, RunResult, Verdict, SUCCESS_TOKEN, TIMEOUT_REASON};
pub use runner::{run, run_with_progress, RecordRun, RunOptions, RunSummary};
