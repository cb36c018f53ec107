//! ddt - data-driven browser scenario runner
//!
//! Loads records from a tabular fixture, replays one parameterized flow per
//! record in an isolated browser session, and classifies where each run
//! ended against the record's expected outcome.

pub mod cli;
pub mod commands;
pub mod common;
pub mod fixture;
pub mod scenario;
pub mod target;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use fixture::{Fixture, Record};
pub use scenario::{ObservedState, Scenario, ScenarioKind};
pub use target::{Locator, Marker, SessionFactory, Target};
pub use testing::{classify, run, RecordRun, RunOptions, RunResult, RunSummary, Verdict};
