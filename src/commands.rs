//! CLI command definitions
//!
//! Defines the clap commands for the ddt CLI.

use clap::Subcommand;
use std::path::PathBuf;

use crate::scenario::ScenarioKind;

#[derive(Subcommand)]
pub enum Commands {
    /// Run every record of a fixture through a scenario in a browser
    Run {
        /// Fixture file (.xlsx, .xls, .ods or .yaml)
        fixture: PathBuf,

        /// Scenario to run: login or checkout
        #[arg(long, short)]
        scenario: ScenarioKind,

        /// Table (sheet) name inside the fixture (default: runner.table, "Sheet1")
        #[arg(long, short)]
        table: Option<String>,

        /// Storefront URL every session starts from
        #[arg(long)]
        base_url: Option<String>,

        /// WebDriver server URL (e.g. http://localhost:9515)
        #[arg(long)]
        webdriver: Option<String>,

        /// Run the browser without a window
        #[arg(long)]
        headless: bool,

        /// Seconds to wait for a terminal state after submitting
        #[arg(long)]
        timeout: Option<u64>,

        /// Records in flight at once, each in its own browser session
        #[arg(long, short)]
        workers: Option<usize>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a fixture and print its records without opening a browser
    Inspect {
        /// Fixture file (.xlsx, .xls, .ods or .yaml)
        fixture: PathBuf,

        /// Scenario whose field layout to read: login or checkout
        #[arg(long, short)]
        scenario: ScenarioKind,

        /// Table (sheet) name inside the fixture
        #[arg(long, short)]
        table: Option<String>,

        /// Output records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}
