//! ddt - data-driven browser scenario runner
//!
//! Loads login or checkout records from a spreadsheet or YAML fixture and
//! replays each one in a fresh browser session, reporting pass/fail per row.

use clap::Parser;
use std::path::PathBuf;

use ddt::commands::Commands;
use ddt::common::config::Config;
use ddt::common::logging;
use ddt::cli;

#[derive(Parser)]
#[command(name = "ddt", about = "Data-driven storefront scenario runner")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to a file; without a value uses the default log path
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1, default_missing_value = "-")]
    log_file: Option<PathBuf>,

    /// Verbose output and debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    match args.log_file.as_deref() {
        Some(path) if path.as_os_str() == "-" => match logging::default_log_path() {
            Some(default) => {
                logging::init_with_file(&default, args.verbose);
            }
            None => logging::init_cli(args.verbose),
        },
        Some(path) => {
            logging::init_with_file(path, args.verbose);
        }
        None => logging::init_cli(args.verbose),
    }

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let result = match config {
        Ok(config) => cli::dispatch(args.command, config, args.verbose).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}
