//! CLI command handling
//!
//! Applies command-line overrides to the loaded configuration, dispatches
//! commands and formats output.

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{logging, paths, Error, Result};
use crate::fixture;
use crate::target::WebDriverFactory;
use crate::testing::report::{self, RunReport};
use crate::testing::{run_with_progress, RunOptions, RunSummary};

/// Dispatch a CLI command
///
/// Returns `Ok(false)` when a run completed but at least one record failed.
pub async fn dispatch(command: Commands, mut config: Config, verbose: bool) -> Result<bool> {
    match command {
        Commands::Run {
            fixture: path,
            scenario,
            table,
            base_url,
            webdriver,
            headless,
            timeout,
            workers,
            json,
        } => {
            if let Some(url) = base_url {
                config.site.base_url = url;
            }
            if let Some(url) = webdriver {
                config.webdriver.url = url;
            }
            if headless {
                config.webdriver.headless = true;
            }
            if let Some(secs) = timeout {
                if secs == 0 {
                    return Err(Error::Config("--timeout must be at least 1 second".to_string()));
                }
                config.timeouts.terminal_secs = secs;
                config.timeouts.record_secs = config.timeouts.record_secs.max(secs);
            }
            if let Some(n) = workers {
                if n == 0 {
                    return Err(Error::Config("--workers must be at least 1".to_string()));
                }
                config.runner.workers = n;
            }

            let table = table.unwrap_or_else(|| config.runner.table.clone());

            // Fixture problems end the run before any browser is started
            let loaded = fixture::load(&path, &table, scenario.fields())?;

            let flow = scenario.build(&config);
            let sessions = WebDriverFactory::new(&config.webdriver);
            let options = RunOptions {
                workers: config.runner.workers,
                timeouts: config.timeouts.clone(),
            };

            if !json {
                report::print_header(scenario, &loaded);
            }

            let runs = run_with_progress(&loaded, flow.as_ref(), &sessions, &options, |run| {
                if !json {
                    report::print_record(run, verbose);
                }
            })
            .await;

            let summary = RunSummary::from_runs(&runs);
            if json {
                let report = RunReport::new(scenario, &loaded, &runs);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report::print_summary(&summary);
            }

            Ok(summary.all_passed())
        }

        Commands::Inspect {
            fixture: path,
            scenario,
            table,
            json,
        } => {
            let table = table.unwrap_or_else(|| config.runner.table.clone());
            let loaded = fixture::load(&path, &table, scenario.fields())?;

            if json {
                println!("{}", serde_json::to_string_pretty(loaded.records())?);
            } else {
                report::print_fixture(scenario, &loaded);
            }
            Ok(true)
        }

        Commands::Config { init } => {
            let path = paths::config_path();

            if init {
                let Some(path) = path.as_ref() else {
                    return Err(Error::Config(
                        "no configuration directory available on this platform".to_string(),
                    ));
                };
                if path.exists() {
                    println!("Config file already exists: {}", path.display());
                } else {
                    paths::ensure_config_dir()?;
                    std::fs::write(path, Config::default().to_toml()?)?;
                    println!("Wrote default config: {}", path.display());
                }
            }

            match &path {
                Some(p) if p.exists() => println!("# Config file: {}", p.display()),
                Some(p) => println!("# Config file: {} (not present, using defaults)", p.display()),
                None => println!("# Config file: unavailable"),
            }
            if let Some(log) = logging::default_log_path() {
                println!("# Default log file: {}", log.display());
            }
            println!("{}", config.to_toml()?);
            Ok(true)
        }
    }
}
