//! Logging and tracing configuration
//!
//! Console logs go to stderr so that `--json` output on stdout stays
//! machine-readable. A run can additionally log to a file.

use std::path::{Path, PathBuf};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use super::paths;

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("ddt=debug,warn")
        } else {
            EnvFilter::new("ddt=info,warn")
        }
    })
}

/// Initialize tracing for the CLI (stderr logging)
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate (DEBUG with `verbose`), WARN for dependencies.
pub fn init_cli(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Initialize tracing with a file layer in addition to stderr
///
/// Returns the log file path on success. Falls back to stderr-only logging
/// if the file cannot be opened.
pub fn init_with_file(log_file: &Path, verbose: bool) -> Option<PathBuf> {
    if let Some(dir) = log_file.parent() {
        if !dir.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(dir);
        }
    }

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
    {
        Ok(file) => {
            // File logging with full details
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE);

            let stderr_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .compact();

            tracing_subscriber::registry()
                .with(default_filter(verbose))
                .with(file_layer)
                .with(stderr_layer)
                .init();

            Some(log_file.to_path_buf())
        }
        Err(e) => {
            eprintln!("Warning: Could not open log file: {}", e);
            init_cli(verbose);
            None
        }
    }
}

/// Get the path of the default run log file
pub fn default_log_path() -> Option<PathBuf> {
    paths::log_dir().map(|d| d.join("run.log"))
}
