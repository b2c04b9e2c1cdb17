//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log filter:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `--verbose` (debug)
//! 3. `TASK_SCHED_LOG` environment variable (level or filter directives)
//! 4. default to `warn`, so the interactive output stays clean
//!
//! Logs go to stderr; stdout belongs to the shell.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

const LOG_ENV: &str = "TASK_SCHED_LOG";

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>, verbose: bool) -> Result<()> {
    let filter = select_filter(cli_level, verbose, std::env::var(LOG_ENV).ok().as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

fn select_filter(cli_level: Option<LogLevel>, verbose: bool, env_value: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_str());
    }
    if verbose {
        return EnvFilter::new(LogLevel::Debug.as_str());
    }
    env_value
        .and_then(|value| EnvFilter::try_new(value.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new(LogLevel::Warn.as_str()))
}
