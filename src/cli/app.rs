//! Main CLI application structure

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use super::output::OutputFormat;
use super::shell::{Shell, ShellSettings};
use crate::config::Config;
use crate::domain::{CyclePolicy, Workspace};
use crate::logging;

#[derive(Parser)]
#[command(name = "task-sched")]
#[command(author, version, about = "Interactive priority and dependency scheduler for tasks")]
pub struct Cli {
    /// Output format (defaults to the configured format, else text)
    #[arg(long, short = 'f')]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Log level (overrides --verbose and TASK_SCHED_LOG)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Path to a config file
    #[arg(long, env = "TASK_SCHED_CONFIG")]
    pub config: Option<PathBuf>,

    /// How sorting treats dependency cycles: tolerate or reject
    #[arg(long)]
    pub cycles: Option<CyclePolicy>,

    /// Do not print the menu before each prompt
    #[arg(long)]
    pub no_menu: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// Merges command-line flags over the loaded configuration
    pub fn settings(&self, config: &Config) -> (ShellSettings, CyclePolicy) {
        let settings = ShellSettings {
            format: self.format.unwrap_or(config.default_format),
            show_menu: config.show_menu && !self.no_menu,
        };
        (settings, self.cycles.unwrap_or(config.cycle_policy))
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level, cli.verbose)?;

    let config = Config::load(cli.config.as_deref())?;
    debug!(?config, "configuration loaded");

    let (settings, policy) = cli.settings(&config);
    let workspace = Workspace::with_policy(policy);
    info!(
        cycle_policy = %workspace.cycle_policy(),
        format = ?settings.format,
        "starting scheduler"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(workspace, stdin.lock(), stdout.lock(), settings);
    shell.run()
}
