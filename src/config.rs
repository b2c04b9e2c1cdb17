//! Configuration handling for task-sched
//!
//! Configuration is read from `~/.config/task-sched/config.toml` (global),
//! or from an explicit file given with `--config` / `TASK_SCHED_CONFIG`.
//! Command-line flags override individual values.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::OutputFormat;
use crate::domain::CyclePolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// How ordering treats dependency cycles (tolerate or reject)
    pub cycle_policy: CyclePolicy,

    /// Print the menu before each prompt
    pub show_menu: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text,
            cycle_policy: CyclePolicy::Tolerate,
            show_menu: true,
        }
    }
}

impl Config {
    /// Loads the explicit file if given, otherwise the global file if it
    /// exists, otherwise defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            return Self::from_file(path);
        }

        match Self::global_config_dir() {
            Some(dir) => {
                let path = dir.join("config.toml");
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
            None => Ok(Self::default()),
        }
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "task-sched", "task-sched")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Reads and parses a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Parses config from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
