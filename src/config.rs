//! Application configuration.
//!
//! Configuration is read from a TOML file when one is given (via `--config`
//! or `CADENCE_CONFIG`); every field has a default, so an absent file or an
//! absent section is valid. `CADENCE_LOG` overrides the log filter.
//!
//! ```toml
//! [logging]
//! filter = "cadence=debug"
//!
//! [recurrence]
//! process_on_startup = true
//! spawn_policy = "once_per_completion"
//! default_priority = "high"
//! ```

use crate::task::domain::{Priority, SpawnPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the log filter.
pub const LOG_FILTER_ENV: &str = "CADENCE_LOG";

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CADENCE_CONFIG";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for [`AppConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Recurrence processing settings.
    pub recurrence: RecurrenceConfig,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing-subscriber` env-filter directive.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_owned(),
        }
    }
}

/// Recurrence processing settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecurrenceConfig {
    /// Run one processing pass when the application starts.
    pub process_on_startup: bool,
    /// Whether a completed task may spawn again on later passes.
    pub spawn_policy: SpawnPolicy,
    /// Priority for tasks created without one.
    pub default_priority: Priority,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            process_on_startup: true,
            spawn_policy: SpawnPolicy::default(),
            default_priority: Priority::default(),
        }
    }
}

impl AppConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when the text is malformed or names unknown
    /// fields.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Loads configuration from `path`, or defaults when `path` is `None`,
    /// then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(file) => Self::read_file(file)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides from a variable lookup; blank values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(filter) = lookup(LOG_FILTER_ENV).filter(|value| !value.trim().is_empty()) {
            self.logging.filter = filter;
        }
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
