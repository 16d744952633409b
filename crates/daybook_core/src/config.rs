//! Environment-driven runtime configuration.
//!
//! # Invariants
//! - Every setting has a default; unset variables never fail.
//! - A set but unparseable value is an error, never silently defaulted.

use crate::logging::{default_log_level, LoggingConfig};
use crate::sync::DEFAULT_POLL_INTERVAL;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "daybook.sqlite3";
pub const DEFAULT_PORT: u16 = 4000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                name,
                value,
                expected,
            } => write!(f, "{name}=`{value}` is invalid; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub poll_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            port: DEFAULT_PORT,
            log_level: default_log_level().to_string(),
            log_dir: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read("DAYBOOK_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some((name, raw)) = read("DAYBOOK_PORT")
            .map(|raw| ("DAYBOOK_PORT", raw))
            .or_else(|| read("PORT").map(|raw| ("PORT", raw)))
        {
            config.port = raw.parse().map_err(|_| ConfigError::InvalidValue {
                name,
                value: raw.clone(),
                expected: "a TCP port number",
            })?;
        }
        if let Some(level) = read("DAYBOOK_LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_dir = read("DAYBOOK_LOG_DIR").map(PathBuf::from);
        if let Some(raw) = read("DAYBOOK_POLL_INTERVAL_MS") {
            let millis = raw
                .parse::<u64>()
                .ok()
                .filter(|millis| *millis > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    name: "DAYBOOK_POLL_INTERVAL_MS",
                    value: raw.clone(),
                    expected: "a positive number of milliseconds",
                })?;
            config.poll_interval = Duration::from_millis(millis);
        }

        Ok(config)
    }

    pub fn logging(&self, duplicate_to_stderr: bool) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
            duplicate_to_stderr,
        }
    }
}
