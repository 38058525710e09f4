//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use crate::CliError;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(CliError::Config(format!("unknown LOG_FORMAT: {other}"))),
        }
    }
}

/// Runner configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
///
/// The script path is the first positional argument; without one the script
/// is read from standard input.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub script: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the environment and process arguments,
    /// falling back to defaults.
    pub fn from_env() -> Result<Self, CliError> {
        let log_format = match std::env::var("LOG_FORMAT") {
            Ok(value) => value.parse()?,
            Err(_) => LogFormat::default(),
        };

        Ok(Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format,
            script: std::env::args_os().nth(1).map(PathBuf::from),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            script: None,
        }
    }
}
