//! CLI error types.

use domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A script line is not a valid customer command.
    #[error("Line {line}: invalid command: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// A failure the script cannot continue past, such as a corrupt stream.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}
