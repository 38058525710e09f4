//! Script runner for the customer aggregate.
//!
//! Reads one JSON-encoded [`CustomerCommand`] per line, runs it through a
//! [`CustomerService`] and writes one JSON outcome per command.

pub mod config;
mod error;

use std::io::{BufRead, Write};

use domain::{Command, CustomerCommand, CustomerError, CustomerEvent, CustomerService, DomainError};
use event_store::{EventStore, EventStoreError};
use serde::Serialize;

pub use config::{Config, LogFormat};
pub use error::CliError;

/// Outcome of one script line, written as a single JSON line.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Applied {
        line: usize,
        customer_id: String,
        command: &'static str,
        version: i64,
        events: Vec<CustomerEvent>,
    },
    Rejected {
        line: usize,
        error: String,
    },
}

/// Totals for a finished script.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSummary {
    pub commands: usize,
    pub events: usize,
    pub rejected: usize,
}

/// Runs every command in `reader` against `service`, writing outcomes to
/// `writer`.
///
/// Blank lines and lines starting with `#` are skipped. Rejected commands
/// are reported and the script continues; a line that is not a valid command
/// aborts the run.
pub async fn run_script<S, R, W>(
    service: &CustomerService<S>,
    reader: R,
    mut writer: W,
) -> Result<ScriptSummary, CliError>
where
    S: EventStore,
    R: BufRead,
    W: Write,
{
    let mut summary = ScriptSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let command: CustomerCommand = serde_json::from_str(trimmed).map_err(|source| {
            CliError::Decode {
                line: line_no,
                source,
            }
        })?;

        let outcome = run_command(service, line_no, command).await?;
        summary.commands += 1;
        match &outcome {
            Outcome::Applied { events, .. } => summary.events += events.len(),
            Outcome::Rejected { .. } => summary.rejected += 1,
        }

        serde_json::to_writer(&mut writer, &outcome)?;
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(summary)
}

async fn run_command<S: EventStore>(
    service: &CustomerService<S>,
    line: usize,
    command: CustomerCommand,
) -> Result<Outcome, CliError> {
    let customer_id = command.aggregate_id().to_string();
    let command_type = command.command_type();

    match service.handle(command).await {
        Ok(result) => Ok(Outcome::Applied {
            line,
            customer_id,
            command: command_type,
            version: result.new_version.as_i64(),
            events: result.events,
        }),
        Err(err) if is_rejection(&err) => {
            tracing::warn!(line, %customer_id, command = command_type, error = %err, "command rejected");
            Ok(Outcome::Rejected {
                line,
                error: err.to_string(),
            })
        }
        Err(err) => Err(err.into()),
    }
}

fn is_rejection(err: &DomainError) -> bool {
    matches!(
        err,
        DomainError::Customer(
            CustomerError::NotRegistered { .. }
                | CustomerError::AlreadyRegistered { .. }
                | CustomerError::IdentityMismatch { .. }
        ) | DomainError::EventStore(EventStoreError::ConcurrencyConflict { .. })
    )
}
