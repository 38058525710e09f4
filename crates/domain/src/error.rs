//! Domain error types.

use event_store::EventStoreError;
use thiserror::Error;

use crate::customer::CustomerError;

/// Errors that can occur while replaying an event history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// There were no events to replay.
    #[error("Cannot replay an empty event history")]
    EmptyHistory,

    /// The first event is not the aggregate's genesis event.
    #[error("{aggregate_type} history must start with its genesis event, found {event_type}")]
    MissingGenesis {
        aggregate_type: &'static str,
        event_type: &'static str,
    },
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the event store.
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    /// The customer aggregate rejected a command.
    #[error("Customer error: {0}")]
    Customer(#[from] CustomerError),

    /// A stored history could not be replayed.
    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),
}
