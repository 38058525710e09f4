use thiserror::Error;

use crate::{AggregateId, Version};

/// Errors that can occur when interacting with the event store.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// The stream moved on since the caller loaded it.
    #[error(
        "Concurrency conflict for aggregate {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        aggregate_id: AggregateId,
        expected: Version,
        actual: Version,
    },

    /// The batch handed to `append` is not a valid continuation of one stream.
    #[error("Invalid append: {0}")]
    InvalidAppend(String),

    /// An envelope was built without one of its required fields.
    #[error("Incomplete event envelope: missing {0}")]
    IncompleteEnvelope(&'static str),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for event store operations.
pub type Result<T> = std::result::Result<T, EventStoreError>;
