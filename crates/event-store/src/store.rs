use async_trait::async_trait;

use crate::{AggregateId, EventEnvelope, EventStoreError, Result, Version};

/// Options for appending events to the store.
#[derive(Debug, Clone, Default)]
pub struct AppendOptions {
    /// Version the stream must be at for the append to succeed.
    /// `None` skips the check.
    pub expected_version: Option<Version>,
}

impl AppendOptions {
    /// No version check.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_version(version: Version) -> Self {
        Self {
            expected_version: Some(version),
        }
    }

    /// The stream must not exist yet.
    pub fn expect_new() -> Self {
        Self::expect_version(Version::initial())
    }
}

/// Durable home of per-aggregate event streams.
///
/// Implementations serialize appends per aggregate: an append whose
/// `expected_version` is stale fails with
/// [`EventStoreError::ConcurrencyConflict`] and writes nothing.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends a batch of events to a single stream, atomically.
    ///
    /// Returns the stream version after the append.
    async fn append(&self, events: Vec<EventEnvelope>, options: AppendOptions) -> Result<Version>;

    /// Returns every event of an aggregate, oldest first.
    async fn get_events_for_aggregate(
        &self,
        aggregate_id: &AggregateId,
    ) -> Result<Vec<EventEnvelope>>;

    /// Returns the current stream version, or `None` for an unknown aggregate.
    async fn get_aggregate_version(&self, aggregate_id: &AggregateId) -> Result<Option<Version>>;
}

/// Convenience methods available on every [`EventStore`].
#[async_trait]
pub trait EventStoreExt: EventStore {
    /// Loads the full history of an aggregate.
    async fn load(&self, aggregate_id: &AggregateId) -> Result<Vec<EventEnvelope>> {
        self.get_events_for_aggregate(aggregate_id).await
    }

    /// Checks whether an aggregate has any events.
    async fn aggregate_exists(&self, aggregate_id: &AggregateId) -> Result<bool> {
        Ok(self.get_aggregate_version(aggregate_id).await?.is_some())
    }
}

impl<T: EventStore + ?Sized> EventStoreExt for T {}

/// Checks that a batch is non-empty, targets one stream, and carries
/// consecutive versions.
pub fn validate_events_for_append(events: &[EventEnvelope]) -> Result<()> {
    let Some(first) = events.first() else {
        return Err(EventStoreError::InvalidAppend(
            "cannot append an empty event list".to_string(),
        ));
    };

    let mut expected_version = first.version;
    for event in events.iter().skip(1) {
        if event.aggregate_id != first.aggregate_id
            || event.aggregate_type != first.aggregate_type
        {
            return Err(EventStoreError::InvalidAppend(
                "all events must belong to the same aggregate".to_string(),
            ));
        }

        expected_version = expected_version.next();
        if event.version != expected_version {
            return Err(EventStoreError::InvalidAppend(format!(
                "event versions must be sequential: expected {}, got {}",
                expected_version, event.version
            )));
        }
    }

    Ok(())
}
