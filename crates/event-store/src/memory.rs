use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    AggregateId, EventEnvelope, EventStoreError, Result, Version,
    store::{AppendOptions, EventStore, validate_events_for_append},
};

/// In-memory event store.
///
/// Streams live in a map keyed by aggregate ID behind a single `RwLock`, which
/// serializes appends. Cloning shares the underlying streams.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    streams: Arc<RwLock<HashMap<AggregateId, Vec<EventEnvelope>>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of events across all streams.
    pub async fn event_count(&self) -> usize {
        self.streams.read().await.values().map(Vec::len).sum()
    }

    /// IDs of every aggregate with at least one event, sorted.
    pub async fn aggregate_ids(&self) -> Vec<AggregateId> {
        let mut ids: Vec<_> = self.streams.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn clear(&self) {
        self.streams.write().await.clear();
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, events: Vec<EventEnvelope>, options: AppendOptions) -> Result<Version> {
        validate_events_for_append(&events)?;

        let aggregate_id = events[0].aggregate_id.clone();
        let first_new_version = events[0].version;

        let mut streams = self.streams.write().await;
        let current_version = streams
            .get(&aggregate_id)
            .and_then(|stream| stream.last())
            .map(|e| e.version)
            .unwrap_or(Version::initial());

        if let Some(expected) = options.expected_version
            && current_version != expected
        {
            metrics::counter!("event_store_concurrency_conflicts_total").increment(1);
            tracing::warn!(%aggregate_id, %expected, actual = %current_version, "append rejected");
            return Err(EventStoreError::ConcurrencyConflict {
                aggregate_id,
                expected,
                actual: current_version,
            });
        }

        // Unique (aggregate, version) constraint.
        if first_new_version != current_version.next() {
            tracing::warn!(
                %aggregate_id,
                first = %first_new_version,
                current = %current_version,
                "append rejected"
            );
            return Err(EventStoreError::InvalidAppend(format!(
                "first event version must be {}, got {}",
                current_version.next(),
                first_new_version
            )));
        }

        let count = events.len();
        let last_version = events.last().map(|e| e.version).unwrap_or(current_version);
        streams
            .entry(aggregate_id.clone())
            .or_default()
            .extend(events);

        metrics::counter!("event_store_events_appended_total").increment(count as u64);
        tracing::debug!(%aggregate_id, count, version = %last_version, "appended events");

        Ok(last_version)
    }

    async fn get_events_for_aggregate(
        &self,
        aggregate_id: &AggregateId,
    ) -> Result<Vec<EventEnvelope>> {
        let streams = self.streams.read().await;
        Ok(streams.get(aggregate_id).cloned().unwrap_or_default())
    }

    async fn get_aggregate_version(&self, aggregate_id: &AggregateId) -> Result<Option<Version>> {
        let streams = self.streams.read().await;
        Ok(streams
            .get(aggregate_id)
            .and_then(|stream| stream.last())
            .map(|e| e.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventStoreExt;

    fn create_test_event(aggregate_id: &AggregateId, version: i64, event_type: &str) -> EventEnvelope {
        EventEnvelope::builder()
            .aggregate_id(aggregate_id.clone())
            .aggregate_type("Customer")
            .event_type(event_type)
            .version(Version::new(version))
            .payload_raw(serde_json::json!({"test": true}))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn append_single_event() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new("1");
        let event = create_test_event(&aggregate_id, 1, "CustomerRegistered");

        let version = store
            .append(vec![event], AppendOptions::expect_new())
            .await
            .unwrap();
        assert_eq!(version, Version::first());

        let events = store.load(&aggregate_id).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(store.event_count().await, 1);
    }

    #[tokio::test]
    async fn append_multiple_events() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new("1");

        let events = vec![
            create_test_event(&aggregate_id, 1, "CustomerRegistered"),
            create_test_event(&aggregate_id, 2, "CustomerEmailAddressConfirmed"),
            create_test_event(&aggregate_id, 3, "CustomerNameChanged"),
        ];

        let version = store
            .append(events, AppendOptions::expect_new())
            .await
            .unwrap();
        assert_eq!(version, Version::new(3));

        let stored = store.get_events_for_aggregate(&aggregate_id).await.unwrap();
        let versions: Vec<_> = stored.iter().map(|e| e.version.as_i64()).collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn stale_expected_version_is_a_conflict() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new("1");

        store
            .append(
                vec![create_test_event(&aggregate_id, 1, "CustomerRegistered")],
                AppendOptions::expect_new(),
            )
            .await
            .unwrap();

        let result = store
            .append(
                vec![create_test_event(&aggregate_id, 2, "CustomerNameChanged")],
                AppendOptions::expect_version(Version::initial()),
            )
            .await;

        assert!(matches!(
            result,
            Err(EventStoreError::ConcurrencyConflict { expected, actual, .. })
                if expected == Version::initial() && actual == Version::first()
        ));
        assert_eq!(store.event_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_conflict() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new("1");

        for expected_ok in [true, false] {
            let result = store
                .append(
                    vec![create_test_event(&aggregate_id, 1, "CustomerRegistered")],
                    AppendOptions::expect_new(),
                )
                .await;
            assert_eq!(result.is_ok(), expected_ok);
        }
    }

    #[tokio::test]
    async fn correct_expected_version_succeeds() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new("1");

        store
            .append(
                vec![create_test_event(&aggregate_id, 1, "CustomerRegistered")],
                AppendOptions::expect_new(),
            )
            .await
            .unwrap();

        let version = store
            .append(
                vec![create_test_event(&aggregate_id, 2, "CustomerNameChanged")],
                AppendOptions::expect_version(Version::first()),
            )
            .await
            .unwrap();

        assert_eq!(version, Version::new(2));
    }

    #[tokio::test]
    async fn unchecked_append_still_rejects_version_reuse() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new("1");

        store
            .append(
                vec![create_test_event(&aggregate_id, 1, "CustomerRegistered")],
                AppendOptions::new(),
            )
            .await
            .unwrap();

        let result = store
            .append(
                vec![create_test_event(&aggregate_id, 1, "CustomerNameChanged")],
                AppendOptions::new(),
            )
            .await;

        match result {
            Err(EventStoreError::InvalidAppend(message)) => {
                assert_eq!(message, "first event version must be 2, got 1");
            }
            other => panic!("expected InvalidAppend, got {other:?}"),
        }
        assert_eq!(store.event_count().await, 1);
    }

    #[tokio::test]
    async fn matching_expectation_with_gapped_version_is_invalid() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new("1");

        let result = store
            .append(
                vec![create_test_event(&aggregate_id, 3, "CustomerRegistered")],
                AppendOptions::expect_new(),
            )
            .await;

        assert!(matches!(result, Err(EventStoreError::InvalidAppend(_))));
        assert!(store.aggregate_ids().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_batch_is_rejected() {
        let store = InMemoryEventStore::new();
        let result = store.append(vec![], AppendOptions::new()).await;
        assert!(matches!(result, Err(EventStoreError::InvalidAppend(_))));
    }

    #[tokio::test]
    async fn streams_are_isolated() {
        let store = InMemoryEventStore::new();
        let first = AggregateId::new("1");
        let second = AggregateId::new("2");

        for id in [&first, &second] {
            store
                .append(
                    vec![create_test_event(id, 1, "CustomerRegistered")],
                    AppendOptions::expect_new(),
                )
                .await
                .unwrap();
        }

        assert_eq!(store.load(&first).await.unwrap().len(), 1);
        assert_eq!(store.aggregate_ids().await, vec![first, second]);
    }

    #[tokio::test]
    async fn aggregate_version_and_existence() {
        let store = InMemoryEventStore::new();
        let aggregate_id = AggregateId::new("1");

        assert!(store.get_aggregate_version(&aggregate_id).await.unwrap().is_none());
        assert!(!store.aggregate_exists(&aggregate_id).await.unwrap());

        let events = vec![
            create_test_event(&aggregate_id, 1, "CustomerRegistered"),
            create_test_event(&aggregate_id, 2, "CustomerNameChanged"),
        ];
        store.append(events, AppendOptions::new()).await.unwrap();

        assert_eq!(
            store.get_aggregate_version(&aggregate_id).await.unwrap(),
            Some(Version::new(2))
        );
        assert!(store.aggregate_exists(&aggregate_id).await.unwrap());

        store.clear().await;
        assert_eq!(store.event_count().await, 0);
    }
}
