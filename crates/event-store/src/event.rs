use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AggregateId, EventStoreError, Result};

/// Unique identifier for a stored event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an event within its aggregate's stream.
///
/// A stream with no events is at version 0; the first event is version 1 and
/// every later event increments by one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Version of a stream that has no events yet.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Version of the first event in a stream.
    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    pub fn is_initial(&self) -> bool {
        self.0 == 0
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored event: the serialized domain event plus the data needed to place
/// it in its stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,

    /// Domain event name, e.g. "CustomerRegistered".
    pub event_type: String,

    pub aggregate_id: AggregateId,

    /// Aggregate name, e.g. "Customer".
    pub aggregate_type: String,

    /// Stream version after this event.
    pub version: Version,

    pub timestamp: DateTime<Utc>,

    /// The domain event as JSON.
    pub payload: serde_json::Value,

    /// Free-form context such as the command that produced the event.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl EventEnvelope {
    pub fn builder() -> EventEnvelopeBuilder {
        EventEnvelopeBuilder::default()
    }

    /// Deserializes the payload into a concrete domain event.
    pub fn decode<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}

/// Builder for [`EventEnvelope`].
#[derive(Debug, Default)]
pub struct EventEnvelopeBuilder {
    event_id: Option<EventId>,
    event_type: Option<String>,
    aggregate_id: Option<AggregateId>,
    aggregate_type: Option<String>,
    version: Option<Version>,
    timestamp: Option<DateTime<Utc>>,
    payload: Option<serde_json::Value>,
    metadata: HashMap<String, serde_json::Value>,
}

impl EventEnvelopeBuilder {
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn aggregate_id(mut self, id: AggregateId) -> Self {
        self.aggregate_id = Some(id);
        self
    }

    pub fn aggregate_type(mut self, aggregate_type: impl Into<String>) -> Self {
        self.aggregate_type = Some(aggregate_type.into());
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Serializes `payload` into the envelope.
    pub fn payload<T: Serialize>(mut self, payload: &T) -> Result<Self> {
        self.payload = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    pub fn payload_raw(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Builds the envelope, failing if a required field was never set.
    pub fn build(self) -> Result<EventEnvelope> {
        Ok(EventEnvelope {
            event_id: self.event_id.unwrap_or_default(),
            event_type: self
                .event_type
                .ok_or(EventStoreError::IncompleteEnvelope("event_type"))?,
            aggregate_id: self
                .aggregate_id
                .ok_or(EventStoreError::IncompleteEnvelope("aggregate_id"))?,
            aggregate_type: self
                .aggregate_type
                .ok_or(EventStoreError::IncompleteEnvelope("aggregate_type"))?,
            version: self
                .version
                .ok_or(EventStoreError::IncompleteEnvelope("version"))?,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            payload: self
                .payload
                .ok_or(EventStoreError::IncompleteEnvelope("payload"))?,
            metadata: self.metadata,
        })
    }
}
