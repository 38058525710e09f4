//! Event storage for event-sourced aggregates.
//!
//! Events are kept in per-aggregate streams, wrapped in [`EventEnvelope`]s and
//! appended under optimistic concurrency control ([`AppendOptions`]).

pub mod error;
pub mod event;
pub mod memory;
pub mod store;

pub use common::AggregateId;
pub use error::{EventStoreError, Result};
pub use event::{EventEnvelope, EventEnvelopeBuilder, EventId, Version};
pub use memory::InMemoryEventStore;
pub use store::{AppendOptions, EventStore, EventStoreExt};
