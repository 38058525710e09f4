//! Core aggregate and domain event traits.

use common::AggregateId;
use event_store::Version;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::ReplayError;

/// Trait for domain events.
///
/// Domain events are immutable facts, named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name.
    ///
    /// This is stored in the event envelope next to the payload.
    fn event_type(&self) -> &'static str;
}

/// Trait for aggregates in an event-sourced system.
///
/// In event sourcing, aggregates:
/// - Are rebuilt by replaying events
/// - Generate events from commands
/// - Apply events to update state (pure, deterministic)
pub trait Aggregate: Default + Send + Sync + Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// The type of errors command handling can produce.
    type Error: std::error::Error + Send + Sync;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's identifier, or `None` before its genesis event
    /// has been applied.
    fn id(&self) -> Option<&AggregateId>;

    /// Returns the current version of the aggregate.
    ///
    /// Version is 0 for a new aggregate and increments with each event.
    fn version(&self) -> Version;

    /// Sets the version.
    ///
    /// Called by the command handler after loading or appending events.
    fn set_version(&mut self, version: Version);

    /// Returns true for the event kind every valid history must start with.
    fn is_genesis(event: &Self::Event) -> bool;

    /// Applies an event to the aggregate, updating its state.
    ///
    /// This method must be pure and deterministic:
    /// - Given the same state and event, it must always produce the same new state
    /// - It must not have side effects
    /// - It must not fail (events represent facts that have happened)
    fn apply(&mut self, event: Self::Event);

    /// Applies multiple events in sequence.
    fn apply_events(&mut self, events: impl IntoIterator<Item = Self::Event>) {
        for event in events {
            self.apply(event);
        }
    }

    /// Rebuilds an aggregate by folding its history from the default state.
    ///
    /// The history must be non-empty and start with a genesis event. The
    /// returned aggregate's version is the number of events folded.
    fn reconstitute<I>(events: I) -> Result<Self, ReplayError>
    where
        I: IntoIterator<Item = Self::Event>,
    {
        let mut events = events.into_iter();
        let first = events.next().ok_or(ReplayError::EmptyHistory)?;
        if !Self::is_genesis(&first) {
            return Err(ReplayError::MissingGenesis {
                aggregate_type: Self::aggregate_type(),
                event_type: first.event_type(),
            });
        }

        let mut aggregate = Self::default();
        let mut version = Version::first();
        aggregate.apply(first);
        for event in events {
            aggregate.apply(event);
            version = version.next();
        }
        aggregate.set_version(version);

        Ok(aggregate)
    }
}
