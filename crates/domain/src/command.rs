//! Command handling infrastructure.

use std::marker::PhantomData;

use common::AggregateId;
use event_store::{AppendOptions, EventEnvelope, EventStore, EventStoreExt, Version};

use crate::aggregate::{Aggregate, DomainEvent};
use crate::error::DomainError;

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult<A: Aggregate> {
    /// The aggregate after applying the new events.
    pub aggregate: A,

    /// The events that were generated and persisted.
    pub events: Vec<A::Event>,

    /// The version of the aggregate after the command.
    pub new_version: Version,
}

/// Trait for commands that can be executed against an aggregate.
pub trait Command: Send + Sync {
    /// The type of aggregate this command targets.
    type Aggregate: Aggregate;

    /// Returns the ID of the aggregate this command targets.
    fn aggregate_id(&self) -> &AggregateId;

    /// Returns the command name, recorded in the metadata of emitted events.
    fn command_type(&self) -> &'static str;
}

/// Runs commands against aggregates stored in an [`EventStore`].
///
/// Each execution:
/// 1. Loads the aggregate by replaying its stream
/// 2. Lets the command decide which events happened
/// 3. Appends them, expecting the stream to still be at the loaded version
/// 4. Applies them to the loaded aggregate
pub struct CommandHandler<S, A>
where
    S: EventStore,
    A: Aggregate,
{
    store: S,
    _phantom: PhantomData<A>,
}

impl<S, A> CommandHandler<S, A>
where
    S: EventStore,
    A: Aggregate,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// Loads the decoded event history of an aggregate, oldest first.
    pub async fn history(&self, aggregate_id: &AggregateId) -> Result<Vec<A::Event>, DomainError> {
        let envelopes = self.store.load(aggregate_id).await?;
        let events = envelopes
            .iter()
            .map(|e| e.decode::<A::Event>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Loads an aggregate from the event store.
    ///
    /// An unknown aggregate loads as the default instance.
    pub async fn load(&self, aggregate_id: &AggregateId) -> Result<A, DomainError> {
        let envelopes = self.store.load(aggregate_id).await?;
        let Some(stored_version) = envelopes.last().map(|e| e.version) else {
            return Ok(A::default());
        };

        let events = envelopes
            .iter()
            .map(|e| e.decode::<A::Event>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut aggregate = A::reconstitute(events)?;
        aggregate.set_version(stored_version);

        Ok(aggregate)
    }

    /// Loads an aggregate, returning None if it doesn't exist.
    pub async fn load_existing(&self, aggregate_id: &AggregateId) -> Result<Option<A>, DomainError> {
        let aggregate = self.load(aggregate_id).await?;
        Ok(aggregate.id().is_some().then_some(aggregate))
    }

    /// Executes a command and persists the resulting events.
    ///
    /// `command_fn` receives the current aggregate and decides which events
    /// happened. An empty decision returns without touching the store.
    pub async fn execute<C, F>(&self, command: &C, command_fn: F) -> Result<CommandResult<A>, DomainError>
    where
        C: Command<Aggregate = A>,
        F: FnOnce(&A) -> Result<Vec<A::Event>, A::Error>,
        DomainError: From<A::Error>,
    {
        let aggregate_id = command.aggregate_id();
        let mut aggregate = self.load(aggregate_id).await?;
        let current_version = aggregate.version();

        let events = command_fn(&aggregate)?;

        if events.is_empty() {
            return Ok(CommandResult {
                aggregate,
                events: vec![],
                new_version: current_version,
            });
        }

        let envelopes = self.build_envelopes(command, current_version, &events)?;
        let new_version = self
            .store
            .append(envelopes, AppendOptions::expect_version(current_version))
            .await?;

        aggregate.apply_events(events.iter().cloned());
        aggregate.set_version(new_version);

        Ok(CommandResult {
            aggregate,
            events,
            new_version,
        })
    }

    fn build_envelopes<C: Command<Aggregate = A>>(
        &self,
        command: &C,
        current_version: Version,
        events: &[A::Event],
    ) -> Result<Vec<EventEnvelope>, DomainError> {
        let mut envelopes = Vec::with_capacity(events.len());
        let mut version = current_version;

        for event in events {
            version = version.next();
            let envelope = EventEnvelope::builder()
                .aggregate_id(command.aggregate_id().clone())
                .aggregate_type(A::aggregate_type())
                .event_type(event.event_type())
                .version(version)
                .metadata("command", serde_json::Value::from(command.command_type()))
                .payload(event)?
                .build()?;
            envelopes.push(envelope);
        }

        Ok(envelopes)
    }
}
