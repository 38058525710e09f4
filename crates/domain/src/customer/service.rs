//! Customer service providing a simplified API for customer operations.

use common::AggregateId;
use event_store::EventStore;

use crate::aggregate::DomainEvent;
use crate::command::{Command, CommandHandler, CommandResult};
use crate::error::DomainError;

use super::{
    ChangeCustomerEmailAddress, ChangeCustomerName, ConfirmCustomerEmailAddress, Customer,
    CustomerCommand, CustomerEvent, RegisterCustomer,
};

/// Service for managing customers.
///
/// Wraps a command handler so every customer command is loaded, decided and
/// appended against the stream version it was decided on.
pub struct CustomerService<S: EventStore> {
    handler: CommandHandler<S, Customer>,
}

impl<S: EventStore> CustomerService<S> {
    pub fn new(store: S) -> Self {
        Self {
            handler: CommandHandler::new(store),
        }
    }

    /// Handles any customer command.
    ///
    /// Commands that change nothing return an empty event list and leave the
    /// store untouched.
    #[tracing::instrument(
        skip(self, command),
        fields(customer_id = %command.aggregate_id(), command_type = command.command_type())
    )]
    pub async fn handle(
        &self,
        command: CustomerCommand,
    ) -> Result<CommandResult<Customer>, DomainError> {
        metrics::counter!("customer_commands_total", "command" => command.command_type())
            .increment(1);

        let result = self
            .handler
            .execute(&command, |customer| customer.decide(&command))
            .await?;

        for event in &result.events {
            metrics::counter!("customer_events_emitted_total", "event_type" => event.event_type())
                .increment(1);
            if let CustomerEvent::CustomerEmailAddressConfirmationFailed(data) = event {
                metrics::counter!("customer_email_confirmation_failures_total").increment(1);
                tracing::warn!(customer_id = %data.customer_id, "email address confirmation failed");
            }
        }

        tracing::info!(
            events = result.events.len(),
            version = %result.new_version,
            "command handled"
        );

        Ok(result)
    }

    pub async fn register_customer(
        &self,
        cmd: RegisterCustomer,
    ) -> Result<CommandResult<Customer>, DomainError> {
        self.handle(cmd.into()).await
    }

    pub async fn confirm_email_address(
        &self,
        cmd: ConfirmCustomerEmailAddress,
    ) -> Result<CommandResult<Customer>, DomainError> {
        self.handle(cmd.into()).await
    }

    pub async fn change_email_address(
        &self,
        cmd: ChangeCustomerEmailAddress,
    ) -> Result<CommandResult<Customer>, DomainError> {
        self.handle(cmd.into()).await
    }

    pub async fn change_name(
        &self,
        cmd: ChangeCustomerName,
    ) -> Result<CommandResult<Customer>, DomainError> {
        self.handle(cmd.into()).await
    }

    /// Loads a customer by ID.
    ///
    /// Returns None if the customer doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_customer(
        &self,
        customer_id: &AggregateId,
    ) -> Result<Option<Customer>, DomainError> {
        self.handler.load_existing(customer_id).await
    }

    /// Returns every event recorded for a customer, oldest first.
    pub async fn history(
        &self,
        customer_id: &AggregateId,
    ) -> Result<Vec<CustomerEvent>, DomainError> {
        self.handler.history(customer_id).await
    }
}
