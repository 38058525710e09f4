//! Customer aggregate implementation.

use common::AggregateId;
use event_store::Version;

use crate::aggregate::Aggregate;

use super::{
    ChangeCustomerEmailAddress, ChangeCustomerName, ConfirmCustomerEmailAddress, CustomerCommand,
    CustomerError, CustomerEvent, CustomerState, RegisterCustomer, state::reduce,
};

/// Customer aggregate root.
///
/// Holds `None` state until a `CustomerRegistered` event has been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customer {
    version: Version,
    state: Option<CustomerState>,
}

impl Aggregate for Customer {
    type Event = CustomerEvent;
    type Error = CustomerError;

    fn aggregate_type() -> &'static str {
        "Customer"
    }

    fn id(&self) -> Option<&AggregateId> {
        self.state.as_ref().map(|state| &state.customer_id)
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn is_genesis(event: &Self::Event) -> bool {
        matches!(event, CustomerEvent::CustomerRegistered(_))
    }

    fn apply(&mut self, event: Self::Event) {
        self.state = reduce(self.state.take(), &event);
    }
}

// Query methods
impl Customer {
    pub fn state(&self) -> Option<&CustomerState> {
        self.state.as_ref()
    }

    pub fn is_email_address_confirmed(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(CustomerState::is_email_address_confirmed)
    }
}

// Command methods (return events)
impl Customer {
    /// Registers a customer. Needs no prior state and always emits exactly one
    /// `CustomerRegistered` copying the command's fields.
    pub fn register(command: &RegisterCustomer) -> Vec<CustomerEvent> {
        vec![CustomerEvent::customer_registered(
            command.customer_id.clone(),
            command.email_address.clone(),
            command.confirmation_hash.clone(),
            command.name.clone(),
        )]
    }

    /// Confirms the current email address.
    ///
    /// A wrong hash is recorded as `CustomerEmailAddressConfirmationFailed`,
    /// whatever the current status. A correct hash for an already confirmed
    /// address emits nothing.
    pub fn confirm_email_address(
        &self,
        command: &ConfirmCustomerEmailAddress,
    ) -> Result<Vec<CustomerEvent>, CustomerError> {
        let state = self.registered(&command.customer_id)?;

        if command.confirmation_hash != state.confirmation_hash {
            return Ok(vec![CustomerEvent::email_address_confirmation_failed(
                command.customer_id.clone(),
            )]);
        }

        if state.is_email_address_confirmed() {
            return Ok(vec![]);
        }

        Ok(vec![CustomerEvent::email_address_confirmed(
            command.customer_id.clone(),
        )])
    }

    /// Replaces the email address, starting a new confirmation epoch.
    pub fn change_email_address(
        &self,
        command: &ChangeCustomerEmailAddress,
    ) -> Result<Vec<CustomerEvent>, CustomerError> {
        let state = self.registered(&command.customer_id)?;

        if command.email_address == state.email_address {
            return Ok(vec![]);
        }

        Ok(vec![CustomerEvent::email_address_changed(
            command.customer_id.clone(),
            command.email_address.clone(),
            command.confirmation_hash.clone(),
        )])
    }

    pub fn change_name(&self, command: &ChangeCustomerName) -> Result<Vec<CustomerEvent>, CustomerError> {
        let state = self.registered(&command.customer_id)?;

        if command.name == state.name {
            return Ok(vec![]);
        }

        Ok(vec![CustomerEvent::name_changed(
            command.customer_id.clone(),
            command.name.clone(),
        )])
    }

    /// Decides the events for any customer command.
    ///
    /// Registering an already registered customer is rejected here; the
    /// associated [`Customer::register`] itself is unconditional.
    pub fn decide(&self, command: &CustomerCommand) -> Result<Vec<CustomerEvent>, CustomerError> {
        match command {
            CustomerCommand::RegisterCustomer(cmd) => match self.state() {
                Some(state) => Err(CustomerError::AlreadyRegistered {
                    customer_id: state.customer_id.clone(),
                }),
                None => Ok(Self::register(cmd)),
            },
            CustomerCommand::ConfirmCustomerEmailAddress(cmd) => self.confirm_email_address(cmd),
            CustomerCommand::ChangeCustomerEmailAddress(cmd) => self.change_email_address(cmd),
            CustomerCommand::ChangeCustomerName(cmd) => self.change_name(cmd),
        }
    }

    /// Decides and applies a command, returning the advanced customer with the
    /// events that got it there.
    ///
    /// Threading the returned customer into the next call lets several
    /// commands run in one session without reloading the history.
    pub fn handle(mut self, command: &CustomerCommand) -> Result<(Self, Vec<CustomerEvent>), CustomerError> {
        let events = self.decide(command)?;
        for event in &events {
            self.apply(event.clone());
            self.version = self.version.next();
        }
        Ok((self, events))
    }

    fn registered(&self, customer_id: &AggregateId) -> Result<&CustomerState, CustomerError> {
        let state = self.state.as_ref().ok_or_else(|| CustomerError::NotRegistered {
            customer_id: customer_id.clone(),
        })?;

        if &state.customer_id != customer_id {
            return Err(CustomerError::IdentityMismatch {
                expected: state.customer_id.clone(),
                actual: customer_id.clone(),
            });
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReplayError;
    use common::{EmailAddress, Hash, PersonName};

    fn id() -> AggregateId {
        AggregateId::new("1")
    }

    fn email(value: &str) -> EmailAddress {
        EmailAddress::parse(value).unwrap()
    }

    fn hash(value: &str) -> Hash {
        Hash::new(value).unwrap()
    }

    fn name(value: &str) -> PersonName {
        PersonName::new(value).unwrap()
    }

    fn register_command() -> RegisterCustomer {
        RegisterCustomer::new(id(), email("a@x.com"), hash("H1"), name("Ann"))
    }

    fn confirm(value: &str) -> ConfirmCustomerEmailAddress {
        ConfirmCustomerEmailAddress::new(id(), hash(value))
    }

    fn registered() -> Customer {
        Customer::reconstitute(Customer::register(&register_command())).unwrap()
    }

    fn confirmed() -> Customer {
        let mut customer = registered();
        customer.apply_events(customer.confirm_email_address(&confirm("H1")).unwrap());
        customer
    }

    #[test]
    fn test_register_copies_command_fields() {
        let events = Customer::register(&register_command());

        assert_eq!(
            events,
            vec![CustomerEvent::customer_registered(
                id(),
                email("a@x.com"),
                hash("H1"),
                name("Ann")
            )]
        );
    }

    #[test]
    fn test_confirm_then_confirm_again() {
        let mut customer = registered();

        let events = customer.confirm_email_address(&confirm("H1")).unwrap();
        assert_eq!(events, vec![CustomerEvent::email_address_confirmed(id())]);
        customer.apply_events(events);
        assert!(customer.is_email_address_confirmed());

        let events = customer.confirm_email_address(&confirm("H1")).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_wrong_hash_fails_without_changing_status() {
        for mut customer in [registered(), confirmed()] {
            let was_confirmed = customer.is_email_address_confirmed();

            let events = customer.confirm_email_address(&confirm("WRONG")).unwrap();
            assert_eq!(
                events,
                vec![CustomerEvent::email_address_confirmation_failed(id())]
            );

            customer.apply_events(events);
            assert_eq!(customer.is_email_address_confirmed(), was_confirmed);
        }
    }

    #[test]
    fn test_email_change_requires_reconfirmation() {
        let mut customer = confirmed();

        let change = ChangeCustomerEmailAddress::new(id(), email("b@x.com"), hash("H2"));
        let events = customer.change_email_address(&change).unwrap();
        assert_eq!(
            events,
            vec![CustomerEvent::email_address_changed(
                id(),
                email("b@x.com"),
                hash("H2")
            )]
        );
        customer.apply_events(events);
        assert!(!customer.is_email_address_confirmed());

        let events = customer.confirm_email_address(&confirm("H1")).unwrap();
        assert_eq!(
            events,
            vec![CustomerEvent::email_address_confirmation_failed(id())]
        );

        let events = customer.confirm_email_address(&confirm("H2")).unwrap();
        assert_eq!(events, vec![CustomerEvent::email_address_confirmed(id())]);
    }

    #[test]
    fn test_same_email_is_a_no_op() {
        let customer = confirmed();
        let change = ChangeCustomerEmailAddress::new(id(), email("a@x.com"), hash("H9"));

        assert!(customer.change_email_address(&change).unwrap().is_empty());
    }

    #[test]
    fn test_change_name() {
        let mut customer = registered();

        let same = ChangeCustomerName::new(id(), name("Ann"));
        assert!(customer.change_name(&same).unwrap().is_empty());

        let other = ChangeCustomerName::new(id(), name("Annie"));
        let events = customer.change_name(&other).unwrap();
        assert_eq!(events, vec![CustomerEvent::name_changed(id(), name("Annie"))]);

        customer.apply_events(events);
        assert!(customer.change_name(&other).unwrap().is_empty());
    }

    #[test]
    fn test_commands_against_unregistered_customer_fail() {
        let customer = Customer::default();

        assert!(matches!(
            customer.confirm_email_address(&confirm("H1")),
            Err(CustomerError::NotRegistered { .. })
        ));
        assert!(matches!(
            customer.change_name(&ChangeCustomerName::new(id(), name("Ann"))),
            Err(CustomerError::NotRegistered { .. })
        ));
    }

    #[test]
    fn test_command_for_other_customer_is_rejected() {
        let customer = registered();
        let command = ChangeCustomerName::new(AggregateId::new("2"), name("Bob"));

        assert!(matches!(
            customer.change_name(&command),
            Err(CustomerError::IdentityMismatch { .. })
        ));
    }

    #[test]
    fn test_decide_rejects_second_registration() {
        let customer = registered();
        let result = customer.decide(&register_command().into());

        assert!(matches!(
            result,
            Err(CustomerError::AlreadyRegistered { .. })
        ));
    }

    #[test]
    fn test_handle_threads_state_through_a_session() {
        let customer = Customer::default();

        let (customer, events) = customer.handle(&register_command().into()).unwrap();
        assert_eq!(events.len(), 1);

        let (customer, events) = customer.handle(&confirm("H1").into()).unwrap();
        assert_eq!(events, vec![CustomerEvent::email_address_confirmed(id())]);

        let (customer, events) = customer.handle(&confirm("H1").into()).unwrap();
        assert!(events.is_empty());

        assert_eq!(customer.version(), Version::new(2));
        assert!(customer.is_email_address_confirmed());
        assert_eq!(customer.id(), Some(&id()));
    }

    #[test]
    fn test_handle_matches_replay() {
        let commands: Vec<CustomerCommand> = vec![
            register_command().into(),
            confirm("H1").into(),
            ChangeCustomerEmailAddress::new(id(), email("b@x.com"), hash("H2")).into(),
            confirm("H1").into(),
            ChangeCustomerName::new(id(), name("Annie")).into(),
        ];

        let mut customer = Customer::default();
        let mut history = Vec::new();
        for command in &commands {
            let (next, events) = customer.handle(command).unwrap();
            customer = next;
            history.extend(events);
        }

        let replayed = Customer::reconstitute(history.clone()).unwrap();
        assert_eq!(replayed, customer);
        assert_eq!(Customer::reconstitute(history).unwrap(), replayed);
    }

    #[test]
    fn test_replay_requires_registration_first() {
        let result = Customer::reconstitute(vec![CustomerEvent::email_address_confirmed(id())]);

        assert_eq!(
            result,
            Err(ReplayError::MissingGenesis {
                aggregate_type: "Customer",
                event_type: "CustomerEmailAddressConfirmed",
            })
        );
    }
}
