//! Customer commands.

use common::{AggregateId, EmailAddress, Hash, PersonName};
use serde::{Deserialize, Serialize};

use crate::command::Command;

use super::Customer;

/// Command to register a new customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterCustomer {
    pub customer_id: AggregateId,
    pub email_address: EmailAddress,
    pub confirmation_hash: Hash,
    pub name: PersonName,
}

impl RegisterCustomer {
    pub fn new(
        customer_id: AggregateId,
        email_address: EmailAddress,
        confirmation_hash: Hash,
        name: PersonName,
    ) -> Self {
        Self {
            customer_id,
            email_address,
            confirmation_hash,
            name,
        }
    }
}

/// Command to confirm the current email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmCustomerEmailAddress {
    pub customer_id: AggregateId,

    /// Hash the customer received for their current address.
    pub confirmation_hash: Hash,
}

impl ConfirmCustomerEmailAddress {
    pub fn new(customer_id: AggregateId, confirmation_hash: Hash) -> Self {
        Self {
            customer_id,
            confirmation_hash,
        }
    }
}

/// Command to replace the email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCustomerEmailAddress {
    pub customer_id: AggregateId,
    pub email_address: EmailAddress,

    /// Hash that will confirm the new address.
    pub confirmation_hash: Hash,
}

impl ChangeCustomerEmailAddress {
    pub fn new(customer_id: AggregateId, email_address: EmailAddress, confirmation_hash: Hash) -> Self {
        Self {
            customer_id,
            email_address,
            confirmation_hash,
        }
    }
}

/// Command to change the customer's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCustomerName {
    pub customer_id: AggregateId,
    pub name: PersonName,
}

impl ChangeCustomerName {
    pub fn new(customer_id: AggregateId, name: PersonName) -> Self {
        Self { customer_id, name }
    }
}

/// Any customer command, as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CustomerCommand {
    RegisterCustomer(RegisterCustomer),
    ConfirmCustomerEmailAddress(ConfirmCustomerEmailAddress),
    ChangeCustomerEmailAddress(ChangeCustomerEmailAddress),
    ChangeCustomerName(ChangeCustomerName),
}

impl Command for CustomerCommand {
    type Aggregate = Customer;

    fn aggregate_id(&self) -> &AggregateId {
        match self {
            CustomerCommand::RegisterCustomer(cmd) => &cmd.customer_id,
            CustomerCommand::ConfirmCustomerEmailAddress(cmd) => &cmd.customer_id,
            CustomerCommand::ChangeCustomerEmailAddress(cmd) => &cmd.customer_id,
            CustomerCommand::ChangeCustomerName(cmd) => &cmd.customer_id,
        }
    }

    fn command_type(&self) -> &'static str {
        match self {
            CustomerCommand::RegisterCustomer(_) => "RegisterCustomer",
            CustomerCommand::ConfirmCustomerEmailAddress(_) => "ConfirmCustomerEmailAddress",
            CustomerCommand::ChangeCustomerEmailAddress(_) => "ChangeCustomerEmailAddress",
            CustomerCommand::ChangeCustomerName(_) => "ChangeCustomerName",
        }
    }
}

impl From<RegisterCustomer> for CustomerCommand {
    fn from(cmd: RegisterCustomer) -> Self {
        CustomerCommand::RegisterCustomer(cmd)
    }
}

impl From<ConfirmCustomerEmailAddress> for CustomerCommand {
    fn from(cmd: ConfirmCustomerEmailAddress) -> Self {
        CustomerCommand::ConfirmCustomerEmailAddress(cmd)
    }
}

impl From<ChangeCustomerEmailAddress> for CustomerCommand {
    fn from(cmd: ChangeCustomerEmailAddress) -> Self {
        CustomerCommand::ChangeCustomerEmailAddress(cmd)
    }
}

impl From<ChangeCustomerName> for CustomerCommand {
    fn from(cmd: ChangeCustomerName) -> Self {
        CustomerCommand::ChangeCustomerName(cmd)
    }
}
