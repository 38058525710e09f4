//! Customer domain events.

use common::{AggregateId, EmailAddress, Hash, PersonName};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

/// Events that can occur on a customer aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CustomerEvent {
    /// Customer was registered with an unconfirmed email address.
    CustomerRegistered(CustomerRegisteredData),

    /// The current email address was confirmed with its hash.
    CustomerEmailAddressConfirmed(CustomerEmailAddressConfirmedData),

    /// A confirmation was attempted with the wrong hash.
    CustomerEmailAddressConfirmationFailed(CustomerEmailAddressConfirmationFailedData),

    /// The email address was replaced and awaits confirmation.
    CustomerEmailAddressChanged(CustomerEmailAddressChangedData),

    /// The customer's name was changed.
    CustomerNameChanged(CustomerNameChangedData),
}

impl DomainEvent for CustomerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CustomerEvent::CustomerRegistered(_) => "CustomerRegistered",
            CustomerEvent::CustomerEmailAddressConfirmed(_) => "CustomerEmailAddressConfirmed",
            CustomerEvent::CustomerEmailAddressConfirmationFailed(_) => {
                "CustomerEmailAddressConfirmationFailed"
            }
            CustomerEvent::CustomerEmailAddressChanged(_) => "CustomerEmailAddressChanged",
            CustomerEvent::CustomerNameChanged(_) => "CustomerNameChanged",
        }
    }
}

impl CustomerEvent {
    /// The customer this event belongs to.
    pub fn customer_id(&self) -> &AggregateId {
        match self {
            CustomerEvent::CustomerRegistered(data) => &data.customer_id,
            CustomerEvent::CustomerEmailAddressConfirmed(data) => &data.customer_id,
            CustomerEvent::CustomerEmailAddressConfirmationFailed(data) => &data.customer_id,
            CustomerEvent::CustomerEmailAddressChanged(data) => &data.customer_id,
            CustomerEvent::CustomerNameChanged(data) => &data.customer_id,
        }
    }
}

/// Data for CustomerRegistered event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRegisteredData {
    pub customer_id: AggregateId,
    pub email_address: EmailAddress,
    pub confirmation_hash: Hash,
    pub name: PersonName,
}

/// Data for CustomerEmailAddressConfirmed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerEmailAddressConfirmedData {
    pub customer_id: AggregateId,
}

/// Data for CustomerEmailAddressConfirmationFailed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerEmailAddressConfirmationFailedData {
    pub customer_id: AggregateId,
}

/// Data for CustomerEmailAddressChanged event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerEmailAddressChangedData {
    pub customer_id: AggregateId,

    /// The new address.
    pub email_address: EmailAddress,

    /// Hash that confirms the new address.
    pub confirmation_hash: Hash,
}

/// Data for CustomerNameChanged event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerNameChangedData {
    pub customer_id: AggregateId,
    pub name: PersonName,
}

// Convenience constructors for events
impl CustomerEvent {
    pub fn customer_registered(
        customer_id: AggregateId,
        email_address: EmailAddress,
        confirmation_hash: Hash,
        name: PersonName,
    ) -> Self {
        CustomerEvent::CustomerRegistered(CustomerRegisteredData {
            customer_id,
            email_address,
            confirmation_hash,
            name,
        })
    }

    pub fn email_address_confirmed(customer_id: AggregateId) -> Self {
        CustomerEvent::CustomerEmailAddressConfirmed(CustomerEmailAddressConfirmedData {
            customer_id,
        })
    }

    pub fn email_address_confirmation_failed(customer_id: AggregateId) -> Self {
        CustomerEvent::CustomerEmailAddressConfirmationFailed(
            CustomerEmailAddressConfirmationFailedData { customer_id },
        )
    }

    pub fn email_address_changed(
        customer_id: AggregateId,
        email_address: EmailAddress,
        confirmation_hash: Hash,
    ) -> Self {
        CustomerEvent::CustomerEmailAddressChanged(CustomerEmailAddressChangedData {
            customer_id,
            email_address,
            confirmation_hash,
        })
    }

    pub fn name_changed(customer_id: AggregateId, name: PersonName) -> Self {
        CustomerEvent::CustomerNameChanged(CustomerNameChangedData { customer_id, name })
    }
}
