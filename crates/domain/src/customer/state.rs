//! Customer state and the reducer that evolves it.

use common::{AggregateId, EmailAddress, Hash, PersonName};

use super::CustomerEvent;

/// Confirmation status of the current email address.
///
/// Every email address starts its own confirmation epoch:
/// ```text
/// Registered / EmailAddressChanged ──► Unconfirmed ──► Confirmed
///                                          ▲               │
///                                          └─EmailChanged──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConfirmationStatus {
    #[default]
    Unconfirmed,
    Confirmed,
}

impl ConfirmationStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ConfirmationStatus::Confirmed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationStatus::Unconfirmed => "Unconfirmed",
            ConfirmationStatus::Confirmed => "Confirmed",
        }
    }
}

impl std::fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a registered customer.
///
/// `confirmation_hash` always belongs to `email_address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerState {
    pub customer_id: AggregateId,
    pub email_address: EmailAddress,
    pub confirmation_hash: Hash,
    pub confirmation: ConfirmationStatus,
    pub name: PersonName,
}

impl CustomerState {
    pub fn is_email_address_confirmed(&self) -> bool {
        self.confirmation.is_confirmed()
    }
}

/// Folds one event into the state. `None` is the unregistered state.
///
/// Total and pure. Events other than `CustomerRegistered` leave an
/// unregistered state unregistered.
pub fn reduce(state: Option<CustomerState>, event: &CustomerEvent) -> Option<CustomerState> {
    match event {
        CustomerEvent::CustomerRegistered(data) => Some(CustomerState {
            customer_id: data.customer_id.clone(),
            email_address: data.email_address.clone(),
            confirmation_hash: data.confirmation_hash.clone(),
            confirmation: ConfirmationStatus::Unconfirmed,
            name: data.name.clone(),
        }),
        CustomerEvent::CustomerEmailAddressConfirmed(_) => state.map(|state| CustomerState {
            confirmation: ConfirmationStatus::Confirmed,
            ..state
        }),
        CustomerEvent::CustomerEmailAddressConfirmationFailed(_) => state,
        CustomerEvent::CustomerEmailAddressChanged(data) => state.map(|state| CustomerState {
            email_address: data.email_address.clone(),
            confirmation_hash: data.confirmation_hash.clone(),
            confirmation: ConfirmationStatus::Unconfirmed,
            ..state
        }),
        CustomerEvent::CustomerNameChanged(data) => state.map(|state| CustomerState {
            name: data.name.clone(),
            ..state
        }),
    }
}
