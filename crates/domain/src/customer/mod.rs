//! Customer aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod service;
mod state;

pub use aggregate::Customer;
pub use commands::*;
pub use events::{
    CustomerEmailAddressChangedData, CustomerEmailAddressConfirmationFailedData,
    CustomerEmailAddressConfirmedData, CustomerEvent, CustomerNameChangedData,
    CustomerRegisteredData,
};
pub use service::CustomerService;
pub use state::{ConfirmationStatus, CustomerState, reduce};

use common::AggregateId;
use thiserror::Error;

/// Errors that can occur during customer operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomerError {
    /// The command needs a registered customer.
    #[error("Customer {customer_id} is not registered")]
    NotRegistered { customer_id: AggregateId },

    #[error("Customer {customer_id} is already registered")]
    AlreadyRegistered { customer_id: AggregateId },

    /// The command names a different customer than the loaded state.
    #[error("Command for customer {actual} applied to customer {expected}")]
    IdentityMismatch {
        expected: AggregateId,
        actual: AggregateId,
    },
}
