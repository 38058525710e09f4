//! Domain layer for the customer event-sourcing system.
//!
//! This crate provides:
//! - Aggregate trait with history replay
//! - DomainEvent trait for domain events
//! - Command trait and CommandHandler for command processing
//! - Customer aggregate with its reducer and service

pub mod aggregate;
pub mod command;
pub mod customer;
pub mod error;

pub use aggregate::{Aggregate, DomainEvent};
pub use command::{Command, CommandHandler, CommandResult};
pub use customer::{
    ChangeCustomerEmailAddress, ChangeCustomerName, ConfirmCustomerEmailAddress,
    ConfirmationStatus, Customer, CustomerCommand, CustomerError, CustomerEvent, CustomerService,
    CustomerState, RegisterCustomer, reduce,
};
pub use error::{DomainError, ReplayError};
