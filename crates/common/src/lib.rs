//! Shared types for the customer workspace.
//!
//! - [`AggregateId`] identifies an event stream
//! - [`EmailAddress`], [`Hash`] and [`PersonName`] are validated value objects

pub mod types;
pub mod values;

pub use types::AggregateId;
pub use values::{EmailAddress, Hash, PersonName, ValueError};
