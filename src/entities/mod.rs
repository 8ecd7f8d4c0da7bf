//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//!
//! The entities are crate-private on purpose: the cached envelope balance is
//! derived state, and keeping the active models out of the public API is what
//! guarantees that `core::sync` stays the only write path for it. Consumers
//! work with the view structs in [`crate::models`] instead.

pub(crate) mod envelope;
pub(crate) mod transaction;

// Re-export specific types to avoid conflicts
pub(crate) use envelope::{Column as EnvelopeColumn, Entity as Envelope, Model as EnvelopeModel};
pub(crate) use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
