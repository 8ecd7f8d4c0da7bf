//! Core business logic - framework-agnostic envelope and transaction
//! operations.
//!
//! Services are plain async functions over a [`sea_orm::DatabaseConnection`].
//! Transaction mutations flow through [`transaction`], which hands every
//! affected envelope to [`sync`] for balance recomputation; [`envelope`]
//! owns envelope metadata and the transfer protocol.

pub mod envelope;
pub mod sync;
pub mod transaction;
