//! Unified error types and result handling.

use thiserror::Error;

/// Errors produced by the envelope board core.
#[derive(Debug, Error)]
pub enum Error {
    /// A transaction or transfer amount was zero, negative where a positive
    /// magnitude is required, or not finite.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A transaction description was empty or whitespace-only.
    #[error("Transaction description cannot be empty")]
    EmptyDescription,

    /// A required text field (envelope code or name) was empty.
    #[error("Field '{field}' cannot be empty")]
    EmptyField {
        /// Name of the offending field
        field: &'static str,
    },

    /// The referenced envelope does not exist.
    #[error("Envelope {id} not found")]
    EnvelopeNotFound {
        /// The envelope id that failed to resolve
        id: i64,
    },

    /// The referenced transaction does not exist.
    #[error("Transaction {id} not found")]
    TransactionNotFound {
        /// The transaction id that failed to resolve
        id: i64,
    },

    /// Deleting an envelope whose balance has not been drained to zero would
    /// destroy unreconciled value.
    #[error("Envelope {id} still holds {balance:.2}; empty it before deleting")]
    EnvelopeNotEmpty {
        /// The envelope id
        id: i64,
        /// The current cached balance
        balance: f64,
    },

    /// A transfer named the same envelope as both source and destination.
    #[error("Cannot transfer from envelope {id} to itself")]
    SameEnvelopeTransfer {
        /// The envelope id used on both sides
        id: i64,
    },

    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Database error from the persistence layer, bubbled unmodified.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
