//! Application-layer data model.
//!
//! The store keeps transaction amounts as non-negative magnitudes with a
//! separate credit/debit kind; everything above the store works with signed
//! amounts (credit positive, debit negative). The conversions in this module
//! are the only place the two representations meet: [`TransactionKind::signed`]
//! derives the signed amount on every read and [`split_signed`] derives the
//! `(kind, magnitude)` pair on every write, so sign is never stored twice.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entities::{envelope, transaction};

/// Direction of a transaction, persisted as `"credit"` or `"debit"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionKind {
    /// Money entering the envelope; signed amount is positive.
    #[sea_orm(string_value = "credit")]
    Credit,
    /// Money leaving the envelope; signed amount is negative.
    #[sea_orm(string_value = "debit")]
    Debit,
}

impl TransactionKind {
    /// Derives the signed amount for a stored magnitude.
    #[must_use]
    pub fn signed(self, magnitude: f64) -> f64 {
        match self {
            Self::Credit => magnitude,
            Self::Debit => -magnitude,
        }
    }
}

/// Derives the `(kind, magnitude)` pair for a signed amount.
///
/// Zero and positive amounts map to credit; the magnitude is always
/// non-negative, which is the persistence-boundary invariant.
#[must_use]
pub fn split_signed(amount: f64) -> (TransactionKind, f64) {
    if amount < 0.0 {
        (TransactionKind::Debit, -amount)
    } else {
        (TransactionKind::Credit, amount)
    }
}

/// Rounds a monetary value to two decimal places.
///
/// Rounding mode is half-away-from-zero: `0.005` becomes `0.01` and `-0.005`
/// becomes `-0.01`. Every balance the synchronizer persists goes through
/// this function.
#[must_use]
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// A transaction as consumers of the core see it: `amount` is signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: i64,
    /// Owner reference; authentication is handled by an external collaborator
    pub user_id: String,
    /// Calendar date of the transaction (no time component)
    pub date: NaiveDate,
    /// Credit or debit
    pub kind: TransactionKind,
    /// Human-readable description
    pub description: String,
    /// Signed amount: positive for credit, negative for debit
    pub amount: f64,
    /// Envelope this transaction is allocated to, `None` when unallocated
    pub envelope_id: Option<i64>,
    /// Identifier shared by the two legs of an envelope transfer
    pub transfer_group: Option<String>,
    /// When the record was created; set once at insert
    pub created_at: DateTime<Utc>,
}

impl From<transaction::Model> for Transaction {
    fn from(row: transaction::Model) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            kind: row.kind,
            description: row.description,
            amount: row.kind.signed(row.amount),
            envelope_id: row.envelope_id,
            transfer_group: row.transfer_group,
            created_at: row.created_at,
        }
    }
}

/// An envelope as consumers of the core see it.
///
/// `amount` is the cached balance maintained by the synchronizer; it is a
/// derived value and this type offers no way to write it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Unique identifier
    pub id: i64,
    /// Owner reference
    pub user_id: String,
    /// Short display code, conventionally uppercase
    pub code: String,
    /// Display name
    pub name: String,
    /// Slug of the envelope type this envelope is grouped under
    pub type_slug: String,
    /// Cached balance, rounded to two decimals
    pub amount: f64,
    /// When the envelope was created
    pub created_at: DateTime<Utc>,
}

impl From<envelope::Model> for Envelope {
    fn from(row: envelope::Model) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            code: row.code,
            name: row.name,
            type_slug: row.type_slug,
            amount: row.amount,
            created_at: row.created_at,
        }
    }
}
