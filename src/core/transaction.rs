//! Transaction business logic - Handles all transaction-related operations.
//!
//! Every mutation here computes its synchronization set: the distinct
//! envelopes whose cached balance the mutation may have changed. After the
//! store write, each member is handed to [`crate::core::sync`] exactly once.
//! The store offers no multi-statement transactions, so a failure between
//! the write and the synchronization leaves a balance stale rather than
//! rolling back; the next mutation touching that envelope heals it. Such
//! failures are logged and propagated, never swallowed.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{error, info};

use crate::db::transactions::{NewTransactionRecord, TransactionChanges};
use crate::errors::{Error, Result};
use crate::models::{self, TransactionKind, split_signed};

/// Arguments for [`create_transaction`].
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Owner of the transaction
    pub user_id: String,
    /// Calendar date
    pub date: NaiveDate,
    /// Credit or debit
    pub kind: TransactionKind,
    /// Magnitude; must be nonzero and finite, stored as its absolute value
    pub amount: f64,
    /// Description; must not be empty
    pub description: String,
    /// Envelope to allocate to, `None` for unallocated
    pub envelope_id: Option<i64>,
    /// Correlation id linking transfer legs; `None` everywhere else
    pub transfer_group: Option<String>,
}

/// Partial update for [`update_transaction`]. `amount` is signed: its sign
/// selects the new kind and its absolute value the new magnitude, so the
/// pair can never disagree. `envelope_id` is tri-state: `None` keeps the
/// current allocation, `Some(None)` unallocates, `Some(Some(id))` re-points.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransaction {
    /// New calendar date
    pub date: Option<NaiveDate>,
    /// New signed amount
    pub amount: Option<f64>,
    /// New description
    pub description: Option<String>,
    /// New envelope allocation
    pub envelope_id: Option<Option<i64>>,
}

impl UpdateTransaction {
    fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.envelope_id.is_none()
    }
}

/// Synchronizes every envelope in the set once, deduplicated.
///
/// `BTreeSet` keeps the iteration order deterministic; order among
/// independent envelopes does not matter for correctness.
async fn sync_envelopes<I>(db: &DatabaseConnection, envelope_ids: I) -> Result<()>
where
    I: IntoIterator<Item = Option<i64>>,
{
    let set: BTreeSet<i64> = envelope_ids.into_iter().flatten().collect();
    for envelope_id in set {
        crate::core::sync::sync_envelope_balance(db, Some(envelope_id))
            .await
            .inspect_err(|e| error!(envelope_id, "balance synchronization failed: {e}"))?;
    }
    Ok(())
}

/// Creates a transaction and synchronizes its envelope, if any.
pub async fn create_transaction(
    db: &DatabaseConnection,
    args: NewTransaction,
) -> Result<models::Transaction> {
    if args.amount == 0.0 || !args.amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: args.amount,
        });
    }
    if args.description.trim().is_empty() {
        return Err(Error::EmptyDescription);
    }

    let row = crate::db::transactions::insert(
        db,
        NewTransactionRecord {
            user_id: args.user_id,
            date: args.date,
            kind: args.kind,
            magnitude: args.amount.abs(),
            description: args.description,
            envelope_id: args.envelope_id,
            transfer_group: args.transfer_group,
        },
    )
    .await?;

    sync_envelopes(db, [row.envelope_id]).await?;

    Ok(row.into())
}

/// Applies a partial update to a transaction.
///
/// The current envelope reference is read before the write: when the update
/// re-points the transaction, both the old and the new envelope belong to
/// the synchronization set. A magnitude or kind change alone still resyncs
/// the one envelope in scope.
pub async fn update_transaction(
    db: &DatabaseConnection,
    id: i64,
    args: UpdateTransaction,
) -> Result<models::Transaction> {
    let current = crate::db::transactions::get_by_id(db, id)
        .await?
        .ok_or(Error::TransactionNotFound { id })?;

    if args.is_empty() {
        return Ok(current.into());
    }

    if let Some(amount) = args.amount {
        if amount == 0.0 || !amount.is_finite() {
            return Err(Error::InvalidAmount { amount });
        }
    }
    if let Some(description) = &args.description {
        if description.trim().is_empty() {
            return Err(Error::EmptyDescription);
        }
    }

    let updated = crate::db::transactions::update(
        db,
        id,
        TransactionChanges {
            date: args.date,
            kind_magnitude: args.amount.map(split_signed),
            description: args.description,
            envelope_id: args.envelope_id,
        },
    )
    .await?;

    sync_envelopes(db, [current.envelope_id, updated.envelope_id]).await?;

    Ok(updated.into())
}

/// Deletes a transaction and synchronizes the envelope it pointed at.
pub async fn delete_transaction(db: &DatabaseConnection, id: i64) -> Result<()> {
    let current = crate::db::transactions::get_by_id(db, id)
        .await?
        .ok_or(Error::TransactionNotFound { id })?;

    crate::db::transactions::delete(db, id).await?;

    sync_envelopes(db, [current.envelope_id]).await
}

/// Deletes a batch of transactions, then synchronizes each distinct
/// envelope the batch referenced exactly once.
pub async fn bulk_delete_transactions(db: &DatabaseConnection, ids: &[i64]) -> Result<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let refs = crate::db::transactions::envelope_refs(db, ids).await?;
    let deleted = crate::db::transactions::delete_many(db, ids).await?;
    info!(deleted, "bulk delete completed");

    sync_envelopes(db, refs.into_iter().map(|(_, envelope_id)| envelope_id)).await
}

/// Re-points one transaction at `target` (or unallocates it with `None`),
/// synchronizing the old and new envelopes.
pub async fn set_transaction_envelope(
    db: &DatabaseConnection,
    id: i64,
    target: Option<i64>,
) -> Result<()> {
    let current = crate::db::transactions::get_by_id(db, id)
        .await?
        .ok_or(Error::TransactionNotFound { id })?;

    crate::db::transactions::update(
        db,
        id,
        TransactionChanges {
            envelope_id: Some(target),
            ..Default::default()
        },
    )
    .await?;

    sync_envelopes(db, [current.envelope_id, target]).await
}

/// Re-points a batch of transactions at `target` (or unallocates them),
/// synchronizing every envelope that gained or lost a member once.
pub async fn bulk_set_transaction_envelope(
    db: &DatabaseConnection,
    ids: &[i64],
    target: Option<i64>,
) -> Result<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let refs = crate::db::transactions::envelope_refs(db, ids).await?;
    let updated = crate::db::transactions::set_envelope_many(db, ids, target).await?;
    info!(updated, target = ?target, "bulk envelope reassignment completed");

    let affected = refs
        .into_iter()
        .map(|(_, envelope_id)| envelope_id)
        .chain([target]);
    sync_envelopes(db, affected).await
}

/// Lists every transaction in signed representation.
///
/// The store is paged through transparently; the result is complete and
/// ordered by date descending, then creation time descending.
pub async fn list_transactions(db: &DatabaseConnection) -> Result<Vec<models::Transaction>> {
    let rows = crate::db::transactions::list_all(db).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}
