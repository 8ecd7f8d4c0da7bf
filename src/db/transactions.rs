//! Transaction store accessor - CRUD over individual transaction records.
//!
//! Amounts cross this boundary as non-negative magnitudes paired with a
//! [`TransactionKind`]; signing happens in the application layer. Nothing in
//! this module touches envelope balances.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, Set, prelude::*};
use tracing::debug;

use crate::entities::{Transaction, TransactionColumn, TransactionModel, transaction};
use crate::errors::Result;
use crate::models::TransactionKind;

/// Rows fetched per request when listing the full transaction table.
pub const LIST_PAGE_SIZE: u64 = 1000;

/// Field values for a new transaction row.
#[derive(Debug, Clone)]
pub struct NewTransactionRecord {
    /// Owner of the transaction
    pub user_id: String,
    /// Calendar date
    pub date: NaiveDate,
    /// Credit or debit
    pub kind: TransactionKind,
    /// Non-negative magnitude
    pub magnitude: f64,
    /// Description text
    pub description: String,
    /// Envelope allocation, `None` for unallocated
    pub envelope_id: Option<i64>,
    /// Transfer-leg correlation id, set only by the transfer protocol
    pub transfer_group: Option<String>,
}

/// Partial update for an existing transaction row. Unset fields are left
/// untouched; `envelope_id` is tri-state (`None` = keep, `Some(None)` =
/// unallocate, `Some(Some(id))` = re-point).
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    /// New calendar date
    pub date: Option<NaiveDate>,
    /// New direction and magnitude, derived together from a signed amount
    pub kind_magnitude: Option<(TransactionKind, f64)>,
    /// New description
    pub description: Option<String>,
    /// New envelope allocation
    pub envelope_id: Option<Option<i64>>,
}

/// Inserts a transaction row, stamping `created_at`.
pub async fn insert(
    db: &DatabaseConnection,
    record: NewTransactionRecord,
) -> Result<TransactionModel> {
    let row = transaction::ActiveModel {
        user_id: Set(record.user_id),
        date: Set(record.date),
        kind: Set(record.kind),
        description: Set(record.description),
        amount: Set(record.magnitude),
        envelope_id: Set(record.envelope_id),
        transfer_group: Set(record.transfer_group),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let inserted = row.insert(db).await?;
    debug!(
        transaction_id = inserted.id,
        envelope_id = ?inserted.envelope_id,
        "inserted transaction"
    );
    Ok(inserted)
}

/// Fetches a transaction row by id.
pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<TransactionModel>> {
    Transaction::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Applies a partial update to a transaction row and returns the new row.
pub async fn update(
    db: &DatabaseConnection,
    id: i64,
    changes: TransactionChanges,
) -> Result<TransactionModel> {
    let mut row = transaction::ActiveModel {
        id: Set(id),
        ..Default::default()
    };

    if let Some(date) = changes.date {
        row.date = Set(date);
    }
    if let Some((kind, magnitude)) = changes.kind_magnitude {
        row.kind = Set(kind);
        row.amount = Set(magnitude);
    }
    if let Some(description) = changes.description {
        row.description = Set(description);
    }
    if let Some(envelope_id) = changes.envelope_id {
        row.envelope_id = Set(envelope_id);
    }

    row.update(db).await.map_err(Into::into)
}

/// Deletes one transaction row; returns the number of rows removed.
pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    let result = Transaction::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
}

/// Deletes a batch of transaction rows in one statement.
pub async fn delete_many(db: &DatabaseConnection, ids: &[i64]) -> Result<u64> {
    let result = Transaction::delete_many()
        .filter(TransactionColumn::Id.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    debug!(requested = ids.len(), deleted = result.rows_affected, "bulk-deleted transactions");
    Ok(result.rows_affected)
}

/// Reads the `(id, envelope_id)` pairs for a batch of transactions.
pub async fn envelope_refs(
    db: &DatabaseConnection,
    ids: &[i64],
) -> Result<Vec<(i64, Option<i64>)>> {
    Transaction::find()
        .select_only()
        .column(TransactionColumn::Id)
        .column(TransactionColumn::EnvelopeId)
        .filter(TransactionColumn::Id.is_in(ids.iter().copied()))
        .into_tuple::<(i64, Option<i64>)>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Points a batch of transactions at `target` (or unallocates them) in one
/// statement; returns the number of rows touched.
pub async fn set_envelope_many(
    db: &DatabaseConnection,
    ids: &[i64],
    target: Option<i64>,
) -> Result<u64> {
    let result = Transaction::update_many()
        .col_expr(TransactionColumn::EnvelopeId, Expr::value(target))
        .filter(TransactionColumn::Id.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Reads the `(magnitude, kind)` pairs of every transaction allocated to an
/// envelope. Only the two columns the balance fold needs are fetched.
pub async fn amounts_for_envelope(
    db: &DatabaseConnection,
    envelope_id: i64,
) -> Result<Vec<(f64, TransactionKind)>> {
    Transaction::find()
        .select_only()
        .column(TransactionColumn::Amount)
        .column(TransactionColumn::Kind)
        .filter(TransactionColumn::EnvelopeId.eq(envelope_id))
        .into_tuple::<(f64, TransactionKind)>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Fetches every transaction row, paging through the store
/// [`LIST_PAGE_SIZE`] rows at a time until exhausted.
///
/// Order is stable: date descending, then creation time descending.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<TransactionModel>> {
    let mut paginator = Transaction::find()
        .order_by_desc(TransactionColumn::Date)
        .order_by_desc(TransactionColumn::CreatedAt)
        .paginate(db, LIST_PAGE_SIZE);

    let mut rows = Vec::new();
    while let Some(page) = paginator.fetch_and_next().await? {
        rows.extend(page);
    }
    Ok(rows)
}
