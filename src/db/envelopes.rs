//! Envelope store accessor.
//!
//! `set_balance` is the only statement anywhere in the crate that writes the
//! cached `amount` column, and `core::sync` is its only caller. Every other
//! function here handles envelope metadata; inserts always start at zero.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

use crate::entities::{Envelope, EnvelopeColumn, EnvelopeModel, envelope};
use crate::errors::{Error, Result};

/// Field values for a new envelope row.
#[derive(Debug, Clone)]
pub struct NewEnvelopeRecord {
    /// Owner of the envelope
    pub user_id: String,
    /// Short display code
    pub code: String,
    /// Display name
    pub name: String,
    /// Envelope type slug
    pub type_slug: String,
}

/// Metadata changes for an existing envelope. There is deliberately no
/// amount field here: the balance cache is written by `set_balance` alone.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeMetaChanges {
    /// New display code
    pub code: Option<String>,
    /// New display name
    pub name: Option<String>,
    /// New envelope type slug
    pub type_slug: Option<String>,
}

/// Inserts an envelope row with a zero balance.
pub async fn insert(db: &DatabaseConnection, record: NewEnvelopeRecord) -> Result<EnvelopeModel> {
    let row = envelope::ActiveModel {
        user_id: Set(record.user_id),
        code: Set(record.code),
        name: Set(record.name),
        type_slug: Set(record.type_slug),
        amount: Set(0.0),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    row.insert(db).await.map_err(Into::into)
}

/// Fetches an envelope row by id.
pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<EnvelopeModel>> {
    Envelope::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Fetches a batch of envelope rows by id.
pub async fn get_by_ids(db: &DatabaseConnection, ids: &[i64]) -> Result<Vec<EnvelopeModel>> {
    Envelope::find()
        .filter(EnvelopeColumn::Id.is_in(ids.iter().copied()))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Fetches a user's envelope by its display code, if one exists.
pub async fn get_by_code(
    db: &DatabaseConnection,
    user_id: &str,
    code: &str,
) -> Result<Option<EnvelopeModel>> {
    Envelope::find()
        .filter(EnvelopeColumn::UserId.eq(user_id))
        .filter(EnvelopeColumn::Code.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Fetches every envelope row, ordered by code ascending (board order).
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<EnvelopeModel>> {
    Envelope::find()
        .order_by_asc(EnvelopeColumn::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies metadata changes to an envelope row and returns the new row.
pub async fn update_meta(
    db: &DatabaseConnection,
    id: i64,
    changes: EnvelopeMetaChanges,
) -> Result<EnvelopeModel> {
    let mut row = envelope::ActiveModel {
        id: Set(id),
        ..Default::default()
    };

    if let Some(code) = changes.code {
        row.code = Set(code);
    }
    if let Some(name) = changes.name {
        row.name = Set(name);
    }
    if let Some(type_slug) = changes.type_slug {
        row.type_slug = Set(type_slug);
    }

    row.update(db).await.map_err(Into::into)
}

/// Deletes an envelope row; returns the number of rows removed.
pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    let result = Envelope::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
}

/// Persists a recomputed balance for an envelope.
///
/// Fails with [`Error::EnvelopeNotFound`] when the row no longer exists, so
/// a synchronization against a deleted envelope cannot silently cache a
/// balance nowhere.
pub async fn set_balance(db: &DatabaseConnection, id: i64, amount: f64) -> Result<()> {
    let result = Envelope::update_many()
        .col_expr(EnvelopeColumn::Amount, Expr::value(amount))
        .filter(EnvelopeColumn::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::EnvelopeNotFound { id });
    }

    debug!(envelope_id = id, balance = amount, "persisted envelope balance");
    Ok(())
}
