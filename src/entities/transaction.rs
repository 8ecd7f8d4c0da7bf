//! Transaction entity - Represents all financial transactions in the system.
//!
//! The `amount` column is a non-negative magnitude; direction comes from
//! `kind` ("credit"/"debit") and the signed value is derived in the
//! application layer on every read. `envelope_id` is nullable: a transaction
//! with no envelope is unallocated and excluded from every balance sum. The
//! two legs of an envelope transfer share a `transfer_group` identifier.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::TransactionKind;

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the transaction
    pub user_id: String,
    /// Calendar date of the transaction (no time component)
    pub date: Date,
    /// Credit or debit; the stored magnitude is signed through this
    pub kind: TransactionKind,
    /// Human-readable description of the transaction
    pub description: String,
    /// Non-negative magnitude; sign is derived from `kind`
    pub amount: f64,
    /// Envelope this transaction is allocated to, NULL when unallocated
    pub envelope_id: Option<i64>,
    /// Shared identifier linking the two legs of a transfer
    pub transfer_group: Option<String>,
    /// When the transaction was created; set once at insert
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each allocated transaction belongs to one envelope; deleting the
    /// envelope leaves its transactions unallocated rather than orphaned
    #[sea_orm(
        belongs_to = "super::envelope::Entity",
        from = "Column::EnvelopeId",
        to = "super::envelope::Column::Id",
        on_delete = "SetNull"
    )]
    Envelope,
}

impl Related<super::envelope::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Envelope.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
