//! Envelope entity - Represents a named budget bucket with a cached balance.
//!
//! Each envelope has a short code, a display name, and the slug of the
//! envelope type it is grouped under. The `amount` column is a cache of the
//! signed sum of all transactions referencing the envelope; it is recomputed
//! by `core::sync` after every transaction mutation and never written from
//! anywhere else.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Envelope database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "envelopes")]
pub struct Model {
    /// Unique identifier for the envelope
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the envelope; authentication lives outside this core
    pub user_id: String,
    /// Short display code (e.g., "GROC"), conventionally uppercase
    pub code: String,
    /// Human-readable name of the envelope (e.g., "Groceries")
    pub name: String,
    /// Slug of the envelope type used to group envelopes on the board
    pub type_slug: String,
    /// Cached balance: signed sum of referencing transactions, 2 decimals
    pub amount: f64,
    /// When the envelope was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Envelope and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One envelope has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
