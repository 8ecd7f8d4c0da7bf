//! Database configuration module.
//!
//! Handles database connection and table creation using `SeaORM`. Table
//! creation uses `Schema::create_table_from_entity` so the schema is
//! generated from the entity definitions without manual SQL; any
//! `sqlx`-backed store works, with `SQLite` as the local default.

use crate::entities::{Envelope, Transaction};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/envelope_board.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates the envelope and transaction tables from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let envelope_table = schema.create_table_from_entity(Envelope);
    let transaction_table = schema.create_table_from_entity(Transaction);

    db.execute(builder.build(&envelope_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;

    Ok(())
}
