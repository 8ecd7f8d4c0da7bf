//! Shared test utilities.
//!
//! Common helpers for setting up in-memory test databases and creating test
//! entities with sensible defaults.

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

use crate::core::{envelope, transaction};
use crate::errors::{Error, Result};
use crate::models::{self, split_signed};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A fixed calendar date for tests that don't care which day it is.
#[allow(clippy::unwrap_used)]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

/// Creates a test envelope owned by `"test_user"` of type `"essential"`.
pub async fn create_test_envelope(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
) -> Result<models::Envelope> {
    envelope::create_envelope(
        db,
        "test_user".to_string(),
        code.to_string(),
        name.to_string(),
        "essential".to_string(),
    )
    .await
}

/// Creates a test transaction dated [`test_date`].
///
/// `signed_amount` carries the direction: negative becomes a debit, positive
/// a credit, mirroring how the application layer derives kind and magnitude.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    envelope_id: Option<i64>,
    signed_amount: f64,
) -> Result<models::Transaction> {
    create_dated_transaction(db, envelope_id, signed_amount, test_date()).await
}

/// Creates a test transaction on a specific date.
pub async fn create_dated_transaction(
    db: &DatabaseConnection,
    envelope_id: Option<i64>,
    signed_amount: f64,
    date: NaiveDate,
) -> Result<models::Transaction> {
    let (kind, magnitude) = split_signed(signed_amount);

    transaction::create_transaction(
        db,
        transaction::NewTransaction {
            user_id: "test_user".to_string(),
            date,
            kind,
            amount: magnitude,
            description: "Test transaction".to_string(),
            envelope_id,
            transfer_group: None,
        },
    )
    .await
}

/// Reads the current cached balance of an envelope.
pub async fn get_envelope_amount(db: &DatabaseConnection, id: i64) -> Result<f64> {
    let envelope = envelope::get_envelope(db, id)
        .await?
        .ok_or(Error::EnvelopeNotFound { id })?;
    Ok(envelope.amount)
}

/// Sets up a complete test environment with an envelope.
/// Returns (db, envelope) for common test scenarios.
pub async fn setup_with_envelope() -> Result<(DatabaseConnection, models::Envelope)> {
    let db = setup_test_db().await?;
    let envelope = create_test_envelope(&db, "TEST", "Test Envelope").await?;
    Ok((db, envelope))
}
