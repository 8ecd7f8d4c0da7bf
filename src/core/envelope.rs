//! Envelope business logic - metadata CRUD and the transfer protocol.
//!
//! The cached balance never enters through this module: envelopes are
//! created at zero, [`UpdateEnvelopeArgs`] has no amount field, and a
//! transfer moves value by creating two transactions and letting the
//! transaction service's synchronization update both balances.

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::envelopes::EnvelopeConfig;
use crate::core::transaction::{NewTransaction, create_transaction};
use crate::db::envelopes::{EnvelopeMetaChanges, NewEnvelopeRecord};
use crate::errors::{Error, Result};
use crate::models::{self, TransactionKind};

/// Balances whose absolute value is below this are treated as zero when
/// deciding whether an envelope may be deleted.
pub const BALANCE_EPSILON: f64 = 0.01;

/// Metadata changes for [`update_envelope`]. The balance is a derived value
/// and deliberately cannot be expressed here.
#[derive(Debug, Clone, Default)]
pub struct UpdateEnvelopeArgs {
    /// New display code
    pub code: Option<String>,
    /// New display name
    pub name: Option<String>,
    /// New envelope type slug
    pub type_slug: Option<String>,
}

impl UpdateEnvelopeArgs {
    fn is_empty(&self) -> bool {
        self.code.is_none() && self.name.is_none() && self.type_slug.is_none()
    }
}

fn validated(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

/// Creates an envelope with a zero balance.
///
/// The balance is never caller-supplied: no transactions reference a new
/// envelope, so its derived balance is zero by definition.
pub async fn create_envelope(
    db: &DatabaseConnection,
    user_id: String,
    code: String,
    name: String,
    type_slug: String,
) -> Result<models::Envelope> {
    let code = validated("code", &code)?;
    let name = validated("name", &name)?;
    let type_slug = validated("type_slug", &type_slug)?;

    let row = crate::db::envelopes::insert(
        db,
        NewEnvelopeRecord {
            user_id,
            code,
            name,
            type_slug,
        },
    )
    .await?;

    Ok(row.into())
}

/// Fetches one envelope.
pub async fn get_envelope(db: &DatabaseConnection, id: i64) -> Result<Option<models::Envelope>> {
    Ok(crate::db::envelopes::get_by_id(db, id).await?.map(Into::into))
}

/// Lists every envelope in board order (code ascending).
pub async fn get_all_envelopes(db: &DatabaseConnection) -> Result<Vec<models::Envelope>> {
    let rows = crate::db::envelopes::list_all(db).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Updates envelope metadata (code, name, type).
pub async fn update_envelope(
    db: &DatabaseConnection,
    id: i64,
    args: UpdateEnvelopeArgs,
) -> Result<models::Envelope> {
    let current = crate::db::envelopes::get_by_id(db, id)
        .await?
        .ok_or(Error::EnvelopeNotFound { id })?;

    if args.is_empty() {
        return Ok(current.into());
    }

    let changes = EnvelopeMetaChanges {
        code: args.code.as_deref().map(|v| validated("code", v)).transpose()?,
        name: args.name.as_deref().map(|v| validated("name", v)).transpose()?,
        type_slug: args
            .type_slug
            .as_deref()
            .map(|v| validated("type_slug", v))
            .transpose()?,
    };

    let updated = crate::db::envelopes::update_meta(db, id, changes).await?;
    Ok(updated.into())
}

/// Deletes an envelope, provided its balance has been drained.
///
/// Deleting an envelope that still holds value would destroy unreconciled
/// history, so any balance at or above [`BALANCE_EPSILON`] in absolute value
/// is rejected with [`Error::EnvelopeNotEmpty`]. The guard lives here rather
/// than in the calling UI so no caller can bypass it.
pub async fn delete_envelope(db: &DatabaseConnection, id: i64) -> Result<()> {
    let envelope = crate::db::envelopes::get_by_id(db, id)
        .await?
        .ok_or(Error::EnvelopeNotFound { id })?;

    if envelope.amount.abs() >= BALANCE_EPSILON {
        return Err(Error::EnvelopeNotEmpty {
            id,
            balance: envelope.amount,
        });
    }

    crate::db::envelopes::delete(db, id).await?;
    info!(envelope_id = id, code = %envelope.code, "deleted envelope");
    Ok(())
}

/// Moves value between two envelopes by creating a debit leg on the source
/// and a credit leg on the destination, both dated today.
///
/// Each leg goes through [`create_transaction`], which synchronizes the leg's
/// envelope; this function never writes a balance itself. The two inserts are
/// independent statements, so a failure after the first leg leaves a
/// half-transfer behind: the shared `transfer_group` id on the surviving leg
/// is what makes that state detectable and repairable.
pub async fn transfer(
    db: &DatabaseConnection,
    user_id: String,
    from_envelope_id: i64,
    to_envelope_id: i64,
    amount: f64,
) -> Result<()> {
    if amount <= 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    if from_envelope_id == to_envelope_id {
        return Err(Error::SameEnvelopeTransfer {
            id: from_envelope_id,
        });
    }

    let envelopes =
        crate::db::envelopes::get_by_ids(db, &[from_envelope_id, to_envelope_id]).await?;
    let from = envelopes
        .iter()
        .find(|e| e.id == from_envelope_id)
        .ok_or(Error::EnvelopeNotFound {
            id: from_envelope_id,
        })?;
    let to = envelopes
        .iter()
        .find(|e| e.id == to_envelope_id)
        .ok_or(Error::EnvelopeNotFound { id: to_envelope_id })?;

    let today = Utc::now().date_naive();
    let transfer_group = Uuid::new_v4().to_string();

    create_transaction(
        db,
        NewTransaction {
            user_id: user_id.clone(),
            date: today,
            kind: TransactionKind::Debit,
            amount,
            description: format!("Transfer to: {} - {}", to.code, to.name),
            envelope_id: Some(from_envelope_id),
            transfer_group: Some(transfer_group.clone()),
        },
    )
    .await?;

    create_transaction(
        db,
        NewTransaction {
            user_id,
            date: today,
            kind: TransactionKind::Credit,
            amount,
            description: format!("Transfer from: {} - {}", from.code, from.name),
            envelope_id: Some(to_envelope_id),
            transfer_group: Some(transfer_group.clone()),
        },
    )
    .await?;

    info!(
        from = from_envelope_id,
        to = to_envelope_id,
        amount,
        transfer_group = %transfer_group,
        "transfer completed"
    );
    Ok(())
}

/// Creates any configured envelope that does not already exist for the user.
///
/// Existing envelopes (matched by code) are skipped untouched; in particular
/// their balances are never reset.
pub async fn seed_initial_envelopes(
    db: &DatabaseConnection,
    user_id: &str,
    configs: &[EnvelopeConfig],
) -> Result<()> {
    for config in configs {
        let existing = crate::db::envelopes::get_by_code(db, user_id, &config.code).await?;
        if existing.is_some() {
            warn!(code = %config.code, "envelope already exists, skipping seed");
            continue;
        }

        create_envelope(
            db,
            user_id.to_string(),
            config.code.clone(),
            config.name.clone(),
            config.type_slug.clone(),
        )
        .await?;
        info!(code = %config.code, "seeded envelope");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::transaction::list_transactions;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_envelope_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_envelope(
            &db,
            "test_user".to_string(),
            String::new(),
            "Groceries".to_string(),
            "essential".to_string(),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::EmptyField { field: "code" }
        ));

        let result = create_envelope(
            &db,
            "test_user".to_string(),
            "GROC".to_string(),
            "   ".to_string(),
            "essential".to_string(),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::EmptyField { field: "name" }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_envelope_starts_at_zero() -> Result<()> {
        let db = setup_test_db().await?;

        let envelope = create_envelope(
            &db,
            "test_user".to_string(),
            "  GROC ".to_string(),
            "Groceries".to_string(),
            "essential".to_string(),
        )
        .await?;

        assert_eq!(envelope.code, "GROC");
        assert_eq!(envelope.name, "Groceries");
        assert_eq!(envelope.amount, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_envelope_metadata_preserves_balance() -> Result<()> {
        let (db, envelope) = setup_with_envelope().await?;
        create_test_transaction(&db, Some(envelope.id), 33.0).await?;

        let updated = update_envelope(
            &db,
            envelope.id,
            UpdateEnvelopeArgs {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.code, envelope.code);
        assert_eq!(updated.amount, 33.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_envelope_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_envelope(&db, 999, UpdateEnvelopeArgs::default()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::EnvelopeNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_envelope_guard() -> Result<()> {
        let (db, envelope) = setup_with_envelope().await?;

        // A real balance blocks deletion.
        crate::db::envelopes::set_balance(&db, envelope.id, 5.0).await?;
        let result = delete_envelope(&db, envelope.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::EnvelopeNotEmpty { id: _, balance: _ }
        ));

        // A sub-epsilon residue does not.
        crate::db::envelopes::set_balance(&db, envelope.id, 0.004).await?;
        delete_envelope(&db, envelope.id).await?;

        assert!(get_envelope(&db, envelope.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_envelope_unallocates_transactions() -> Result<()> {
        let (db, envelope) = setup_with_envelope().await?;

        create_test_transaction(&db, Some(envelope.id), 30.0).await?;
        create_test_transaction(&db, Some(envelope.id), -30.0).await?;
        assert_eq!(get_envelope_amount(&db, envelope.id).await?, 0.0);

        delete_envelope(&db, envelope.id).await?;

        // History survives the envelope; the rows are now unallocated.
        let remaining = list_transactions(&db).await?;
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|tx| tx.envelope_id.is_none()));

        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_correctness() -> Result<()> {
        let db = setup_test_db().await?;
        let envelope_a = create_test_envelope(&db, "AAAA", "Envelope A").await?;
        let envelope_b = create_test_envelope(&db, "BBBB", "Envelope B").await?;

        create_test_transaction(&db, Some(envelope_a.id), 50.0).await?;

        transfer(&db, "test_user".to_string(), envelope_a.id, envelope_b.id, 100.0).await?;

        assert_eq!(get_envelope_amount(&db, envelope_a.id).await?, -50.0);
        assert_eq!(get_envelope_amount(&db, envelope_b.id).await?, 100.0);

        let legs: Vec<_> = list_transactions(&db)
            .await?
            .into_iter()
            .filter(|tx| tx.transfer_group.is_some())
            .collect();
        assert_eq!(legs.len(), 2);

        let debit = legs
            .iter()
            .find(|tx| tx.kind == TransactionKind::Debit)
            .unwrap();
        let credit = legs
            .iter()
            .find(|tx| tx.kind == TransactionKind::Credit)
            .unwrap();

        assert_eq!(debit.envelope_id, Some(envelope_a.id));
        assert_eq!(debit.amount, -100.0);
        assert_eq!(debit.description, "Transfer to: BBBB - Envelope B");

        assert_eq!(credit.envelope_id, Some(envelope_b.id));
        assert_eq!(credit.amount, 100.0);
        assert_eq!(credit.description, "Transfer from: AAAA - Envelope A");

        // Both legs carry the same correlation id.
        assert_eq!(debit.transfer_group, credit.transfer_group);

        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for amount in [0.0, -25.0, f64::NAN] {
            let result = transfer(&db, "test_user".to_string(), 1, 2, amount).await;
            assert!(matches!(
                result.unwrap_err(),
                Error::InvalidAmount { amount: _ }
            ));
        }

        let result = transfer(&db, "test_user".to_string(), 1, 1, 10.0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::SameEnvelopeTransfer { id: 1 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_missing_envelope_creates_no_legs() -> Result<()> {
        let (db, envelope) = setup_with_envelope().await?;

        let result = transfer(&db, "test_user".to_string(), envelope.id, 999, 10.0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::EnvelopeNotFound { id: 999 }
        ));

        // The whole transfer failed before either leg was written.
        assert!(list_transactions(&db).await?.is_empty());
        assert_eq!(get_envelope_amount(&db, envelope.id).await?, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_envelopes_ordered_by_code() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_envelope(&db, "ZZZZ", "Last").await?;
        create_test_envelope(&db, "AAAA", "First").await?;
        create_test_envelope(&db, "MMMM", "Middle").await?;

        let envelopes = get_all_envelopes(&db).await?;
        let codes: Vec<&str> = envelopes.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["AAAA", "MMMM", "ZZZZ"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_initial_envelopes() -> Result<()> {
        let db = setup_test_db().await?;

        let configs = vec![
            EnvelopeConfig {
                code: "GROC".to_string(),
                name: "Groceries".to_string(),
                type_slug: "essential".to_string(),
            },
            EnvelopeConfig {
                code: "FUN".to_string(),
                name: "Fun Money".to_string(),
                type_slug: "leisure".to_string(),
            },
        ];

        seed_initial_envelopes(&db, "test_user", &configs).await?;
        assert_eq!(get_all_envelopes(&db).await?.len(), 2);

        // Accumulate a balance, then seed again: nothing is reset.
        let groceries = crate::db::envelopes::get_by_code(&db, "test_user", "GROC")
            .await?
            .unwrap();
        create_test_transaction(&db, Some(groceries.id), 75.0).await?;

        seed_initial_envelopes(&db, "test_user", &configs).await?;
        assert_eq!(get_all_envelopes(&db).await?.len(), 2);
        assert_eq!(get_envelope_amount(&db, groceries.id).await?, 75.0);

        Ok(())
    }
}
