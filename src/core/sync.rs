//! Envelope balance synchronizer.
//!
//! The stored envelope balance is a materialized view: the signed sum of
//! every transaction referencing the envelope, rounded to cents. This module
//! recomputes that view from scratch and persists it through the crate's
//! single balance-write path. Recomputing from scratch is what makes the
//! operation idempotent and self-healing: a stale or superseded balance is
//! corrected by whichever synchronization runs next.

use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::errors::Result;
use crate::models::round_to_cents;

/// Recomputes and persists the balance of one envelope.
///
/// `None` is a no-op: unallocated transactions have nothing to reconcile.
/// The transaction read happens before any write, so a failed read leaves
/// the previous balance untouched.
pub async fn sync_envelope_balance(
    db: &DatabaseConnection,
    envelope_id: Option<i64>,
) -> Result<()> {
    let Some(envelope_id) = envelope_id else {
        return Ok(());
    };

    let amounts = crate::db::transactions::amounts_for_envelope(db, envelope_id).await?;

    let total: f64 = amounts
        .iter()
        .map(|&(magnitude, kind)| kind.signed(magnitude))
        .sum();
    let balance = round_to_cents(total);

    crate::db::envelopes::set_balance(db, envelope_id, balance).await?;

    debug!(
        envelope_id,
        balance,
        transactions = amounts.len(),
        "synchronized envelope balance"
    );
    Ok(())
}
