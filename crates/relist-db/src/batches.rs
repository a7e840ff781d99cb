//! Database operations for the `import_batches` ledger.
//!
//! The ledger is a coarse two-checkpoint record: a batch row is written
//! once at the start of a publish run (already in `processing`, with
//! `total_products` pre-set and the settings snapshotted), and exactly
//! once more at the end with the final counts. No intermediate progress
//! is persisted, so a crash mid-run leaves the row in `processing`
//! permanently — that is the audit trail of an interrupted run, not a
//! state to be reconciled automatically.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use relist_core::StoreSettings;

use crate::DbError;

/// A row from the `import_batches` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImportBatchRow {
    pub id: i64,
    pub public_id: Uuid,
    pub shop: String,
    /// `pending`, `processing`, `completed`, or `failed`.
    pub status: String,
    pub total_products: i32,
    pub imported_products: i32,
    pub failed_products: i32,
    /// JSON array of the source URLs submitted for this run.
    pub source_urls: serde_json::Value,
    /// [`StoreSettings`] as they were when the run started.
    pub settings_snapshot: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

const ALL_COLUMNS: &str = "id, public_id, shop, status, total_products, imported_products, \
     failed_products, source_urls, settings_snapshot, created_at, completed_at";

/// Opens a batch in `processing` state with `total_products` pre-set
/// and the run's settings snapshotted. Returns the new row.
///
/// # Errors
///
/// Returns [`DbError::Serialize`] if the snapshot cannot be serialized,
/// or [`DbError::Sqlx`] if the insert fails.
pub async fn start_import_batch(
    pool: &PgPool,
    shop: &str,
    total_products: i32,
    source_urls: &[String],
    settings: &StoreSettings,
) -> Result<ImportBatchRow, DbError> {
    let public_id = Uuid::new_v4();
    let source_urls = serde_json::to_value(source_urls)?;
    let snapshot = serde_json::to_value(settings)?;

    let row = sqlx::query_as::<_, ImportBatchRow>(&format!(
        "INSERT INTO import_batches \
             (public_id, shop, status, total_products, source_urls, settings_snapshot) \
         VALUES ($1, $2, 'processing', $3, $4::jsonb, $5::jsonb) \
         RETURNING {ALL_COLUMNS}"
    ))
    .bind(public_id)
    .bind(shop)
    .bind(total_products)
    .bind(source_urls)
    .bind(snapshot)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Closes a batch: flips `processing` → `completed` with the final
/// counts and stamps `completed_at`.
///
/// # Errors
///
/// Returns [`DbError::InvalidBatchTransition`] if the row is not in
/// `processing` (already completed, failed, or missing), or
/// [`DbError::Sqlx`] if the update fails.
pub async fn complete_import_batch(
    pool: &PgPool,
    id: i64,
    imported: i32,
    failed: i32,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE import_batches \
         SET status = 'completed', imported_products = $1, failed_products = $2, \
             completed_at = NOW() \
         WHERE id = $3 AND status = 'processing'",
    )
    .bind(imported)
    .bind(failed)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidBatchTransition {
            id,
            expected_status: "processing",
        });
    }
    Ok(())
}

/// Marks a batch as `failed` and stamps `completed_at`. Used when the
/// run dies before the publisher produced any counts.
///
/// # Errors
///
/// Returns [`DbError::InvalidBatchTransition`] if the row is not in
/// `processing`, or [`DbError::Sqlx`] if the update fails.
pub async fn fail_import_batch(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE import_batches \
         SET status = 'failed', completed_at = NOW() \
         WHERE id = $1 AND status = 'processing'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidBatchTransition {
            id,
            expected_status: "processing",
        });
    }
    Ok(())
}

/// Fetches a single batch by id, scoped to the shop.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no such batch exists, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_import_batch(
    pool: &PgPool,
    shop: &str,
    id: i64,
) -> Result<ImportBatchRow, DbError> {
    let row = sqlx::query_as::<_, ImportBatchRow>(&format!(
        "SELECT {ALL_COLUMNS} FROM import_batches WHERE shop = $1 AND id = $2"
    ))
    .bind(shop)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns the most recent `limit` batches for a shop, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_import_batches(
    pool: &PgPool,
    shop: &str,
    limit: i64,
) -> Result<Vec<ImportBatchRow>, DbError> {
    let rows = sqlx::query_as::<_, ImportBatchRow>(&format!(
        "SELECT {ALL_COLUMNS} FROM import_batches \
         WHERE shop = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2"
    ))
    .bind(shop)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
