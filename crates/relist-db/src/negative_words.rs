//! Database operations for the per-shop `negative_words` denylist.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `negative_words` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NegativeWordRow {
    pub id: i64,
    pub shop: String,
    pub word: String,
    pub created_at: DateTime<Utc>,
}

/// Inserts a denylist word. Idempotent per `(shop, word)`: re-adding an
/// existing word returns the existing row.
///
/// Words are stored lowercased and trimmed; matching at strip time is
/// case-insensitive anyway, and a canonical form keeps the unique
/// constraint meaningful.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn insert_negative_word(
    pool: &PgPool,
    shop: &str,
    word: &str,
) -> Result<NegativeWordRow, DbError> {
    let canonical = word.trim().to_lowercase();

    let row = sqlx::query_as::<_, NegativeWordRow>(
        "INSERT INTO negative_words (shop, word) \
         VALUES ($1, $2) \
         ON CONFLICT (shop, word) DO UPDATE SET word = EXCLUDED.word \
         RETURNING id, shop, word, created_at",
    )
    .bind(shop)
    .bind(&canonical)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Lists a shop's denylist entries, alphabetically by word.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_negative_words(
    pool: &PgPool,
    shop: &str,
) -> Result<Vec<NegativeWordRow>, DbError> {
    let rows = sqlx::query_as::<_, NegativeWordRow>(
        "SELECT id, shop, word, created_at FROM negative_words WHERE shop = $1 ORDER BY word",
    )
    .bind(shop)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Deletes one denylist word by id, scoped to the shop.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row was deleted, or
/// [`DbError::Sqlx`] if the statement fails.
pub async fn delete_negative_word(pool: &PgPool, shop: &str, id: i64) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM negative_words WHERE shop = $1 AND id = $2")
        .bind(shop)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
