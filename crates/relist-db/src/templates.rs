//! Database operations for per-shop `prompt_templates`.
//!
//! Templates are referenced by id at optimization time and deletable
//! independently of in-flight batches — batches snapshot settings, not
//! template text, so editing or deleting a template never rewrites
//! batch history.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `prompt_templates` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PromptTemplateRow {
    pub id: i64,
    pub shop: String,
    pub name: String,
    pub title_prompt: Option<String>,
    pub description_prompt: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Inserts a template and returns the new row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including a unique
/// violation on `(shop, name)`).
pub async fn insert_prompt_template(
    pool: &PgPool,
    shop: &str,
    name: &str,
    title_prompt: Option<&str>,
    description_prompt: Option<&str>,
) -> Result<PromptTemplateRow, DbError> {
    let row = sqlx::query_as::<_, PromptTemplateRow>(
        "INSERT INTO prompt_templates (shop, name, title_prompt, description_prompt) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, shop, name, title_prompt, description_prompt, created_at",
    )
    .bind(shop)
    .bind(name)
    .bind(title_prompt)
    .bind(description_prompt)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Lists a shop's templates, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_prompt_templates(
    pool: &PgPool,
    shop: &str,
) -> Result<Vec<PromptTemplateRow>, DbError> {
    let rows = sqlx::query_as::<_, PromptTemplateRow>(
        "SELECT id, shop, name, title_prompt, description_prompt, created_at \
         FROM prompt_templates \
         WHERE shop = $1 \
         ORDER BY created_at DESC, id DESC",
    )
    .bind(shop)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetches one template by id, scoped to the shop.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no such template exists for the
/// shop, or [`DbError::Sqlx`] if the query fails.
pub async fn get_prompt_template(
    pool: &PgPool,
    shop: &str,
    id: i64,
) -> Result<PromptTemplateRow, DbError> {
    let row = sqlx::query_as::<_, PromptTemplateRow>(
        "SELECT id, shop, name, title_prompt, description_prompt, created_at \
         FROM prompt_templates \
         WHERE shop = $1 AND id = $2",
    )
    .bind(shop)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Deletes one template by id, scoped to the shop.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row was deleted, or
/// [`DbError::Sqlx`] if the statement fails.
pub async fn delete_prompt_template(pool: &PgPool, shop: &str, id: i64) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM prompt_templates WHERE shop = $1 AND id = $2")
        .bind(shop)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
