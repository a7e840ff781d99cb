//! Prompt-template data endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, require_shop, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct TemplateQuery {
    pub shop: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateTemplateRequest {
    pub shop: String,
    pub name: String,
    #[serde(default)]
    pub title_prompt: Option<String>,
    #[serde(default)]
    pub description_prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct TemplateItem {
    pub id: i64,
    pub name: String,
    pub title_prompt: Option<String>,
    pub description_prompt: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<relist_db::PromptTemplateRow> for TemplateItem {
    fn from(row: relist_db::PromptTemplateRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            title_prompt: row.title_prompt,
            description_prompt: row.description_prompt,
            created_at: row.created_at,
        }
    }
}

fn map_unique_violation(req_id: &str, e: &relist_db::DbError) -> ApiError {
    if let relist_db::DbError::Sqlx(sqlx::Error::Database(db_err)) = e {
        if db_err.code().as_deref() == Some("23505") {
            return ApiError::new(req_id, "conflict", "a template with that name already exists");
        }
    }
    map_db_error(req_id.to_owned(), e)
}

pub(super) async fn list_templates(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TemplateQuery>,
) -> Result<Json<ApiResponse<Vec<TemplateItem>>>, ApiError> {
    let shop = require_shop(&req_id.0, &query.shop)?;

    let rows = relist_db::list_prompt_templates(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(TemplateItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn create_template(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TemplateItem>>), ApiError> {
    let rid = &req_id.0;
    let shop = require_shop(rid, &body.shop)?;

    let name = body.name.trim().to_owned();
    if name.is_empty() || name.len() > 200 {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "name must be 1–200 characters",
        ));
    }

    let row = relist_db::insert_prompt_template(
        &state.pool,
        &shop,
        &name,
        body.title_prompt.as_deref(),
        body.description_prompt.as_deref(),
    )
    .await
    .map_err(|e| map_unique_violation(rid, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: TemplateItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn delete_template(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Query(query): Query<TemplateQuery>,
) -> Result<StatusCode, ApiError> {
    let shop = require_shop(&req_id.0, &query.shop)?;

    relist_db::delete_prompt_template(&state.pool, &shop, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(StatusCode::NO_CONTENT)
}
