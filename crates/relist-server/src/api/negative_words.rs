//! Negative-word denylist endpoints.

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
pub(super) struct WordQuery {
    pub shop: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateWordRequest {
    pub shop: String,
    pub word: String,
}

#[derive(Debug, Serialize)]
pub(super) struct WordItem {
    pub id: i64,
    pub word: String,
    pub created_at: DateTime<Utc>,
}

impl From<relist_db::NegativeWordRow> for WordItem {
    fn from(row: relist_db::NegativeWordRow) -> Self {
        Self {
            id: row.id,
            word: row.word,
            created_at: row.created_at,
        }
    }
}

pub(super) async fn list_words(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<WordQuery>,
) -> Result<Json<ApiResponse<Vec<WordItem>>>, ApiError> {
    let shop = require_shop(&req_id.0, &query.shop)?;

    let rows = relist_db::list_negative_words(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(WordItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn create_word(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateWordRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WordItem>>), ApiError> {
    let rid = &req_id.0;
    let shop = require_shop(rid, &body.shop)?;

    let word = body.word.trim();
    if word.is_empty() || word.len() > 100 {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "word must be 1–100 characters",
        ));
    }

    let row = relist_db::insert_negative_word(&state.pool, &shop, word)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: WordItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn delete_word(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Query(query): Query<WordQuery>,
) -> Result<StatusCode, ApiError> {
    let shop = require_shop(&req_id.0, &query.shop)?;

    relist_db::delete_negative_word(&state.pool, &shop, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(StatusCode::NO_CONTENT)
}
