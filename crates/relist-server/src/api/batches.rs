//! Read endpoints for the import-batch ledger.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, require_shop, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct BatchQuery {
    pub shop: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct BatchItem {
    pub id: i64,
    pub public_id: Uuid,
    pub status: String,
    pub total_products: i32,
    pub imported_products: i32,
    pub failed_products: i32,
    pub source_urls: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(super) struct BatchDetail {
    #[serde(flatten)]
    pub batch: BatchItem,
    pub settings_snapshot: serde_json::Value,
}

impl From<relist_db::ImportBatchRow> for BatchItem {
    fn from(row: relist_db::ImportBatchRow) -> Self {
        Self {
            id: row.id,
            public_id: row.public_id,
            status: row.status,
            total_products: row.total_products,
            imported_products: row.imported_products,
            failed_products: row.failed_products,
            source_urls: row.source_urls,
            created_at: row.created_at,
            completed_at: row.completed_at,
        }
    }
}

pub(super) async fn list_batches(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<BatchQuery>,
) -> Result<Json<ApiResponse<Vec<BatchItem>>>, ApiError> {
    let shop = require_shop(&req_id.0, &query.shop)?;

    let rows = relist_db::list_import_batches(&state.pool, &shop, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(BatchItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_batch(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Query(query): Query<BatchQuery>,
) -> Result<Json<ApiResponse<BatchDetail>>, ApiError> {
    let shop = require_shop(&req_id.0, &query.shop)?;

    let row = relist_db::get_import_batch(&state.pool, &shop, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let settings_snapshot = row.settings_snapshot.clone();
    Ok(Json(ApiResponse {
        data: BatchDetail {
            batch: BatchItem::from(row),
            settings_snapshot,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
