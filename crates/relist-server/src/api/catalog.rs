//! Read-through endpoints against the merchant catalog, used by the UI
//! to populate collection pickers and duplicate checks.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use relist_publisher::CollectionSummary;

use crate::middleware::RequestId;

use super::{admin_client, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CatalogQuery {
    pub limit: Option<u32>,
    pub query: Option<String>,
}

pub(super) async fn list_collections(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<Vec<CollectionSummary>>>, ApiError> {
    let client = admin_client(&state, &req_id.0)?;
    let limit = query.limit.unwrap_or(50).clamp(1, 250);

    let collections = client.list_collections(limit).await.map_err(|e| {
        tracing::error!(error = %e, "collection listing failed");
        ApiError::new(&req_id.0, "internal_error", "collection listing failed")
    })?;

    Ok(Json(ApiResponse {
        data: collections,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<Vec<CollectionSummary>>>, ApiError> {
    let client = admin_client(&state, &req_id.0)?;
    let limit = query.limit.unwrap_or(50).clamp(1, 250);

    let products = client
        .list_products(limit, query.query.as_deref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "product listing failed");
            ApiError::new(&req_id.0, "internal_error", "product listing failed")
        })?;

    Ok(Json(ApiResponse {
        data: products,
        meta: ResponseMeta::new(req_id.0),
    }))
}
