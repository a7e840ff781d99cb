//! Per-shop settings endpoints: lazy-created on first read, saved
//! wholesale on PUT.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use relist_core::StoreSettings;

use crate::middleware::RequestId;

use super::{map_db_error, require_shop, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SettingsQuery {
    pub shop: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SaveSettingsRequest {
    pub shop: String,
    #[serde(flatten)]
    pub settings: StoreSettings,
}

#[derive(Debug, Serialize)]
pub(super) struct SettingsResponse {
    pub shop: String,
    #[serde(flatten)]
    pub settings: StoreSettings,
}

pub(super) async fn get_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SettingsQuery>,
) -> Result<Json<ApiResponse<SettingsResponse>>, ApiError> {
    let shop = require_shop(&req_id.0, &query.shop)?;

    let row = relist_db::get_or_create_store_settings(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SettingsResponse {
            shop,
            settings: StoreSettings::from(row),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn save_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SaveSettingsRequest>,
) -> Result<Json<ApiResponse<SettingsResponse>>, ApiError> {
    let rid = &req_id.0;
    let shop = require_shop(rid, &body.shop)?;

    if !matches!(body.settings.product_status.to_uppercase().as_str(), "ACTIVE" | "DRAFT") {
        return Err(ApiError::new(
            rid,
            "validation_error",
            format!(
                "product_status must be 'ACTIVE' or 'DRAFT', got '{}'",
                body.settings.product_status
            ),
        ));
    }
    if !matches!(body.settings.inventory_policy.to_lowercase().as_str(), "deny" | "continue") {
        return Err(ApiError::new(
            rid,
            "validation_error",
            format!(
                "inventory_policy must be 'deny' or 'continue', got '{}'",
                body.settings.inventory_policy
            ),
        ));
    }

    let row = relist_db::save_store_settings(&state.pool, &shop, &body.settings)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SettingsResponse {
            shop,
            settings: StoreSettings::from(row),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
