//! POST /api/v1/optimize — rewrite product content through the AI service.
//!
//! Fails fast with a configuration error when no AI key is set — no
//! partial progress is possible without the credential. Everything
//! after that is best-effort: the optimizer returns a record for every
//! product, falling back to originals per field and reporting warnings.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use relist_core::{OptimizedProduct, ScrapedProduct};
use relist_optimizer::GenAiClient;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta, require_shop};

#[derive(Debug, Deserialize)]
pub(super) struct OptimizeRequest {
    pub shop: String,
    pub products: Vec<ScrapedProduct>,
    /// Prompt template to apply; `None` uses the built-in instructions.
    #[serde(default)]
    pub template_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct OptimizeResponse {
    pub products: Vec<OptimizedProduct>,
    pub warnings: Vec<String>,
}

pub(super) async fn optimize_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<OptimizeRequest>,
) -> Result<Json<ApiResponse<OptimizeResponse>>, ApiError> {
    let rid = &req_id.0;
    let shop = require_shop(rid, &body.shop)?;

    if body.products.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "at least one product is required",
        ));
    }

    let client = GenAiClient::from_app_config(&state.config).map_err(|e| {
        ApiError::new(rid, "configuration_error", e.to_string())
    })?;

    let settings_row = relist_db::get_or_create_store_settings(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let negative_words: Vec<String> = relist_db::list_negative_words(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .into_iter()
        .map(|row| row.word)
        .collect();

    let template = match body.template_id {
        Some(id) => Some(
            relist_db::get_prompt_template(&state.pool, &shop, id)
                .await
                .map_err(|e| map_db_error(rid.clone(), &e))?,
        ),
        None => None,
    };

    let outcome = relist_optimizer::optimize_products(
        &client,
        body.products,
        template.as_ref().and_then(|t| t.title_prompt.as_deref()),
        template
            .as_ref()
            .and_then(|t| t.description_prompt.as_deref()),
        &negative_words,
        settings_row.optimize_alt_text,
    )
    .await;

    tracing::info!(
        shop = %shop,
        products = outcome.products.len(),
        warnings = outcome.warnings.len(),
        "optimization run finished"
    );

    Ok(Json(ApiResponse {
        data: OptimizeResponse {
            products: outcome.products,
            warnings: outcome.warnings,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
