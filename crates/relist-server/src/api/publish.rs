//! POST /api/v1/publish — reprice, optionally enhance images, publish
//! to the merchant catalog, and record the run in the batch ledger.
//!
//! The ledger brackets the publisher: the batch row is opened (in
//! `processing`, with the total and a settings snapshot) before the
//! first catalog mutation, and closed exactly once with the final
//! counts. Per-product failures are the publisher's business; only a
//! missing credential fails the request before any work starts.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use relist_core::ScrapedProduct;
use relist_optimizer::GenAiClient;
use relist_publisher::PublishItem;

use crate::middleware::RequestId;

use super::{admin_client, map_db_error, require_shop, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct PublishRequest {
    pub shop: String,
    /// Products to publish — scraped, or the flattened product part of
    /// optimized records.
    pub products: Vec<ScrapedProduct>,
    /// URLs this run was scraped from, recorded in the batch ledger.
    #[serde(default)]
    pub source_urls: Vec<String>,
    /// Catalog collections every created product is assigned to.
    #[serde(default)]
    pub collection_ids: Vec<String>,
    /// Currency the scraped prices are denominated in.
    #[serde(default)]
    pub source_currency: Option<String>,
    /// Whether AI optimization ran earlier in this run — spaces out
    /// catalog mutations to avoid compounding rate-limit pressure.
    #[serde(default)]
    pub used_ai: bool,
    /// Generate AI renditions of product images before publishing.
    #[serde(default)]
    pub enhance_images: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct PublishResponse {
    pub batch_id: i64,
    pub imported: u32,
    pub failed: u32,
    pub total: u32,
}

pub(super) async fn publish_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<PublishRequest>,
) -> Result<Json<ApiResponse<PublishResponse>>, ApiError> {
    let rid = &req_id.0;
    let shop = require_shop(rid, &body.shop)?;

    if body.products.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "at least one product is required",
        ));
    }

    let config = &state.config;

    // Fail fast on missing credentials before any work begins.
    let admin = admin_client(&state, rid)?;

    let ai_client = if body.enhance_images {
        Some(
            GenAiClient::from_app_config(config)
                .map_err(|e| ApiError::new(rid, "configuration_error", e.to_string()))?,
        )
    } else {
        None
    };

    let settings_row = relist_db::get_or_create_store_settings(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let settings = relist_core::StoreSettings::from(settings_row);

    // Pricing runs before the ledger opens: the snapshot then describes
    // exactly the settings the published prices came from.
    let source_currency = body.source_currency.as_deref().unwrap_or("USD");
    let mut products = body.products;
    for product in &mut products {
        relist_pricing::reprice_product(product, &settings, source_currency);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let total = products.len() as i32;
    let batch = relist_db::start_import_batch(
        &state.pool,
        &shop,
        total,
        &body.source_urls,
        &settings,
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    let mut items = Vec::with_capacity(products.len());
    match &ai_client {
        Some(client) => {
            let http = reqwest::Client::new();
            for product in products {
                let enhanced =
                    relist_optimizer::enhance_product_images(client, &http, &product).await;
                items.push(PublishItem {
                    product,
                    enhanced_images: enhanced,
                });
            }
        }
        None => {
            items.extend(products.into_iter().map(PublishItem::plain));
        }
    }

    let used_ai = body.used_ai || body.enhance_images;
    let outcome = relist_publisher::publish_products(
        &admin,
        &items,
        &settings,
        &body.collection_ids,
        used_ai,
        config.publish_inter_product_delay_ms,
    )
    .await;

    #[allow(clippy::cast_possible_wrap)]
    relist_db::complete_import_batch(
        &state.pool,
        batch.id,
        outcome.imported as i32,
        outcome.failed as i32,
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(
        shop = %shop,
        batch_id = batch.id,
        imported = outcome.imported,
        failed = outcome.failed,
        total = outcome.total,
        "publish run finished"
    );

    Ok(Json(ApiResponse {
        data: PublishResponse {
            batch_id: batch.id,
            imported: outcome.imported,
            failed: outcome.failed,
            total: outcome.total,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
