//! POST /api/v1/scrape — fetch products from external storefront URLs.
//!
//! Each URL is resolved, fetched, and normalized independently; a URL
//! that cannot be resolved or fetched lands in `errors` without
//! touching its siblings. The combined result is deduplicated by
//! `(source_store, external_id)` before it is returned.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use relist_core::ScrapedProduct;
use relist_scraper::{deduplicate_products, resolve_url, StorefrontClient, TargetKind};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeRequest {
    pub urls: Vec<String>,
    /// Classification for URLs whose path names neither `products/` nor
    /// `collections/`. Defaults to product.
    #[serde(default)]
    pub default_type: Option<TargetKind>,
}

#[derive(Debug, Serialize)]
pub(super) struct ScrapeErrorItem {
    pub url: String,
    pub error: String,
    /// HTTP status from the storefront, when the failure maps to one.
    pub status: Option<u16>,
}

#[derive(Debug, Serialize)]
pub(super) struct ScrapeResponse {
    pub products: Vec<ScrapedProduct>,
    pub errors: Vec<ScrapeErrorItem>,
}

pub(super) async fn scrape_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ScrapeRequest>,
) -> Result<Json<ApiResponse<ScrapeResponse>>, ApiError> {
    let rid = &req_id.0;

    if body.urls.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "at least one URL is required",
        ));
    }

    let config = &state.config;
    let client = StorefrontClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "failed to build storefront client");
        ApiError::new(rid, "internal_error", "failed to build storefront client")
    })?;

    let default_kind = body.default_type.unwrap_or(TargetKind::Product);
    let mut products: Vec<ScrapedProduct> = Vec::new();
    let mut errors: Vec<ScrapeErrorItem> = Vec::new();

    for url in &body.urls {
        let target = match resolve_url(url, default_kind) {
            Ok(target) => target,
            Err(e) => {
                errors.push(ScrapeErrorItem {
                    url: url.clone(),
                    error: e.to_string(),
                    status: e.status(),
                });
                continue;
            }
        };

        match client
            .fetch_target(&target, config.scraper_inter_request_delay_ms)
            .await
        {
            Ok(scraped) => {
                tracing::info!(url = %url, count = scraped.len(), "scraped storefront target");
                products.extend(scraped);
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "scrape failed for URL");
                errors.push(ScrapeErrorItem {
                    url: url.clone(),
                    error: e.to_string(),
                    status: e.status(),
                });
            }
        }
    }

    let products = deduplicate_products(products);

    Ok(Json(ApiResponse {
        data: ScrapeResponse { products, errors },
        meta: ResponseMeta::new(req_id.0),
    }))
}
