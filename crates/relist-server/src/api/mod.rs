mod batches;
mod catalog;
mod negative_words;
mod optimize;
mod publish;
mod scrape;
mod settings;
mod templates;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<relist_core::AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" | "configuration_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

pub(super) fn map_db_error(request_id: String, error: &relist_db::DbError) -> ApiError {
    match error {
        relist_db::DbError::NotFound => ApiError::new(request_id, "not_found", "record not found"),
        relist_db::DbError::InvalidBatchTransition { .. } => {
            ApiError::new(request_id, "conflict", error.to_string())
        }
        _ => {
            tracing::error!(error = %error, "database query failed");
            ApiError::new(request_id, "internal_error", "database query failed")
        }
    }
}

/// Builds the Admin catalog client from the configured credentials.
/// Missing credentials are a whole-request configuration error.
pub(super) fn admin_client(
    state: &AppState,
    request_id: &str,
) -> Result<relist_publisher::AdminClient, ApiError> {
    let config = &state.config;
    let (shop, token) = match (&config.catalog_shop, &config.catalog_token) {
        (Some(shop), Some(token)) => (shop, token),
        _ => {
            return Err(ApiError::new(
                request_id,
                "configuration_error",
                "catalog shop and access token are not configured",
            ))
        }
    };
    relist_publisher::AdminClient::new(
        shop,
        token,
        &config.catalog_api_version,
        config.catalog_request_timeout_secs,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "failed to build catalog client");
        ApiError::new(request_id, "internal_error", "failed to build catalog client")
    })
}

/// Validates the `shop` identifier every scoped endpoint requires.
pub(super) fn require_shop(request_id: &str, shop: &str) -> Result<String, ApiError> {
    let trimmed = shop.trim();
    if trimmed.is_empty() {
        return Err(ApiError::new(
            request_id,
            "validation_error",
            "shop must be provided",
        ));
    }
    Ok(trimmed.to_owned())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/scrape", post(scrape::scrape_products))
        .route("/api/v1/optimize", post(optimize::optimize_products))
        .route("/api/v1/publish", post(publish::publish_products))
        .route("/api/v1/batches", get(batches::list_batches))
        .route("/api/v1/batches/{id}", get(batches::get_batch))
        .route("/api/v1/catalog/collections", get(catalog::list_collections))
        .route("/api/v1/catalog/products", get(catalog::list_products))
        .route(
            "/api/v1/settings",
            get(settings::get_settings).put(settings::save_settings),
        )
        .route(
            "/api/v1/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/api/v1/templates/{id}",
            axum::routing::delete(templates::delete_template),
        )
        .route(
            "/api/v1/negative-words",
            get(negative_words::list_words).post(negative_words::create_word),
        )
        .route(
            "/api/v1/negative-words/{id}",
            axum::routing::delete(negative_words::delete_word),
        )
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<HealthData>>, ApiError> {
    match relist_db::ping(&state.pool).await {
        Ok(()) => Ok(Json(ApiResponse {
            data: HealthData {
                status: "ok",
                database: "up",
            },
            meta: ResponseMeta::new(req_id.0),
        })),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            Err(ApiError::new(req_id.0, "internal_error", "database is unreachable"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    /// Config with no AI key and no catalog credentials: route tests
    /// exercise the fail-fast configuration paths without touching the
    /// network.
    fn test_config() -> Arc<relist_core::AppConfig> {
        Arc::new(relist_core::AppConfig {
            database_url: "postgres://unused".to_string(),
            env: relist_core::Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("bind addr"),
            log_level: "info".to_string(),
            db_max_connections: 5,
            db_min_connections: 1,
            db_acquire_timeout_secs: 5,
            scraper_request_timeout_secs: 5,
            scraper_user_agent: "relist-test/0.1".to_string(),
            scraper_inter_request_delay_ms: 0,
            scraper_max_retries: 0,
            scraper_retry_backoff_base_secs: 0,
            ai_api_key: None,
            ai_base_url: "http://127.0.0.1:1".to_string(),
            ai_text_model: "test-text".to_string(),
            ai_image_model: "test-image".to_string(),
            ai_request_timeout_secs: 5,
            ai_max_retries: 0,
            ai_retry_backoff_base_ms: 0,
            ai_post_call_delay_ms: 0,
            catalog_shop: None,
            catalog_token: None,
            catalog_api_version: "2025-07".to_string(),
            catalog_request_timeout_secs: 5,
            publish_inter_product_delay_ms: 0,
        })
    }

    fn test_app(pool: sqlx::PgPool) -> Router {
        build_app(AppState {
            pool,
            config: test_config(),
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 50);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 200);
        assert_eq!(normalize_limit(Some(25)), 25);
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_configuration_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "configuration_error", "no key").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_not_found_maps_to_404() {
        let response = ApiError::new("req-1", "not_found", "missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn api_error_conflict_maps_to_409() {
        let response = ApiError::new("req-1", "conflict", "already done").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_reports_database_up(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"].as_str(), Some("ok"));
        assert_eq!(json["data"]["database"].as_str(), Some("up"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_settings_creates_defaults_on_first_read(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/settings?shop=test-shop.myshopify.com")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["rounding"].as_str(), Some(".99"));
        assert_eq!(json["data"]["product_status"].as_str(), Some("DRAFT"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn save_settings_rejects_unknown_product_status(pool: sqlx::PgPool) {
        let body = serde_json::json!({
            "shop": "test-shop.myshopify.com",
            "product_status": "ARCHIVED"
        });
        let request = Request::builder()
            .method("PUT")
            .uri("/api/v1/settings")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");

        let response = test_app(pool).oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"].as_str(), Some("validation_error"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn negative_word_create_then_list_round_trips(pool: sqlx::PgPool) {
        let app = test_app(pool);

        let create = app
            .clone()
            .oneshot(post_json(
                "/api/v1/negative-words",
                serde_json::json!({"shop": "test-shop.myshopify.com", "word": "Dropshipping"}),
            ))
            .await
            .expect("create response");
        assert_eq!(create.status(), StatusCode::CREATED);

        let list = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/negative-words?shop=test-shop.myshopify.com")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("list response");
        assert_eq!(list.status(), StatusCode::OK);
        let json = body_json(list).await;
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["word"].as_str(), Some("dropshipping"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_batch_returns_404_for_unknown_id(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/batches/999999?shop=test-shop.myshopify.com")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn scrape_with_no_urls_is_a_validation_error(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(post_json(
                "/api/v1/scrape",
                serde_json::json!({"urls": []}),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"].as_str(), Some("validation_error"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn optimize_without_ai_key_fails_fast(pool: sqlx::PgPool) {
        let body = serde_json::json!({
            "shop": "test-shop.myshopify.com",
            "products": [{
                "external_id": 1,
                "title": "Shirt",
                "handle": "shirt",
                "variants": [{"price": "10.00"}]
            }]
        });
        let response = test_app(pool)
            .oneshot(post_json("/api/v1/optimize", body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"].as_str(), Some("configuration_error"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn publish_without_catalog_credentials_fails_fast(pool: sqlx::PgPool) {
        let body = serde_json::json!({
            "shop": "test-shop.myshopify.com",
            "products": [{
                "external_id": 1,
                "title": "Shirt",
                "handle": "shirt",
                "variants": [{"price": "10.00"}]
            }]
        });
        let response = test_app(pool.clone())
            .oneshot(post_json("/api/v1/publish", body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"].as_str(), Some("configuration_error"));

        // Fail-fast means no ledger row was opened.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM import_batches")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 0);
    }
}
