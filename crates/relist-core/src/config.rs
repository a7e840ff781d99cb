use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("RELIST_ENV", "development"))?;

    let bind_addr = parse_addr("RELIST_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("RELIST_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("RELIST_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("RELIST_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("RELIST_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs = parse_u64("RELIST_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default(
        "RELIST_SCRAPER_USER_AGENT",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    );
    let scraper_inter_request_delay_ms = parse_u64("RELIST_SCRAPER_INTER_REQUEST_DELAY_MS", "250")?;
    let scraper_max_retries = parse_u32("RELIST_SCRAPER_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_secs = parse_u64("RELIST_SCRAPER_RETRY_BACKOFF_BASE_SECS", "5")?;

    let ai_api_key = lookup("RELIST_AI_API_KEY").ok();
    let ai_base_url = or_default(
        "RELIST_AI_BASE_URL",
        "https://generativelanguage.googleapis.com/v1beta",
    );
    let ai_text_model = or_default("RELIST_AI_TEXT_MODEL", "gemini-2.0-flash");
    let ai_image_model = or_default("RELIST_AI_IMAGE_MODEL", "gemini-2.0-flash-exp-image-generation");
    let ai_request_timeout_secs = parse_u64("RELIST_AI_REQUEST_TIMEOUT_SECS", "60")?;
    let ai_max_retries = parse_u32("RELIST_AI_MAX_RETRIES", "3")?;
    let ai_retry_backoff_base_ms = parse_u64("RELIST_AI_RETRY_BACKOFF_BASE_MS", "5000")?;
    let ai_post_call_delay_ms = parse_u64("RELIST_AI_POST_CALL_DELAY_MS", "1000")?;

    let catalog_shop = lookup("RELIST_CATALOG_SHOP").ok();
    let catalog_token = lookup("RELIST_CATALOG_TOKEN").ok();
    let catalog_api_version = or_default("RELIST_CATALOG_API_VERSION", "2025-07");
    let catalog_request_timeout_secs = parse_u64("RELIST_CATALOG_REQUEST_TIMEOUT_SECS", "30")?;
    let publish_inter_product_delay_ms =
        parse_u64("RELIST_PUBLISH_INTER_PRODUCT_DELAY_MS", "2000")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_inter_request_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        ai_api_key,
        ai_base_url,
        ai_text_model,
        ai_image_model,
        ai_request_timeout_secs,
        ai_max_retries,
        ai_retry_backoff_base_ms,
        ai_post_call_delay_ms,
        catalog_shop,
        catalog_token,
        catalog_api_version,
        catalog_request_timeout_secs,
        publish_inter_product_delay_ms,
    })
}

fn parse_environment(raw: &str) -> Result<Environment, ConfigError> {
    match raw {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RELIST_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
