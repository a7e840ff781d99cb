use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,

    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_inter_request_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,

    /// API key for the generative content/image service. Optional at
    /// startup; its absence fails optimize/enhance requests, not boot.
    pub ai_api_key: Option<String>,
    pub ai_base_url: String,
    pub ai_text_model: String,
    pub ai_image_model: String,
    pub ai_request_timeout_secs: u64,
    pub ai_max_retries: u32,
    pub ai_retry_backoff_base_ms: u64,
    /// Fixed delay after every successful AI call, to stay clear of the
    /// service's rate limit on the next call.
    pub ai_post_call_delay_ms: u64,

    /// Default target shop domain for the catalog publisher,
    /// e.g. `"my-shop.myshopify.com"`.
    pub catalog_shop: Option<String>,
    pub catalog_token: Option<String>,
    pub catalog_api_version: String,
    pub catalog_request_timeout_secs: u64,
    /// Delay between product creations when the run used AI calls.
    pub publish_inter_product_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "scraper_inter_request_delay_ms",
                &self.scraper_inter_request_delay_ms,
            )
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_secs",
                &self.scraper_retry_backoff_base_secs,
            )
            .field("ai_api_key", &self.ai_api_key.as_ref().map(|_| "[redacted]"))
            .field("ai_base_url", &self.ai_base_url)
            .field("ai_text_model", &self.ai_text_model)
            .field("ai_image_model", &self.ai_image_model)
            .field("ai_request_timeout_secs", &self.ai_request_timeout_secs)
            .field("ai_max_retries", &self.ai_max_retries)
            .field("ai_retry_backoff_base_ms", &self.ai_retry_backoff_base_ms)
            .field("ai_post_call_delay_ms", &self.ai_post_call_delay_ms)
            .field("catalog_shop", &self.catalog_shop)
            .field(
                "catalog_token",
                &self.catalog_token.as_ref().map(|_| "[redacted]"),
            )
            .field("catalog_api_version", &self.catalog_api_version)
            .field(
                "catalog_request_timeout_secs",
                &self.catalog_request_timeout_secs,
            )
            .field(
                "publish_inter_product_delay_ms",
                &self.publish_inter_product_delay_ms,
            )
            .finish()
    }
}
