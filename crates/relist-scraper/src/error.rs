use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("invalid storefront URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("cannot resolve a product or collection handle from \"{url}\"")]
    UnresolvableHandle { url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("pagination limit reached for {store}: exceeded {max_pages} pages")]
    PaginationLimit { store: String, max_pages: usize },
}

impl ScraperError {
    /// HTTP status carried by this error, when it maps to one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ScraperError::RateLimited { .. } => Some(429),
            ScraperError::NotFound { .. } => Some(404),
            ScraperError::UnexpectedStatus { status, .. } => Some(*status),
            ScraperError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
