use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizerError {
    /// No AI API key is configured. Fatal for the whole request — no
    /// partial progress is possible without the credential, so this is
    /// checked before any product is processed.
    #[error("AI service API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by AI service (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("AI service returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("AI service returned no usable content for {context}")]
    EmptyResponse { context: String },
}
