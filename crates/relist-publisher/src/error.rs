use thiserror::Error;

/// A field-level user error returned by the catalog API alongside an
/// HTTP 200. These are failures, not exceptions: the mutation was
/// rejected for this input and retrying the same input cannot succeed.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum PublisherError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog API returned status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("catalog GraphQL error: {0}")]
    GraphQl(String),

    #[error("catalog rejected the mutation: {}", format_user_errors(.0))]
    UserErrors(Vec<UserError>),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("staged upload to {context} failed with status {status}")]
    Upload { status: u16, context: String },

    #[error("catalog response is missing expected data for {context}")]
    MissingData { context: String },
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| match &e.field {
            Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), e.message),
            _ => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
