use thiserror::Error;

/// Failure of a single outward API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("Response is missing `{0}`")]
    MissingData(&'static str),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
