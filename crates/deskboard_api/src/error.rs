use thiserror::Error;

/// Errors raised while talking to a collection
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(&'static str),
    #[error("record has no `_id` or `id` field")]
    MissingId,
    #[error("no record with id `{0}`")]
    NotFound(String),
}
