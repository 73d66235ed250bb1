use thiserror::Error;

/// Errors at the persistence boundary (host JSON ⇄ board params).
///
/// Board operations themselves never fail: invalid input is a silent no-op.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid board params: {0}")]
    InvalidParams(String),

    #[error("params (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
