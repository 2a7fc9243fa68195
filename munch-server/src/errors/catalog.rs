use axum::http::StatusCode;

/// Failures while storing provider venues, split by phase so callers can
/// tell which step to retry.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to store restaurants")]
    InsertFailed(#[source] sqlx::Error),

    #[error("Failed to link restaurants to group")]
    LinkFailed(#[source] sqlx::Error),
}

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }
}
