use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
    #[error("places API key is not set")]
    MissingApiKey,

    #[error("places request failed with status {0}")]
    Status(StatusCode),

    #[error("places request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed places payload: {0}")]
    Parse(#[from] serde_json::Error),
}
