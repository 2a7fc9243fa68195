pub mod api;
pub mod auth;
pub mod catalog;
pub mod group;
pub mod places;
pub mod vote;

pub use api::ApiError;
pub use auth::AuthError;
pub use catalog::CatalogError;
pub use group::{CreationPhase, FieldErrors, GroupError};
pub use places::PlacesError;
pub use vote::VoteError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut fields = None;

        // Extract status code and error message from the specific error type
        let (status, error_message, log_message) = match self {
            ApiError::AuthError(e) => (e.status_code(), e.to_string(), None),
            ApiError::GroupError(GroupError::Validation(errors)) => {
                fields = Some(errors);
                (
                    StatusCode::BAD_REQUEST,
                    "Invalid request parameters".to_string(),
                    None,
                )
            }
            ApiError::GroupError(e) if e.status_code().is_server_error() => {
                let error_id = Uuid::new_v4();
                tracing::error!(error_id = ?error_id, "Group error: {:?}", e);
                (e.status_code(), e.to_string(), Some(error_id.to_string()))
            }
            ApiError::GroupError(e) => (e.status_code(), e.to_string(), None),
            ApiError::VoteError(e) if e.status_code().is_server_error() => {
                let error_id = Uuid::new_v4();
                tracing::error!(error_id = ?error_id, "Vote error: {:?}", e);
                (e.status_code(), e.to_string(), Some(error_id.to_string()))
            }
            ApiError::VoteError(e) => (e.status_code(), e.to_string(), None),
        };

        // Create a consistent JSON error response
        let mut error_obj = json!({
            "code": status.as_u16(),
            "message": error_message
        });

        if let Some(fields) = fields {
            error_obj["fields"] = json!(fields);
        }

        // Add error_id if available (for internal errors)
        if let Some(error_id) = log_message {
            error_obj["error_id"] = json!(error_id);
        }

        let body = Json(json!({
            "error": error_obj
        }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}
