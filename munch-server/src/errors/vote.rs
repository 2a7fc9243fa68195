use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    #[error("Group not found")]
    GroupNotFound,

    #[error("Restaurant not found in this group")]
    RestaurantNotFound,

    #[error("User not in group")]
    UserNotInGroup,

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl VoteError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            VoteError::GroupNotFound => StatusCode::NOT_FOUND,
            VoteError::RestaurantNotFound => StatusCode::NOT_FOUND,
            VoteError::UserNotInGroup => StatusCode::FORBIDDEN,
            VoteError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
