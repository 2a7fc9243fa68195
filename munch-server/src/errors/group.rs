use std::collections::BTreeMap;
use std::fmt;

use axum::http::StatusCode;
use serde::Serialize;

use super::CatalogError;

/// Step of group creation that failed to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationPhase {
    InsertGroup,
    InsertHost,
    Commit,
}

impl fmt::Display for CreationPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CreationPhase::InsertGroup => write!(f, "insert group"),
            CreationPhase::InsertHost => write!(f, "insert host membership"),
            CreationPhase::Commit => write!(f, "commit"),
        }
    }
}

/// Field name to message, one entry per rejected field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), GroupError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(GroupError::Validation(self))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    #[error("Group not found")]
    GroupNotFound,

    #[error("You already have a group with this name")]
    GroupNameExists,

    #[error("Invalid request parameters")]
    Validation(FieldErrors),

    #[error("Insufficient permission")]
    InsufficientPermission,

    #[error("User not in group")]
    UserNotInGroup,

    #[error("Could not allocate a unique join code")]
    JoinCodeExhausted,

    #[error("Failed to create group during {phase}")]
    Persistence {
        phase: CreationPhase,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl GroupError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GroupError::GroupNotFound => StatusCode::NOT_FOUND,
            GroupError::GroupNameExists => StatusCode::CONFLICT,
            GroupError::Validation(_) => StatusCode::BAD_REQUEST,
            GroupError::InsufficientPermission => StatusCode::FORBIDDEN,
            GroupError::UserNotInGroup => StatusCode::FORBIDDEN,
            GroupError::JoinCodeExhausted => StatusCode::INTERNAL_SERVER_ERROR,
            GroupError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GroupError::Catalog(e) => e.status_code(),
            GroupError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
