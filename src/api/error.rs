use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DbError;

/// Errors returned by API handlers, each mapped to one status code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or blank required field, or an unreadable body. 400.
    #[error("{0}")]
    Validation(String),

    /// No record matches the identifier. 404.
    #[error("{0}")]
    NotFound(String),

    /// Store or infrastructure failure. 500.
    #[error("{0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn todo_not_found() -> Self {
        Self::NotFound("Todo not found".to_string())
    }

    /// Log an internal error and return a sanitized error for the client.
    pub fn internal(e: impl std::fmt::Display) -> Self {
        tracing::error!("Internal error: {}", e);
        Self::Internal("Internal server error".to_string())
    }

    pub fn invalid_body(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection);
        Self::Validation(rejection.body_text())
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Validation(msg) => {
                tracing::warn!("Validation error: {}", msg);
                Self::Validation(msg)
            }
            other => Self::internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
