//! API error types and HTTP status mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use courier_core::error::DomainError;
use thiserror::Error;

use crate::dto::ErrorResponse;

/// Convenience alias for handler return types.
pub type ApiResult<T> = Result<T, ApiError>;

/// API-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistence failures surface as argument-class errors carrying
    /// the underlying message; they are never retried.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            ApiError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, "already_exists", m.as_str()),
            ApiError::Persistence(m) => {
                (StatusCode::BAD_REQUEST, "persistence_failure", m.as_str())
            }
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            ApiError::Internal(m) => {
                // Boundary safety net: log the detail, hide it from the body.
                tracing::error!(detail = %m, "unhandled error at API boundary");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(kind) => ApiError::NotFound(format!("{kind} not found")),
            DomainError::AlreadyExists(kind) => {
                ApiError::Conflict(format!("{kind} already exists"))
            }
            DomainError::Validation(m) => ApiError::Validation(m),
            DomainError::Persistence(m) => ApiError::Persistence(m),
            DomainError::Token(m) => ApiError::Unauthorized(m),
            DomainError::Internal(m) => ApiError::Internal(m),
        }
    }
}
