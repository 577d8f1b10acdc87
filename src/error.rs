/// Unified error types for accountd
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Lookup failures (user or reset token)
    #[error("{0}")]
    NotFound(String),

    /// Password confirmation mismatch during a reset
    #[error("Passwords don't match")]
    Mismatch,

    /// Password strength policy violation
    #[error("Weak password: {0}")]
    WeakPassword(String),

    /// Login failure, deliberately undifferentiated between unknown user
    /// and wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session token decode failure
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Uniqueness conflicts (e.g. duplicate username)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request field validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert ApiError to HTTP response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound", self.to_string()),
            ApiError::Mismatch => (StatusCode::BAD_REQUEST, "Mismatch", self.to_string()),
            ApiError::WeakPassword(_) => {
                (StatusCode::BAD_REQUEST, "WeakPassword", self.to_string())
            }
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "InvalidCredentials",
                self.to_string(),
            ),
            ApiError::InvalidToken(_) => {
                (StatusCode::UNAUTHORIZED, "InvalidToken", self.to_string())
            }
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "Conflict", self.to_string()),
            ApiError::Validation(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "InvalidRequest",
                self.to_string(),
            ),
            ApiError::Database(_) | ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
                "Internal server error".to_string(), // Don't leak details
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for service operations
pub type ApiResult<T> = Result<T, ApiError>;
