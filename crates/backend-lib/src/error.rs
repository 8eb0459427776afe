// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Generic message for every credential failure. It never says which of
/// email or password was wrong.
pub const INVALID_CREDENTIALS_MSG: &str = "Invalid email or password";

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("CSRF token missing or invalid")]
    CsrfRejected,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::CsrfRejected => StatusCode::FORBIDDEN,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated => "AUTH_002",
            AppError::CsrfRejected => "AUTH_003",
            AppError::StoreUnavailable(_) => "STORE_001",
            AppError::Config(_) => "CFG_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Unauthenticated => "Authentication required".to_string(),
            AppError::CsrfRejected => "Request could not be verified".to_string(),
            AppError::StoreUnavailable(_) => {
                "Service temporarily unavailable, please try again later".to_string()
            },
            AppError::Config(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
