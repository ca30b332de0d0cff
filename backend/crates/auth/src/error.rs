//! Auth Error Types
//!
//! Every failure is recovered at the request boundary and converted to the
//! `{success: false, message}` envelope; nothing propagates to the caller as
//! a raw internal error.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Normalized email already registered
    #[error("User already exists")]
    DuplicateUser,

    /// Unknown email or wrong password; the two are indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No valid session behind the request
    #[error("Not authenticated")]
    Unauthenticated,

    /// Session references a user that no longer exists
    #[error("User not found")]
    StaleSession,

    /// Registration write failed; nothing was persisted
    #[error("Registration failed")]
    RegistrationFailed,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::DuplicateUser => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::Unauthenticated
            | AuthError::StaleSession => StatusCode::UNAUTHORIZED,
            AuthError::RegistrationFailed
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message for the response envelope
    ///
    /// Internal variants get a generic message; details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::RegistrationFailed => {
                tracing::error!("Registration failed");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::StaleSession => {
                tracing::warn!("Session referenced a missing user");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();

        let body = json!({
            "success": false,
            "message": self.public_message(),
        });

        (self.status_code(), Json(body)).into_response()
    }
}
