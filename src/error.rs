use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::store::StoreError;

/// Everything the auth flows can reject a request with.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Invalid or expired verification link.")]
    InvalidToken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Please verify your email first")]
    UnverifiedAccount,
    #[error("Too many login attempts from this IP, please try again after 15 minutes")]
    RateLimited,
    #[error("User not found")]
    UserNotFound,
    #[error("Email could not be sent")]
    EmailDelivery,
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
            StoreError::Database(e) => AuthError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AuthError::Validation { .. }
            | AuthError::DuplicateEmail
            | AuthError::InvalidToken
            | AuthError::InvalidCredentials
            | AuthError::UserNotFound
            | AuthError::InvalidOrExpiredToken => StatusCode::BAD_REQUEST,
            AuthError::UnverifiedAccount => StatusCode::UNAUTHORIZED,
            AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AuthError::EmailDelivery | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Store and other infrastructure failures must not leak internals.
        let message = match &self {
            AuthError::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        if let AuthError::Validation { field, reason } = &self {
            tracing::warn!(field, reason, "validation rejected");
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}
