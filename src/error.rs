//! Error type shared by the auth flow and its HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please enter email and password")]
    MissingCredentials,

    /// Unknown email, or an account that only signs in through an OAuth provider.
    #[error("User not found. Please try again.")]
    UserNotFound,

    #[error("The entered password is not correct. Please try again.")]
    InvalidPassword,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid or expired session token")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Credential failures are reported to the sign-in page under one generic code.
    pub fn is_credentials_failure(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredentials | AuthError::UserNotFound | AuthError::InvalidPassword
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound | AuthError::InvalidPassword | AuthError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Conflict(_) => StatusCode::CONFLICT,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            e if e.is_credentials_failure() => "CredentialsSignin",
            AuthError::Validation(_) => "validation",
            AuthError::Conflict(_) => "conflict",
            AuthError::Unauthorized => "unauthorized",
            _ => "internal",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match &self {
            AuthError::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(serde_json::json!({
            "error": self.code(),
            "message": message,
        }));
        (self.status(), body).into_response()
    }
}
