use crate::core::response::ApiResponse;
use axum::{http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

/// The identity a session resolved to. Inserted into request extensions by
/// the session middleware and read back by handlers and guards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    /// Staff capability: moderate uploads and read reports.
    pub is_staff: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Login required")]
    Unauthenticated,
    #[error("Staff access required")]
    StaffRequired,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    #[error("Invalid session configuration: {0}")]
    InvalidSessionConfig(String),
}

impl From<&AuthError> for StatusCode {
    fn from(error: &AuthError) -> Self {
        match error {
            AuthError::Unauthenticated | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::StaffRequired => StatusCode::FORBIDDEN,
            AuthError::PasswordHash(_) | AuthError::InvalidSessionConfig(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from(&self);
        ApiResponse::<()>::error_with_status(self.to_string(), status).into_response()
    }
}
