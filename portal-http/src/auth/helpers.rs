use crate::auth::types::{AuthError, AuthUser};
use axum::http::Extensions;

/// Read the identity the session middleware attached to the request.
pub fn get_auth_user(extensions: &Extensions) -> Result<&AuthUser, AuthError> {
    extensions
        .get::<AuthUser>()
        .ok_or(AuthError::Unauthenticated)
}
