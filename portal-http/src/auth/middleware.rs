//! Staff guard.
//!
//! Runs after the session middleware has written `AuthUser` into request
//! extensions and rejects everything that is not a staff identity before the
//! wrapped handler executes.

use crate::auth::types::{AuthError, AuthUser};
use crate::web::flash::{Flash, redirect_with_flash};
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use tracing::warn;

/// Build a guard for staff-only routes. Non-staff identities are sent to
/// `denied_redirect` with an error flash; requests without any identity get a
/// 401.
pub fn require_staff(
    denied_redirect: &'static str,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone {
    move |request: Request, next: Next| {
        Box::pin(async move {
            let Some(auth_user) = request.extensions().get::<AuthUser>() else {
                return AuthError::Unauthenticated.into_response();
            };

            if !auth_user.is_staff {
                warn!(
                    user_id = auth_user.id,
                    path = %request.uri().path(),
                    "Rejected non-staff request to staff route"
                );
                return redirect_with_flash(
                    denied_redirect,
                    Flash::error(AuthError::StaffRequired.to_string()),
                );
            }

            next.run(request).await
        })
    }
}
