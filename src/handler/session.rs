//! Session cookie resolution and the login guard.
//!
//! `attach_identity` wraps the whole portal router: a valid session cookie
//! puts an `AuthUser` into request extensions. `require_login` then gates the
//! protected routes, and handlers read the identity through [`CurrentUser`].

use crate::service::identity_service::IdentityService;
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use portal_http::{AuthError, AuthUser, get_auth_user, read_cookie};
use std::{convert::Infallible, future::Future, pin::Pin};
use tracing::{debug, warn};

pub(crate) fn attach_identity(
    identity: IdentityService,
    cookie_name: String,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone {
    move |mut request: Request, next: Next| {
        let identity = identity.clone();
        let cookie_name = cookie_name.clone();
        Box::pin(async move {
            let token = read_cookie(request.headers(), &cookie_name).map(str::to_owned);
            if let Some(token) = token {
                match identity.resolve_session(&token).await {
                    Ok(Some(user)) => {
                        request.extensions_mut().insert(user);
                    }
                    Ok(None) => debug!("Ignoring unknown or expired session cookie"),
                    Err(error) => warn!(error = %error, "Session lookup failed"),
                }
            }
            next.run(request).await
        })
    }
}

fn is_machine_path(path: &str) -> bool {
    path.starts_with("/api/") || path.starts_with("/ajax/")
}

/// Pages redirect to the login form; JSON endpoints answer 401.
pub(crate) async fn require_login(request: Request, next: Next) -> Response {
    if request.extensions().get::<AuthUser>().is_some() {
        return next.run(request).await;
    }

    if is_machine_path(request.uri().path()) {
        AuthError::Unauthenticated.into_response()
    } else {
        Redirect::to("/login").into_response()
    }
}

/// The signed-in user. Rejects with 401 when the session middleware found
/// nobody.
#[derive(Debug, Clone)]
pub(crate) struct CurrentUser(pub(crate) AuthUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        get_auth_user(&parts.extensions)
            .cloned()
            .map(CurrentUser)
            .map_err(IntoResponse::into_response)
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthUser>().cloned().map(CurrentUser))
    }
}
