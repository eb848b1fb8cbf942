pub(crate) mod admin_handler;
pub(crate) mod auth_handler;
mod error_mapper;
pub(crate) mod feed_handler;
pub(crate) mod session;
pub(crate) mod subject_handler;
pub(crate) mod upload_handler;

use crate::service::error::ServiceError;
use crate::service::identity_service::IdentityService;
use crate::service::points_service::PointsService;
use crate::view::Chrome;
use axum::{
    Router,
    http::{HeaderMap, header},
    middleware,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use portal_http::{AuthUser, Flash, SessionConfig};
use sea_orm::DatabaseConnection;
use std::{path::PathBuf, sync::Arc};

pub(crate) use error_mapper::{PageError, PageResultExt};

/// Everything the routers need to build their services.
#[derive(Clone)]
pub(crate) struct PortalContext {
    pub(crate) db: Arc<DatabaseConnection>,
    pub(crate) storage_dir: Arc<PathBuf>,
    pub(crate) session: SessionConfig,
    pub(crate) max_upload_bytes: usize,
    pub(crate) hash_cost: u32,
}

impl PortalContext {
    fn identity_service(&self) -> IdentityService {
        IdentityService::new(self.db.clone(), self.session.ttl()).with_hash_cost(self.hash_cost)
    }
}

pub(crate) fn portal_router(ctx: PortalContext) -> Router {
    let identity = ctx.identity_service();

    let protected = Router::new()
        .merge(feed_handler::router(&ctx))
        .merge(upload_handler::router(&ctx))
        .merge(subject_handler::router(&ctx))
        .nest("/admin-panel", admin_handler::router(&ctx))
        .route_layer(middleware::from_fn(session::require_login));

    Router::new()
        .merge(auth_handler::router(&ctx, identity.clone()))
        .merge(protected)
        .layer(middleware::from_fn(session::attach_identity(
            identity,
            ctx.session.cookie_name.clone(),
        )))
}

/// Page chrome for one response. Rendering clears a pending flash cookie so
/// the message shows exactly once.
pub(super) struct PageFrame {
    chrome: Chrome,
    clear_flash: bool,
}

impl PageFrame {
    pub(super) async fn load(
        points: &PointsService,
        user: Option<AuthUser>,
        headers: &HeaderMap,
    ) -> Result<Self, PageError> {
        let total = match &user {
            Some(user) => points.total_points(user.id).await?,
            None => 0,
        };
        Ok(Self {
            chrome: Chrome {
                user,
                points: total,
                flash: Flash::from_headers(headers),
            },
            clear_flash: Flash::is_present(headers),
        })
    }

    pub(super) fn render(self, page: impl FnOnce(&Chrome) -> String) -> Response {
        let html = Html(page(&self.chrome));
        if self.clear_flash {
            (
                AppendHeaders([(header::SET_COOKIE, Flash::clear_cookie())]),
                html,
            )
                .into_response()
        } else {
            html.into_response()
        }
    }
}

/// Form and query ids arrive as text; blank means "not given".
pub(super) fn optional_id(field: &str, raw: Option<&str>) -> Result<Option<i32>, ServiceError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ServiceError::validation(format!("`{field}` must be a number."))),
    }
}

/// Upload ids in the URL path. Anything that is not an `i32` names no upload.
pub(super) fn path_id(raw: &str) -> Result<i32, ServiceError> {
    raw.trim()
        .parse()
        .map_err(|_| ServiceError::not_found(format!("Upload `{raw}` was not found.")))
}
