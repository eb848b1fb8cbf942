use crate::service::error::{ServiceError, ServiceErrorKind};
use crate::view;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use portal_http::{ApiResponse, Flash, redirect_with_flash};
use serde_json::Value;
use tracing::error;

const INTERNAL_NOTICE: &str = "Something went wrong. Please try again.";

fn status_code_for(kind: ServiceErrorKind) -> StatusCode {
    match kind {
        ServiceErrorKind::Validation => StatusCode::BAD_REQUEST,
        ServiceErrorKind::NotFound => StatusCode::NOT_FOUND,
        ServiceErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ServiceErrorKind::Conflict => StatusCode::CONFLICT,
        ServiceErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Internal details go to the log, never to the client.
fn public_message(error: &ServiceError) -> String {
    if error.kind() == ServiceErrorKind::Internal {
        error!(error = %error, "Request failed");
        INTERNAL_NOTICE.to_string()
    } else {
        error.message().to_string()
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = status_code_for(self.kind());
        ApiResponse::<Value>::error_with_status(public_message(&self), status).into_response()
    }
}

/// Error raised by an HTML handler. By default it renders an error page with
/// the matching status; [`PageResultExt::or_redirect`] turns it into an error
/// flash on a redirect instead.
#[derive(Debug)]
pub(crate) struct PageError {
    error: ServiceError,
    redirect_to: Option<String>,
}

impl From<ServiceError> for PageError {
    fn from(error: ServiceError) -> Self {
        Self {
            error,
            redirect_to: None,
        }
    }
}

pub(crate) trait PageResultExt<T> {
    fn or_redirect(self, to: &str) -> Result<T, PageError>;
}

impl<T> PageResultExt<T> for Result<T, ServiceError> {
    fn or_redirect(self, to: &str) -> Result<T, PageError> {
        self.map_err(|error| PageError {
            error,
            redirect_to: Some(to.to_string()),
        })
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let message = public_message(&self.error);
        match self.redirect_to {
            Some(to) => redirect_with_flash(&to, Flash::error(message)),
            None => {
                let status = status_code_for(self.error.kind());
                (status, Html(view::error_page(status.as_u16(), &message))).into_response()
            }
        }
    }
}
