pub(crate) mod error;
pub(crate) mod file_store;
pub(crate) mod identity_service;
pub(crate) mod points_service;
pub(crate) mod rating_service;
pub(crate) mod report_service;
pub(crate) mod taxonomy_seed;
pub(crate) mod taxonomy_service;
pub(crate) mod upload_service;

use crate::service::error::ServiceError;
use portal_http::AuthUser;

/// Capability check shared by every staff-only operation.
pub(crate) fn ensure_staff(actor: &AuthUser) -> Result<(), ServiceError> {
    if actor.is_staff {
        Ok(())
    } else {
        Err(ServiceError::forbidden("Staff access required."))
    }
}
