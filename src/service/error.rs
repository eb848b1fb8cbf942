use sea_orm::DbErr;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ServiceErrorKind {
    Validation,
    NotFound,
    Forbidden,
    Conflict,
    Internal,
}

#[derive(Debug, Clone)]
pub(crate) struct ServiceError {
    kind: ServiceErrorKind,
    message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Validation, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::NotFound, message)
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Forbidden, message)
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Conflict, message)
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Internal, message)
    }

    pub(crate) fn kind(&self) -> ServiceErrorKind {
        self.kind
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ServiceError {}

pub(crate) fn map_db_error(error: DbErr) -> ServiceError {
    match error {
        DbErr::RecordNotFound(message) => ServiceError::not_found(message),
        DbErr::Json(message) | DbErr::Type(message) => ServiceError::validation(message),
        other => {
            let message = other.to_string();
            let lowered = message.to_ascii_lowercase();

            if lowered.contains("unique constraint failed")
                || lowered.contains("foreign key constraint failed")
            {
                ServiceError::conflict(message)
            } else if lowered.contains("not null constraint failed")
                || lowered.contains("check constraint failed")
                || lowered.contains("datatype mismatch")
            {
                ServiceError::validation(message)
            } else {
                ServiceError::internal(message)
            }
        }
    }
}
