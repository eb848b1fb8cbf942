pub(crate) mod points_repository;
pub(crate) mod rating_repository;
pub(crate) mod report_repository;
pub(crate) mod session_repository;
pub(crate) mod taxonomy_repository;
pub(crate) mod upload_repository;
pub(crate) mod user_repository;
