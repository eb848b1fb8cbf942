//! Fixtures shared by the service and handler test suites.

use crate::persistence::{SubjectModel, UserActiveModel};
use crate::repository::taxonomy_repository::TaxonomyRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::file_store::IncomingFile;
use crate::service::upload_service::{NewUpload, UploadService};
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use portal_http::{AuthUser, hash_password_with_cost};
use sea_orm::{ActiveValue::Set, ConnectOptions, Database, DatabaseConnection};
use std::{path::PathBuf, sync::Arc};
use uuid::Uuid;

/// bcrypt's minimum work factor keeps the suites fast.
pub(crate) const TEST_HASH_COST: u32 = 4;
pub(crate) const TEST_PASSWORD: &str = "password";

/// Fresh in-memory database with every migration applied. The pool holds a
/// single connection so the database lives as long as the pool.
pub(crate) async fn test_db() -> Arc<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(db)
}

pub(crate) fn temp_storage_dir() -> Arc<PathBuf> {
    let dir = std::env::temp_dir().join(format!(
        "notes-portal-test-{}",
        Uuid::new_v4().simple()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    Arc::new(dir)
}

pub(crate) async fn insert_user(db: &DatabaseConnection, username: &str, is_staff: bool) -> AuthUser {
    let user = UserRepository::insert(
        db,
        UserActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.edu")),
            password_hash: Set(hash_password_with_cost(TEST_PASSWORD, TEST_HASH_COST).unwrap()),
            is_staff: Set(is_staff),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    AuthUser {
        id: user.id,
        username: user.username,
        is_staff: user.is_staff,
    }
}

pub(crate) async fn seed_subject(
    db: &DatabaseConnection,
    branch: &str,
    semester: i32,
    name: &str,
) -> SubjectModel {
    let (branch, _) = TaxonomyRepository::get_or_create_branch(db, branch)
        .await
        .unwrap();
    let (semester, _) = TaxonomyRepository::get_or_create_semester(db, semester)
        .await
        .unwrap();
    TaxonomyRepository::insert_subject_if_absent(db, branch.id, semester.id, name)
        .await
        .unwrap();

    TaxonomyRepository::list_subjects(db, Some(branch.id), Some(semester.id))
        .await
        .unwrap()
        .into_iter()
        .find(|subject| subject.name == name)
        .unwrap()
}

pub(crate) fn incoming_file(bytes: &[u8]) -> IncomingFile {
    IncomingFile {
        original_filename: "notes.pdf".to_string(),
        mime_type: Some("application/pdf".to_string()),
        bytes: bytes.to_vec(),
    }
}

/// A complete, valid request carrying `b"hello notes"`.
pub(crate) fn new_upload(subject_id: i32, title: &str) -> NewUpload {
    NewUpload {
        subject_id: Some(subject_id),
        title: title.to_string(),
        description: "Shared for revision".to_string(),
        upload_type: Some("NOTES".to_string()),
        file: Some(incoming_file(b"hello notes")),
    }
}

pub(crate) struct TestContext {
    pub(crate) db: Arc<DatabaseConnection>,
    pub(crate) storage_dir: Arc<PathBuf>,
    pub(crate) uploads: UploadService,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let db = test_db().await;
        let storage_dir = temp_storage_dir();
        let uploads = UploadService::new(db.clone(), storage_dir.clone());
        Self {
            db,
            storage_dir,
            uploads,
        }
    }
}
