//! Upload lifecycle: creation, owner deletion, staff moderation and the
//! read-only feeds built on top of the upload store.
//!
//! Creation and deletion touch both the upload store and the points ledger;
//! each runs inside one transaction so the two can never disagree.

use crate::persistence::{UploadActiveModel, UploadModel, UploadStatus, UploadType};
use crate::repository::rating_repository::RatingRepository;
use crate::repository::report_repository::ReportRepository;
use crate::repository::taxonomy_repository::TaxonomyRepository;
use crate::repository::upload_repository::{UploadQuery, UploadRepository};
use crate::repository::user_repository::UserRepository;
use crate::service::ensure_staff;
use crate::service::error::{ServiceError, map_db_error};
use crate::service::file_store::{FileStore, IncomingFile, StoredFile};
use crate::service::points_service::{
    DELETE_PENALTY, DELETE_PENALTY_ACTION, UPLOAD_REWARD, UPLOAD_REWARD_ACTION, append_entry,
};
use chrono::Utc;
use portal_http::AuthUser;
use sea_orm::{ActiveValue::Set, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::{collections::HashMap, path::PathBuf, sync::Arc};
use tracing::info;

const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, Clone, Default)]
pub(crate) struct NewUpload {
    pub(crate) subject_id: Option<i32>,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) upload_type: Option<String>,
    pub(crate) file: Option<IncomingFile>,
}

/// Home feed query. Every field is optional.
#[derive(Debug, Clone, Default)]
pub(crate) struct FeedFilter {
    pub(crate) branch_id: Option<i32>,
    pub(crate) semester_id: Option<i32>,
    pub(crate) subject_id: Option<i32>,
    pub(crate) upload_type: Option<String>,
}

/// An upload with the names its list rows display.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UploadListing {
    pub(crate) upload: UploadModel,
    pub(crate) subject_name: String,
    pub(crate) uploader_username: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Download {
    pub(crate) filename: String,
    pub(crate) mime_type: Option<String>,
    pub(crate) bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Unchanged,
    Changed,
}

/// Staff may move any upload to `Verified` or `Removed`, including between
/// the two. Nothing moves back to `Unverified`.
pub(crate) fn transition(
    current: UploadStatus,
    target: UploadStatus,
) -> Result<Transition, ServiceError> {
    match target {
        UploadStatus::Unverified => Err(ServiceError::validation(
            "Uploads can only be verified or removed.",
        )),
        _ if current == target => Ok(Transition::Unchanged),
        _ => Ok(Transition::Changed),
    }
}

fn upload_not_found(upload_id: i32) -> ServiceError {
    ServiceError::not_found(format!("Upload {upload_id} was not found."))
}

/// Removed uploads stay reachable for their uploader and for staff only.
pub(crate) fn visible_to(upload: &UploadModel, requester: &AuthUser) -> bool {
    upload.status != UploadStatus::Removed
        || upload.uploader_id == requester.id
        || requester.is_staff
}

#[derive(Clone)]
pub(crate) struct UploadService {
    db: Arc<DatabaseConnection>,
    files: FileStore,
}

impl UploadService {
    pub(crate) fn new(db: Arc<DatabaseConnection>, storage_dir: Arc<PathBuf>) -> Self {
        Self {
            db,
            files: FileStore::new(storage_dir),
        }
    }

    pub(crate) async fn create_upload(
        &self,
        uploader: &AuthUser,
        request: NewUpload,
    ) -> Result<UploadModel, ServiceError> {
        let title = request.title.trim();
        let (Some(subject_id), Some(raw_type), Some(file)) =
            (request.subject_id, request.upload_type.as_deref(), request.file.as_ref())
        else {
            return Err(ServiceError::validation("Please fill all required fields."));
        };
        if title.is_empty() || raw_type.trim().is_empty() || file.bytes.is_empty() {
            return Err(ServiceError::validation("Please fill all required fields."));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(ServiceError::validation(format!(
                "Title must be at most {MAX_TITLE_LEN} characters."
            )));
        }
        let upload_type = UploadType::parse(raw_type)
            .ok_or_else(|| ServiceError::validation(format!("Unknown upload type `{raw_type}`.")))?;

        TaxonomyRepository::find_subject(self.db.as_ref(), subject_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::validation("Selected subject does not exist."))?;

        let stored = self.files.store(&file.bytes).await?;
        let active_model = UploadActiveModel {
            uploader_id: Set(uploader.id),
            subject_id: Set(subject_id),
            title: Set(title.to_string()),
            description: Set(request.description.trim().to_string()),
            file_ref: Set(stored.file_ref.clone()),
            original_filename: Set(file.original_filename.clone()),
            mime_type: Set(file.mime_type.clone()),
            byte_size: Set(stored.byte_size),
            file_sha256: Set(stored.sha256.clone()),
            upload_type: Set(upload_type),
            status: Set(UploadStatus::Unverified),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        match self.insert_with_reward(uploader, active_model).await {
            Ok(upload) => {
                info!(
                    upload_id = upload.id,
                    uploader_id = uploader.id,
                    subject_id,
                    upload_type = upload_type.code(),
                    byte_size = stored.byte_size,
                    "Upload created"
                );
                Ok(upload)
            }
            Err(error) => {
                self.discard(&stored).await;
                Err(error)
            }
        }
    }

    async fn insert_with_reward(
        &self,
        uploader: &AuthUser,
        active_model: UploadActiveModel,
    ) -> Result<UploadModel, ServiceError> {
        let txn = self.db.begin().await.map_err(map_db_error)?;
        let upload = UploadRepository::insert(&txn, active_model)
            .await
            .map_err(map_db_error)?;
        append_entry(&txn, uploader.id, UPLOAD_REWARD_ACTION, UPLOAD_REWARD).await?;
        txn.commit().await.map_err(map_db_error)?;
        Ok(upload)
    }

    async fn discard(&self, stored: &StoredFile) {
        self.files.remove(&stored.file_ref).await;
    }

    /// Only the uploader may delete; anyone else sees "not found".
    pub(crate) async fn delete_upload(
        &self,
        upload_id: i32,
        requester: &AuthUser,
    ) -> Result<UploadModel, ServiceError> {
        let txn = self.db.begin().await.map_err(map_db_error)?;
        let upload = UploadRepository::find_owned(&txn, upload_id, requester.id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| upload_not_found(upload_id))?;

        let ratings = RatingRepository::delete_for_upload(&txn, upload.id)
            .await
            .map_err(map_db_error)?;
        let reports = ReportRepository::delete_for_upload(&txn, upload.id)
            .await
            .map_err(map_db_error)?;
        let rows_affected = UploadRepository::delete_by_id(&txn, upload.id)
            .await
            .map_err(map_db_error)?;
        if rows_affected == 0 {
            return Err(upload_not_found(upload_id));
        }
        append_entry(&txn, requester.id, DELETE_PENALTY_ACTION, DELETE_PENALTY).await?;
        txn.commit().await.map_err(map_db_error)?;

        self.files.remove(&upload.file_ref).await;
        info!(
            upload_id,
            user_id = requester.id,
            ratings,
            reports,
            "Upload deleted"
        );
        Ok(upload)
    }

    pub(crate) async fn set_status(
        &self,
        upload_id: i32,
        target: UploadStatus,
        requester: &AuthUser,
    ) -> Result<UploadModel, ServiceError> {
        ensure_staff(requester)?;

        let upload = UploadRepository::find_by_id(self.db.as_ref(), upload_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| upload_not_found(upload_id))?;

        let from = upload.status;
        match transition(from, target)? {
            Transition::Unchanged => Ok(upload),
            Transition::Changed => {
                let updated = UploadRepository::update_status(self.db.as_ref(), upload, target)
                    .await
                    .map_err(map_db_error)?;
                info!(
                    upload_id,
                    staff_id = requester.id,
                    from = from.code(),
                    to = target.code(),
                    "Upload status changed"
                );
                Ok(updated)
            }
        }
    }

    pub(crate) async fn get_listing(
        &self,
        upload_id: i32,
        requester: &AuthUser,
    ) -> Result<UploadListing, ServiceError> {
        let upload = UploadRepository::find_by_id(self.db.as_ref(), upload_id)
            .await
            .map_err(map_db_error)?
            .filter(|upload| visible_to(upload, requester))
            .ok_or_else(|| upload_not_found(upload_id))?;

        self.with_names(vec![upload])
            .await?
            .pop()
            .ok_or_else(|| upload_not_found(upload_id))
    }

    /// Verified and unverified uploads, newest first.
    pub(crate) async fn home_feed(
        &self,
        filter: FeedFilter,
    ) -> Result<Vec<UploadListing>, ServiceError> {
        let upload_type = match filter.upload_type.as_deref() {
            None => None,
            Some(raw) => match UploadType::parse(raw) {
                Some(upload_type) => Some(upload_type),
                // an unknown type matches nothing
                None => return Ok(Vec::new()),
            },
        };

        let mut subject_ids = None;
        if filter.branch_id.is_some() || filter.semester_id.is_some() {
            let ids = TaxonomyRepository::subject_ids_matching(
                self.db.as_ref(),
                filter.branch_id,
                filter.semester_id,
            )
            .await
            .map_err(map_db_error)?;
            subject_ids = Some(ids);
        }
        if let Some(subject_id) = filter.subject_id {
            subject_ids = Some(match subject_ids {
                Some(ids) => ids.into_iter().filter(|id| *id == subject_id).collect(),
                None => vec![subject_id],
            });
        }

        let uploads = UploadRepository::list(
            self.db.as_ref(),
            UploadQuery {
                statuses: Some(vec![UploadStatus::Verified, UploadStatus::Unverified]),
                subject_ids,
                upload_type,
                uploader_id: None,
            },
        )
        .await
        .map_err(map_db_error)?;

        self.with_names(uploads).await
    }

    pub(crate) async fn list_user_uploads(
        &self,
        user: &AuthUser,
    ) -> Result<Vec<UploadListing>, ServiceError> {
        let uploads = UploadRepository::list(
            self.db.as_ref(),
            UploadQuery {
                uploader_id: Some(user.id),
                ..Default::default()
            },
        )
        .await
        .map_err(map_db_error)?;

        self.with_names(uploads).await
    }

    pub(crate) async fn list_all_uploads(
        &self,
        requester: &AuthUser,
    ) -> Result<Vec<UploadListing>, ServiceError> {
        ensure_staff(requester)?;
        let uploads = UploadRepository::list(self.db.as_ref(), UploadQuery::default())
            .await
            .map_err(map_db_error)?;

        self.with_names(uploads).await
    }

    pub(crate) async fn download(
        &self,
        upload_id: i32,
        requester: &AuthUser,
    ) -> Result<Download, ServiceError> {
        let upload = UploadRepository::find_by_id(self.db.as_ref(), upload_id)
            .await
            .map_err(map_db_error)?
            .filter(|upload| visible_to(upload, requester))
            .ok_or_else(|| upload_not_found(upload_id))?;

        let bytes = self.files.read(&upload.file_ref).await?;
        Ok(Download {
            filename: upload.original_filename,
            mime_type: upload.mime_type,
            bytes,
        })
    }

    async fn with_names(
        &self,
        uploads: Vec<UploadModel>,
    ) -> Result<Vec<UploadListing>, ServiceError> {
        let mut subject_ids: Vec<i32> = uploads.iter().map(|upload| upload.subject_id).collect();
        subject_ids.sort_unstable();
        subject_ids.dedup();
        let mut uploader_ids: Vec<i32> = uploads.iter().map(|upload| upload.uploader_id).collect();
        uploader_ids.sort_unstable();
        uploader_ids.dedup();

        let subject_names: HashMap<i32, String> =
            TaxonomyRepository::subjects_by_ids(self.db.as_ref(), &subject_ids)
                .await
                .map_err(map_db_error)?
                .into_iter()
                .map(|subject| (subject.id, subject.name))
                .collect();
        let usernames = UserRepository::usernames_by_ids(self.db.as_ref(), &uploader_ids)
            .await
            .map_err(map_db_error)?;

        Ok(uploads
            .into_iter()
            .map(|upload| UploadListing {
                subject_name: subject_names
                    .get(&upload.subject_id)
                    .cloned()
                    .unwrap_or_default(),
                uploader_username: usernames
                    .get(&upload.uploader_id)
                    .cloned()
                    .unwrap_or_default(),
                upload,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{
        PointsLogEntity, RatingEntity, ReportActiveModel, ReportEntity, ReportReason,
        UploadEntity,
    };
    use crate::repository::points_repository::PointsRepository;
    use crate::service::error::ServiceErrorKind;
    use crate::service::points_service::PointsService;
    use crate::test_support::{
        TestContext, incoming_file, insert_user, new_upload, seed_subject,
    };
    use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};

    async fn upload_count(db: &DatabaseConnection) -> u64 {
        UploadEntity::find().count(db).await.unwrap()
    }

    async fn ledger(db: &DatabaseConnection, user_id: i32) -> Vec<(String, i32)> {
        PointsRepository::entries_for_user(db, user_id)
            .await
            .unwrap()
            .into_iter()
            .map(|entry| (entry.action, entry.points_change))
            .collect()
    }

    fn stored_blob_count(ctx: &TestContext) -> usize {
        std::fs::read_dir(ctx.storage_dir.as_path()).unwrap().count()
    }

    #[tokio::test]
    async fn create_inserts_one_upload_and_one_reward() {
        let ctx = TestContext::new().await;
        let alice = insert_user(&ctx.db, "alice", false).await;
        let subject = seed_subject(&ctx.db, "CSE", 3, "Data Structures").await;

        let upload = ctx
            .uploads
            .create_upload(&alice, new_upload(subject.id, "Trees cheat sheet"))
            .await
            .unwrap();

        assert_eq!(upload.status, UploadStatus::Unverified);
        assert_eq!(upload.uploader_id, alice.id);
        assert_eq!(upload.upload_type, UploadType::Notes);
        assert_eq!(upload.byte_size, 11);
        assert_eq!(upload_count(&ctx.db).await, 1);
        assert_eq!(
            ledger(&ctx.db, alice.id).await,
            vec![("Uploaded note".to_string(), 10)]
        );
        assert_eq!(stored_blob_count(&ctx), 1);
    }

    #[tokio::test]
    async fn create_rejects_missing_or_unknown_input() {
        let ctx = TestContext::new().await;
        let alice = insert_user(&ctx.db, "alice", false).await;
        let subject = seed_subject(&ctx.db, "CSE", 3, "Data Structures").await;

        let cases = [
            NewUpload {
                subject_id: None,
                ..new_upload(subject.id, "t")
            },
            NewUpload {
                title: "   ".to_string(),
                ..new_upload(subject.id, "t")
            },
            NewUpload {
                upload_type: None,
                ..new_upload(subject.id, "t")
            },
            NewUpload {
                upload_type: Some("ESSAY".to_string()),
                ..new_upload(subject.id, "t")
            },
            NewUpload {
                file: None,
                ..new_upload(subject.id, "t")
            },
            NewUpload {
                file: Some(incoming_file(b"")),
                ..new_upload(subject.id, "t")
            },
            new_upload(subject.id + 100, "t"),
        ];

        for request in cases {
            let error = ctx.uploads.create_upload(&alice, request).await.unwrap_err();
            assert_eq!(error.kind(), ServiceErrorKind::Validation, "{error}");
        }
        assert_eq!(upload_count(&ctx.db).await, 0);
        assert!(ledger(&ctx.db, alice.id).await.is_empty());
        assert_eq!(stored_blob_count(&ctx), 0);
    }

    #[tokio::test]
    async fn failed_ledger_append_rolls_back_the_upload() {
        let ctx = TestContext::new().await;
        let alice = insert_user(&ctx.db, "alice", false).await;
        let subject = seed_subject(&ctx.db, "CSE", 3, "Data Structures").await;
        ctx.db
            .execute_unprepared("DROP TABLE points_logs")
            .await
            .unwrap();

        let error = ctx
            .uploads
            .create_upload(&alice, new_upload(subject.id, "Doomed"))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ServiceErrorKind::Internal);
        assert_eq!(upload_count(&ctx.db).await, 0);
        assert_eq!(stored_blob_count(&ctx), 0);
    }

    #[tokio::test]
    async fn owner_delete_cascades_and_charges_points() {
        let ctx = TestContext::new().await;
        let alice = insert_user(&ctx.db, "alice", false).await;
        let bob = insert_user(&ctx.db, "bob", false).await;
        let subject = seed_subject(&ctx.db, "CSE", 3, "Data Structures").await;
        let upload = ctx
            .uploads
            .create_upload(&alice, new_upload(subject.id, "Graphs"))
            .await
            .unwrap();
        RatingRepository::upsert(ctx.db.as_ref(), bob.id, upload.id, 4)
            .await
            .unwrap();
        ReportRepository::insert_if_absent(
            ctx.db.as_ref(),
            ReportActiveModel {
                reporter_id: Set(bob.id),
                upload_id: Set(upload.id),
                reason: Set(ReportReason::Spam),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        ctx.uploads.delete_upload(upload.id, &alice).await.unwrap();

        assert_eq!(upload_count(&ctx.db).await, 0);
        assert_eq!(RatingEntity::find().count(ctx.db.as_ref()).await.unwrap(), 0);
        assert_eq!(ReportEntity::find().count(ctx.db.as_ref()).await.unwrap(), 0);
        assert_eq!(
            ledger(&ctx.db, alice.id).await,
            vec![
                ("Uploaded note".to_string(), 10),
                ("Deleted upload".to_string(), -10)
            ]
        );
        assert_eq!(stored_blob_count(&ctx), 0);
    }

    #[tokio::test]
    async fn non_owner_delete_is_not_found_and_changes_nothing() {
        let ctx = TestContext::new().await;
        let alice = insert_user(&ctx.db, "alice", false).await;
        let mallory = insert_user(&ctx.db, "mallory", false).await;
        let subject = seed_subject(&ctx.db, "CSE", 3, "Data Structures").await;
        let upload = ctx
            .uploads
            .create_upload(&alice, new_upload(subject.id, "Heaps"))
            .await
            .unwrap();

        let error = ctx
            .uploads
            .delete_upload(upload.id, &mallory)
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ServiceErrorKind::NotFound);
        assert_eq!(upload_count(&ctx.db).await, 1);
        assert!(ledger(&ctx.db, mallory.id).await.is_empty());
        assert_eq!(PointsLogEntity::find().count(ctx.db.as_ref()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_ledger_append_keeps_the_upload() {
        let ctx = TestContext::new().await;
        let alice = insert_user(&ctx.db, "alice", false).await;
        let subject = seed_subject(&ctx.db, "CSE", 3, "Data Structures").await;
        let upload = ctx
            .uploads
            .create_upload(&alice, new_upload(subject.id, "Tries"))
            .await
            .unwrap();
        ctx.db
            .execute_unprepared("DROP TABLE points_logs")
            .await
            .unwrap();

        assert!(ctx.uploads.delete_upload(upload.id, &alice).await.is_err());
        assert_eq!(upload_count(&ctx.db).await, 1);
        assert_eq!(stored_blob_count(&ctx), 1);
    }

    #[tokio::test]
    async fn only_staff_moderate() {
        let ctx = TestContext::new().await;
        let alice = insert_user(&ctx.db, "alice", false).await;
        let staff = insert_user(&ctx.db, "mod", true).await;
        let subject = seed_subject(&ctx.db, "CSE", 3, "Data Structures").await;
        let upload = ctx
            .uploads
            .create_upload(&alice, new_upload(subject.id, "Sorting"))
            .await
            .unwrap();

        let forbidden = ctx
            .uploads
            .set_status(upload.id, UploadStatus::Verified, &alice)
            .await
            .unwrap_err();
        assert_eq!(forbidden.kind(), ServiceErrorKind::Forbidden);

        let missing = ctx
            .uploads
            .set_status(upload.id + 1, UploadStatus::Verified, &staff)
            .await
            .unwrap_err();
        assert_eq!(missing.kind(), ServiceErrorKind::NotFound);

        let backwards = ctx
            .uploads
            .set_status(upload.id, UploadStatus::Unverified, &staff)
            .await
            .unwrap_err();
        assert_eq!(backwards.kind(), ServiceErrorKind::Validation);

        let verified = ctx
            .uploads
            .set_status(upload.id, UploadStatus::Verified, &staff)
            .await
            .unwrap();
        assert_eq!(verified.status, UploadStatus::Verified);
        let again = ctx
            .uploads
            .set_status(upload.id, UploadStatus::Verified, &staff)
            .await
            .unwrap();
        assert_eq!(again, verified);

        let removed = ctx
            .uploads
            .set_status(upload.id, UploadStatus::Removed, &staff)
            .await
            .unwrap();
        assert_eq!(removed.status, UploadStatus::Removed);

        // moderation never touches the ledger
        assert_eq!(PointsLogEntity::find().count(ctx.db.as_ref()).await.unwrap(), 1);
        assert!(ledger(&ctx.db, staff.id).await.is_empty());
    }

    #[tokio::test]
    async fn alice_upload_verify_delete_nets_zero() {
        let ctx = TestContext::new().await;
        let alice = insert_user(&ctx.db, "alice", false).await;
        let staff = insert_user(&ctx.db, "mod", true).await;
        let subject = seed_subject(&ctx.db, "ECE", 1, "Applied Physics").await;
        let points = PointsService::new(ctx.db.clone());

        let upload = ctx
            .uploads
            .create_upload(&alice, new_upload(subject.id, "Optics"))
            .await
            .unwrap();
        assert_eq!(points.total_points(alice.id).await.unwrap(), 10);

        ctx.uploads
            .set_status(upload.id, UploadStatus::Verified, &staff)
            .await
            .unwrap();
        assert_eq!(points.total_points(alice.id).await.unwrap(), 10);

        ctx.uploads.delete_upload(upload.id, &alice).await.unwrap();

        assert_eq!(points.total_points(alice.id).await.unwrap(), 0);
        assert!(
            UploadRepository::find_by_id(ctx.db.as_ref(), upload.id)
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(ledger(&ctx.db, alice.id).await.len(), 2);
    }

    #[tokio::test]
    async fn home_feed_hides_removed_and_applies_filters() {
        let ctx = TestContext::new().await;
        let alice = insert_user(&ctx.db, "alice", false).await;
        let staff = insert_user(&ctx.db, "mod", true).await;
        let dsa = seed_subject(&ctx.db, "CSE", 3, "Data Structures").await;
        let dbms = seed_subject(&ctx.db, "CSE", 4, "DBMS").await;
        let signals = seed_subject(&ctx.db, "ECE", 3, "Signals and Systems").await;

        let first = ctx
            .uploads
            .create_upload(&alice, new_upload(dsa.id, "Stacks"))
            .await
            .unwrap();
        let second = ctx
            .uploads
            .create_upload(
                &alice,
                NewUpload {
                    upload_type: Some("PYQ".to_string()),
                    ..new_upload(dbms.id, "2023 paper")
                },
            )
            .await
            .unwrap();
        let third = ctx
            .uploads
            .create_upload(&alice, new_upload(signals.id, "Fourier"))
            .await
            .unwrap();
        let removed = ctx
            .uploads
            .create_upload(&alice, new_upload(dsa.id, "Spam"))
            .await
            .unwrap();
        ctx.uploads
            .set_status(removed.id, UploadStatus::Removed, &staff)
            .await
            .unwrap();
        ctx.uploads
            .set_status(first.id, UploadStatus::Verified, &staff)
            .await
            .unwrap();

        let ids = |listings: Vec<UploadListing>| -> Vec<i32> {
            listings.into_iter().map(|l| l.upload.id).collect()
        };

        let all = ctx.uploads.home_feed(FeedFilter::default()).await.unwrap();
        assert_eq!(all[0].subject_name, "Signals and Systems");
        assert_eq!(all[0].uploader_username, "alice");
        assert_eq!(ids(all), [third.id, second.id, first.id]);

        let cse = ctx
            .uploads
            .home_feed(FeedFilter {
                branch_id: Some(dsa.branch_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ids(cse), [second.id, first.id]);

        let sem3 = ctx
            .uploads
            .home_feed(FeedFilter {
                semester_id: Some(dsa.semester_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ids(sem3), [third.id, first.id]);

        let pyq = ctx
            .uploads
            .home_feed(FeedFilter {
                upload_type: Some("PYQ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ids(pyq), [second.id]);

        let mismatched = ctx
            .uploads
            .home_feed(FeedFilter {
                branch_id: Some(signals.branch_id),
                subject_id: Some(dsa.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(mismatched.is_empty());

        let unknown_type = ctx
            .uploads
            .home_feed(FeedFilter {
                upload_type: Some("ESSAY".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(unknown_type.is_empty());
    }

    #[tokio::test]
    async fn own_and_admin_lists() {
        let ctx = TestContext::new().await;
        let alice = insert_user(&ctx.db, "alice", false).await;
        let bob = insert_user(&ctx.db, "bob", false).await;
        let staff = insert_user(&ctx.db, "mod", true).await;
        let subject = seed_subject(&ctx.db, "CSE", 3, "Data Structures").await;
        let mine = ctx
            .uploads
            .create_upload(&alice, new_upload(subject.id, "Mine"))
            .await
            .unwrap();
        ctx.uploads
            .create_upload(&bob, new_upload(subject.id, "Theirs"))
            .await
            .unwrap();
        ctx.uploads
            .set_status(mine.id, UploadStatus::Removed, &staff)
            .await
            .unwrap();

        let own = ctx.uploads.list_user_uploads(&alice).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].upload.status, UploadStatus::Removed);

        let denied = ctx.uploads.list_all_uploads(&alice).await.unwrap_err();
        assert_eq!(denied.kind(), ServiceErrorKind::Forbidden);
        assert_eq!(ctx.uploads.list_all_uploads(&staff).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn removed_upload_downloads_only_for_owner_and_staff() {
        let ctx = TestContext::new().await;
        let alice = insert_user(&ctx.db, "alice", false).await;
        let bob = insert_user(&ctx.db, "bob", false).await;
        let staff = insert_user(&ctx.db, "mod", true).await;
        let subject = seed_subject(&ctx.db, "CSE", 3, "Data Structures").await;
        let upload = ctx
            .uploads
            .create_upload(&alice, new_upload(subject.id, "Queues"))
            .await
            .unwrap();

        let download = ctx.uploads.download(upload.id, &bob).await.unwrap();
        assert_eq!(download.bytes, b"hello notes");
        assert_eq!(download.filename, "notes.pdf");

        ctx.uploads
            .set_status(upload.id, UploadStatus::Removed, &staff)
            .await
            .unwrap();
        let hidden = ctx.uploads.download(upload.id, &bob).await.unwrap_err();
        assert_eq!(hidden.kind(), ServiceErrorKind::NotFound);
        assert!(ctx.uploads.download(upload.id, &alice).await.is_ok());
        assert!(ctx.uploads.download(upload.id, &staff).await.is_ok());
    }

    #[tokio::test]
    async fn listing_carries_names_and_hides_removed_uploads() {
        let ctx = TestContext::new().await;
        let alice = insert_user(&ctx.db, "alice", false).await;
        let bob = insert_user(&ctx.db, "bob", false).await;
        let staff = insert_user(&ctx.db, "mod", true).await;
        let subject = seed_subject(&ctx.db, "CSE", 3, "Data Structures").await;
        let upload = ctx
            .uploads
            .create_upload(&alice, new_upload(subject.id, "Stacks"))
            .await
            .unwrap();

        let listing = ctx.uploads.get_listing(upload.id, &bob).await.unwrap();
        assert_eq!(listing.subject_name, "Data Structures");
        assert_eq!(listing.uploader_username, "alice");

        ctx.uploads
            .set_status(upload.id, UploadStatus::Removed, &staff)
            .await
            .unwrap();
        let hidden = ctx.uploads.get_listing(upload.id, &bob).await.unwrap_err();
        assert_eq!(hidden.kind(), ServiceErrorKind::NotFound);
        assert!(ctx.uploads.get_listing(upload.id, &alice).await.is_ok());
        assert!(ctx.uploads.get_listing(upload.id, &staff).await.is_ok());
    }

    #[test]
    fn transition_rules() {
        use UploadStatus::*;
        assert_eq!(transition(Unverified, Verified).unwrap(), Transition::Changed);
        assert_eq!(transition(Unverified, Removed).unwrap(), Transition::Changed);
        assert_eq!(transition(Verified, Removed).unwrap(), Transition::Changed);
        assert_eq!(transition(Removed, Verified).unwrap(), Transition::Changed);
        assert_eq!(transition(Verified, Verified).unwrap(), Transition::Unchanged);
        assert!(transition(Verified, Unverified).is_err());
        assert!(transition(Unverified, Unverified).is_err());
    }
}
