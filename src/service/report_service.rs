use crate::persistence::{ReportActiveModel, ReportModel, ReportReason};
use crate::repository::report_repository::ReportRepository;
use crate::repository::upload_repository::UploadRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::ensure_staff;
use crate::service::error::{ServiceError, map_db_error};
use crate::service::upload_service::visible_to;
use chrono::Utc;
use portal_http::AuthUser;
use sea_orm::{ActiveValue::Set, DatabaseConnection};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReportOutcome {
    Filed,
    AlreadyReported,
}

#[derive(Debug, Clone)]
pub(crate) struct ReportListing {
    pub(crate) report: ReportModel,
    pub(crate) upload_title: String,
    pub(crate) reporter_username: String,
}

#[derive(Clone)]
pub(crate) struct ReportService {
    db: Arc<DatabaseConnection>,
}

impl ReportService {
    pub(crate) fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// First report per (reporter, upload) wins; repeats succeed without
    /// writing anything.
    pub(crate) async fn report(
        &self,
        upload_id: i32,
        reporter: &AuthUser,
        reason: &str,
    ) -> Result<ReportOutcome, ServiceError> {
        let reason = ReportReason::parse(reason)
            .ok_or_else(|| ServiceError::validation("Invalid report reason."))?;
        UploadRepository::find_by_id(self.db.as_ref(), upload_id)
            .await
            .map_err(map_db_error)?
            .filter(|upload| visible_to(upload, reporter))
            .ok_or_else(|| {
                ServiceError::validation("Cannot report an upload that does not exist.")
            })?;

        let inserted = ReportRepository::insert_if_absent(
            self.db.as_ref(),
            ReportActiveModel {
                reporter_id: Set(reporter.id),
                upload_id: Set(upload_id),
                reason: Set(reason),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            },
        )
        .await
        .map_err(map_db_error)?;

        if inserted == 0 {
            return Ok(ReportOutcome::AlreadyReported);
        }
        info!(
            upload_id,
            reporter_id = reporter.id,
            reason = reason.code(),
            "Report filed"
        );
        Ok(ReportOutcome::Filed)
    }

    /// Staff only, newest first.
    pub(crate) async fn list_reports(
        &self,
        requester: &AuthUser,
    ) -> Result<Vec<ReportListing>, ServiceError> {
        ensure_staff(requester)?;

        let reports = ReportRepository::list_all(self.db.as_ref())
            .await
            .map_err(map_db_error)?;
        let upload_ids: Vec<i32> = reports.iter().map(|r| r.upload_id).collect();
        let reporter_ids: Vec<i32> = reports.iter().map(|r| r.reporter_id).collect();
        let titles = UploadRepository::titles_by_ids(self.db.as_ref(), &upload_ids)
            .await
            .map_err(map_db_error)?;
        let usernames = UserRepository::usernames_by_ids(self.db.as_ref(), &reporter_ids)
            .await
            .map_err(map_db_error)?;

        Ok(reports
            .into_iter()
            .map(|report| ReportListing {
                upload_title: titles.get(&report.upload_id).cloned().unwrap_or_default(),
                reporter_username: usernames
                    .get(&report.reporter_id)
                    .cloned()
                    .unwrap_or_default(),
                report,
            })
            .collect())
    }
}
