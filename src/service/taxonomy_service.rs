use crate::persistence::{BranchModel, SemesterModel, SubjectModel};
use crate::repository::taxonomy_repository::TaxonomyRepository;
use crate::service::error::{ServiceError, map_db_error};
use crate::service::taxonomy_seed::{CATALOGUE, SEMESTER_COUNT};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use tracing::info;

/// Row shape of the subject dropdown endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SubjectOption {
    pub(crate) id: i32,
    pub(crate) name: String,
}

impl From<SubjectModel> for SubjectOption {
    fn from(subject: SubjectModel) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SeedReport {
    pub(crate) branches_created: usize,
    pub(crate) semesters_created: usize,
    pub(crate) subjects_created: usize,
}

#[derive(Clone)]
pub(crate) struct TaxonomyService {
    db: Arc<DatabaseConnection>,
}

impl TaxonomyService {
    pub(crate) fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub(crate) async fn list_branches(&self) -> Result<Vec<BranchModel>, ServiceError> {
        TaxonomyRepository::list_branches(self.db.as_ref())
            .await
            .map_err(map_db_error)
    }

    pub(crate) async fn list_semesters(&self) -> Result<Vec<SemesterModel>, ServiceError> {
        TaxonomyRepository::list_semesters(self.db.as_ref())
            .await
            .map_err(map_db_error)
    }

    /// Filtered by whichever ids are supplied, sorted by name.
    pub(crate) async fn list_subjects(
        &self,
        branch_id: Option<i32>,
        semester_id: Option<i32>,
    ) -> Result<Vec<SubjectOption>, ServiceError> {
        let subjects = TaxonomyRepository::list_subjects(self.db.as_ref(), branch_id, semester_id)
            .await
            .map_err(map_db_error)?;
        Ok(subjects.into_iter().map(SubjectOption::from).collect())
    }

    /// Idempotent: existing rows are left untouched.
    pub(crate) async fn seed_defaults(&self) -> Result<SeedReport, ServiceError> {
        let txn = self.db.begin().await.map_err(map_db_error)?;
        let mut report = SeedReport::default();

        let mut semester_ids = HashMap::new();
        for number in 1..=SEMESTER_COUNT {
            let (semester, created) = TaxonomyRepository::get_or_create_semester(&txn, number)
                .await
                .map_err(map_db_error)?;
            if created {
                report.semesters_created += 1;
            }
            semester_ids.insert(number, semester.id);
        }

        for branch_catalogue in CATALOGUE {
            let (branch, created) =
                TaxonomyRepository::get_or_create_branch(&txn, branch_catalogue.name)
                    .await
                    .map_err(map_db_error)?;
            if created {
                report.branches_created += 1;
            }

            for (number, subjects) in (1..).zip(branch_catalogue.semesters) {
                let semester_id = semester_ids.get(&number).copied().ok_or_else(|| {
                    ServiceError::internal(format!("semester {number} was not seeded"))
                })?;
                for name in subjects {
                    let created = TaxonomyRepository::insert_subject_if_absent(
                        &txn,
                        branch.id,
                        semester_id,
                        name,
                    )
                    .await
                    .map_err(map_db_error)?;
                    if created {
                        report.subjects_created += 1;
                    }
                }
            }
        }

        txn.commit().await.map_err(map_db_error)?;
        info!(
            branches = report.branches_created,
            semesters = report.semesters_created,
            subjects = report.subjects_created,
            "Taxonomy seeded"
        );
        Ok(report)
    }
}
