use crate::persistence::{
    UploadActiveModel, UploadColumn, UploadEntity, UploadModel, UploadStatus, UploadType,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::HashMap;

/// Filters applied to an upload listing. `None` means "no constraint".
#[derive(Debug, Clone, Default)]
pub(crate) struct UploadQuery {
    pub(crate) statuses: Option<Vec<UploadStatus>>,
    pub(crate) subject_ids: Option<Vec<i32>>,
    pub(crate) upload_type: Option<UploadType>,
    pub(crate) uploader_id: Option<i32>,
}

pub(crate) struct UploadRepository;

impl UploadRepository {
    pub(crate) async fn insert<C>(
        db: &C,
        active_model: UploadActiveModel,
    ) -> Result<UploadModel, DbErr>
    where
        C: ConnectionTrait,
    {
        active_model.insert(db).await
    }

    pub(crate) async fn find_by_id<C>(db: &C, id: i32) -> Result<Option<UploadModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        UploadEntity::find_by_id(id).one(db).await
    }

    pub(crate) async fn find_owned<C>(
        db: &C,
        id: i32,
        uploader_id: i32,
    ) -> Result<Option<UploadModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        UploadEntity::find_by_id(id)
            .filter(UploadColumn::UploaderId.eq(uploader_id))
            .one(db)
            .await
    }

    pub(crate) async fn update_status<C>(
        db: &C,
        existing: UploadModel,
        status: UploadStatus,
    ) -> Result<UploadModel, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = existing.into_active_model();
        active_model.status = Set(status);
        active_model.update(db).await
    }

    pub(crate) async fn delete_by_id<C>(db: &C, id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = UploadEntity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }

    pub(crate) async fn titles_by_ids<C>(
        db: &C,
        ids: &[i32],
    ) -> Result<HashMap<i32, String>, DbErr>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, String)> = UploadEntity::find()
            .select_only()
            .column(UploadColumn::Id)
            .column(UploadColumn::Title)
            .filter(UploadColumn::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(db)
            .await?;

        Ok(rows.into_iter().collect())
    }

    /// Newest first; ties on `created_at` fall back to id.
    pub(crate) async fn list<C>(db: &C, query: UploadQuery) -> Result<Vec<UploadModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut select = UploadEntity::find();
        if let Some(statuses) = query.statuses {
            select = select.filter(UploadColumn::Status.is_in(statuses));
        }
        if let Some(subject_ids) = query.subject_ids {
            if subject_ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(UploadColumn::SubjectId.is_in(subject_ids));
        }
        if let Some(upload_type) = query.upload_type {
            select = select.filter(UploadColumn::UploadType.eq(upload_type));
        }
        if let Some(uploader_id) = query.uploader_id {
            select = select.filter(UploadColumn::UploaderId.eq(uploader_id));
        }

        select
            .order_by_desc(UploadColumn::CreatedAt)
            .order_by_desc(UploadColumn::Id)
            .all(db)
            .await
    }
}
