use crate::persistence::{ReportActiveModel, ReportColumn, ReportEntity, ReportModel};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};

pub(crate) struct ReportRepository;

impl ReportRepository {
    /// `INSERT .. ON CONFLICT (reporter_id, upload_id) DO NOTHING`.
    /// Returns the number of rows written: 0 means a report already existed.
    pub(crate) async fn insert_if_absent<C>(
        db: &C,
        active_model: ReportActiveModel,
    ) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        ReportEntity::insert(active_model)
            .on_conflict(
                OnConflict::columns([ReportColumn::ReporterId, ReportColumn::UploadId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await
    }

    pub(crate) async fn list_all<C>(db: &C) -> Result<Vec<ReportModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        ReportEntity::find()
            .order_by_desc(ReportColumn::CreatedAt)
            .order_by_desc(ReportColumn::Id)
            .all(db)
            .await
    }

    pub(crate) async fn delete_for_upload<C>(db: &C, upload_id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = ReportEntity::delete_many()
            .filter(ReportColumn::UploadId.eq(upload_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
