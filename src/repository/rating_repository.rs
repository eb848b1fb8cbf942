use crate::persistence::{RatingActiveModel, RatingColumn, RatingEntity};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    sea_query::OnConflict,
};

pub(crate) struct RatingRepository;

impl RatingRepository {
    /// Single-statement upsert keyed on (user_id, upload_id).
    pub(crate) async fn upsert<C>(
        db: &C,
        user_id: i32,
        upload_id: i32,
        stars: i32,
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        RatingEntity::insert(RatingActiveModel {
            user_id: Set(user_id),
            upload_id: Set(upload_id),
            stars: Set(stars),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([RatingColumn::UserId, RatingColumn::UploadId])
                .update_column(RatingColumn::Stars)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
        Ok(())
    }

    pub(crate) async fn stars_for_upload<C>(db: &C, upload_id: i32) -> Result<Vec<i32>, DbErr>
    where
        C: ConnectionTrait,
    {
        RatingEntity::find()
            .select_only()
            .column(RatingColumn::Stars)
            .filter(RatingColumn::UploadId.eq(upload_id))
            .into_tuple()
            .all(db)
            .await
    }

    pub(crate) async fn stars_by_user<C>(
        db: &C,
        upload_id: i32,
        user_id: i32,
    ) -> Result<Option<i32>, DbErr>
    where
        C: ConnectionTrait,
    {
        RatingEntity::find()
            .select_only()
            .column(RatingColumn::Stars)
            .filter(RatingColumn::UploadId.eq(upload_id))
            .filter(RatingColumn::UserId.eq(user_id))
            .into_tuple()
            .one(db)
            .await
    }

    pub(crate) async fn delete_for_upload<C>(db: &C, upload_id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = RatingEntity::delete_many()
            .filter(RatingColumn::UploadId.eq(upload_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
