use crate::persistence::{PointsLogActiveModel, PointsLogColumn, PointsLogEntity, PointsLogModel};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

pub(crate) struct PointsRepository;

impl PointsRepository {
    pub(crate) async fn append<C>(
        db: &C,
        user_id: i32,
        action: &str,
        points_change: i32,
    ) -> Result<PointsLogModel, DbErr>
    where
        C: ConnectionTrait,
    {
        PointsLogActiveModel {
            user_id: Set(user_id),
            action: Set(action.to_string()),
            points_change: Set(points_change),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// `SUM(points_change)` for one user; `None` when the user has no entries.
    pub(crate) async fn sum_for_user<C>(db: &C, user_id: i32) -> Result<Option<i64>, DbErr>
    where
        C: ConnectionTrait,
    {
        let total: Option<Option<i64>> = PointsLogEntity::find()
            .select_only()
            .column_as(PointsLogColumn::PointsChange.sum(), "total")
            .filter(PointsLogColumn::UserId.eq(user_id))
            .into_tuple()
            .one(db)
            .await?;
        Ok(total.flatten())
    }

    /// Per-user sums over the whole ledger, unordered.
    pub(crate) async fn sums_by_user<C>(db: &C) -> Result<Vec<(i32, i64)>, DbErr>
    where
        C: ConnectionTrait,
    {
        PointsLogEntity::find()
            .select_only()
            .column(PointsLogColumn::UserId)
            .column_as(PointsLogColumn::PointsChange.sum(), "total")
            .group_by(PointsLogColumn::UserId)
            .into_tuple()
            .all(db)
            .await
    }

    pub(crate) async fn entries_for_user<C>(
        db: &C,
        user_id: i32,
    ) -> Result<Vec<PointsLogModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        PointsLogEntity::find()
            .filter(PointsLogColumn::UserId.eq(user_id))
            .order_by_asc(PointsLogColumn::Id)
            .all(db)
            .await
    }
}
