use crate::persistence::{SessionActiveModel, SessionColumn, SessionEntity, SessionModel};
use chrono::{DateTime, FixedOffset};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

pub(crate) struct SessionRepository;

impl SessionRepository {
    pub(crate) async fn insert<C>(
        db: &C,
        active_model: SessionActiveModel,
    ) -> Result<SessionModel, DbErr>
    where
        C: ConnectionTrait,
    {
        active_model.insert(db).await
    }

    pub(crate) async fn find_by_token<C>(db: &C, token: &str) -> Result<Option<SessionModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        SessionEntity::find()
            .filter(SessionColumn::Token.eq(token))
            .one(db)
            .await
    }

    pub(crate) async fn delete_by_token<C>(db: &C, token: &str) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = SessionEntity::delete_many()
            .filter(SessionColumn::Token.eq(token))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    pub(crate) async fn delete_expired<C>(db: &C, now: DateTime<FixedOffset>) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = SessionEntity::delete_many()
            .filter(SessionColumn::ExpiresAt.lte(now))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
