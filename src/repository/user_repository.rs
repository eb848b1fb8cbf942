use crate::persistence::{UserActiveModel, UserColumn, UserEntity, UserModel};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
};
use std::collections::HashMap;

pub(crate) struct UserRepository;

impl UserRepository {
    pub(crate) async fn insert<C>(db: &C, active_model: UserActiveModel) -> Result<UserModel, DbErr>
    where
        C: ConnectionTrait,
    {
        active_model.insert(db).await
    }

    pub(crate) async fn update<C>(db: &C, active_model: UserActiveModel) -> Result<UserModel, DbErr>
    where
        C: ConnectionTrait,
    {
        active_model.update(db).await
    }

    pub(crate) async fn find_by_id<C>(db: &C, id: i32) -> Result<Option<UserModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        UserEntity::find_by_id(id).one(db).await
    }

    pub(crate) async fn find_by_username<C>(
        db: &C,
        username: &str,
    ) -> Result<Option<UserModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        UserEntity::find()
            .filter(UserColumn::Username.eq(username))
            .one(db)
            .await
    }

    pub(crate) async fn usernames_by_ids<C>(
        db: &C,
        ids: &[i32],
    ) -> Result<HashMap<i32, String>, DbErr>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, String)> = UserEntity::find()
            .select_only()
            .column(UserColumn::Id)
            .column(UserColumn::Username)
            .filter(UserColumn::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(db)
            .await?;

        Ok(rows.into_iter().collect())
    }
}
