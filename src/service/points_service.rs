use crate::persistence::PointsLogModel;
use crate::repository::points_repository::PointsRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::error::{ServiceError, map_db_error};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

pub(crate) const UPLOAD_REWARD: i32 = 10;
pub(crate) const UPLOAD_REWARD_ACTION: &str = "Uploaded note";
pub(crate) const DELETE_PENALTY: i32 = -10;
pub(crate) const DELETE_PENALTY_ACTION: &str = "Deleted upload";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct LeaderboardEntry {
    pub(crate) username: String,
    pub(crate) total: i64,
}

/// Appends to the ledger on whatever connection the caller holds, so upload
/// creation and deletion can append inside their own transaction.
pub(crate) async fn append_entry<C>(
    db: &C,
    user_id: i32,
    action: &str,
    delta: i32,
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    PointsRepository::append(db, user_id, action, delta)
        .await
        .map_err(map_db_error)?;
    info!(user_id, action, delta, "Points ledger entry appended");
    Ok(())
}

/// Highest total first, ties by username.
pub(crate) fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.username.cmp(&b.username)));
    entries
}

#[derive(Clone)]
pub(crate) struct PointsService {
    db: Arc<DatabaseConnection>,
}

impl PointsService {
    pub(crate) fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub(crate) async fn add_points(
        &self,
        user_id: i32,
        action: &str,
        delta: i32,
    ) -> Result<(), ServiceError> {
        append_entry(self.db.as_ref(), user_id, action, delta).await
    }

    /// Manual correction addressed by username, for staff tooling. Returns the
    /// new total.
    pub(crate) async fn adjust(
        &self,
        username: &str,
        action: &str,
        delta: i32,
    ) -> Result<i64, ServiceError> {
        let action = action.trim();
        if action.is_empty() {
            return Err(ServiceError::validation("An action label is required."));
        }
        if delta == 0 {
            return Err(ServiceError::validation("A zero adjustment changes nothing."));
        }
        let username = username.trim();
        let user = UserRepository::find_by_username(self.db.as_ref(), username)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found(format!("User `{username}` was not found.")))?;

        self.add_points(user.id, action, delta).await?;
        self.total_points(user.id).await
    }

    /// Oldest entry first.
    pub(crate) async fn history(&self, user_id: i32) -> Result<Vec<PointsLogModel>, ServiceError> {
        PointsRepository::entries_for_user(self.db.as_ref(), user_id)
            .await
            .map_err(map_db_error)
    }

    /// Recomputed from the ledger on every call.
    pub(crate) async fn total_points(&self, user_id: i32) -> Result<i64, ServiceError> {
        let total = PointsRepository::sum_for_user(self.db.as_ref(), user_id)
            .await
            .map_err(map_db_error)?;
        Ok(total.unwrap_or(0))
    }

    pub(crate) async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        let sums = PointsRepository::sums_by_user(self.db.as_ref())
            .await
            .map_err(map_db_error)?;
        let user_ids: Vec<i32> = sums.iter().map(|(user_id, _)| *user_id).collect();
        let usernames = UserRepository::usernames_by_ids(self.db.as_ref(), &user_ids)
            .await
            .map_err(map_db_error)?;

        let entries = sums
            .into_iter()
            .filter_map(|(user_id, total)| {
                usernames.get(&user_id).map(|username| LeaderboardEntry {
                    username: username.clone(),
                    total,
                })
            })
            .collect();

        Ok(rank(entries))
    }
}
