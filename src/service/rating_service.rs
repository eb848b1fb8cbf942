use crate::repository::rating_repository::RatingRepository;
use crate::repository::upload_repository::UploadRepository;
use crate::service::error::{ServiceError, map_db_error};
use crate::service::upload_service::visible_to;
use portal_http::AuthUser;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::{ops::RangeInclusive, sync::Arc};
use tracing::info;

pub(crate) const STAR_RANGE: RangeInclusive<i32> = 1..=5;

/// `average` is `None` when nobody has rated yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct RatingSummary {
    pub(crate) average: Option<f64>,
    pub(crate) count: u64,
}

impl RatingSummary {
    fn from_stars(stars: &[i32]) -> Self {
        let count = stars.len() as u64;
        let average = (count > 0).then(|| {
            let sum: i64 = stars.iter().map(|s| i64::from(*s)).sum();
            sum as f64 / count as f64
        });
        Self { average, count }
    }
}

#[derive(Clone)]
pub(crate) struct RatingService {
    db: Arc<DatabaseConnection>,
}

impl RatingService {
    pub(crate) fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert or overwrite the caller's rating. Ratings never earn points.
    pub(crate) async fn rate(
        &self,
        upload_id: i32,
        user: &AuthUser,
        stars: i32,
    ) -> Result<(), ServiceError> {
        if !STAR_RANGE.contains(&stars) {
            return Err(ServiceError::validation("Rating must be 1 to 5."));
        }
        UploadRepository::find_by_id(self.db.as_ref(), upload_id)
            .await
            .map_err(map_db_error)?
            .filter(|upload| visible_to(upload, user))
            .ok_or_else(|| ServiceError::validation("Cannot rate an upload that does not exist."))?;

        RatingRepository::upsert(self.db.as_ref(), user.id, upload_id, stars)
            .await
            .map_err(map_db_error)?;
        info!(upload_id, user_id = user.id, stars, "Rating saved");
        Ok(())
    }

    pub(crate) async fn get_rating_summary(
        &self,
        upload_id: i32,
    ) -> Result<RatingSummary, ServiceError> {
        let stars = RatingRepository::stars_for_upload(self.db.as_ref(), upload_id)
            .await
            .map_err(map_db_error)?;
        Ok(RatingSummary::from_stars(&stars))
    }

    pub(crate) async fn rating_by(
        &self,
        upload_id: i32,
        user: &AuthUser,
    ) -> Result<Option<i32>, ServiceError> {
        RatingRepository::stars_by_user(self.db.as_ref(), upload_id, user.id)
            .await
            .map_err(map_db_error)
    }
}
