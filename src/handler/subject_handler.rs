use crate::handler::{PortalContext, optional_id};
use crate::service::error::ServiceError;
use crate::service::taxonomy_service::{SubjectOption, TaxonomyService};
use axum::{Json, Router, extract::Query, routing::get};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SubjectQuery {
    branch_id: Option<String>,
    semester_id: Option<String>,
}

/// `/api/subjects` and its `/ajax/get-subjects` alias answer the same bare
/// JSON list the upload form's dropdown consumes.
pub(crate) fn router(ctx: &PortalContext) -> Router {
    let service = TaxonomyService::new(ctx.db.clone());
    let alias_service = service.clone();

    Router::new()
        .route(
            "/api/subjects",
            get(move |Query(query): Query<SubjectQuery>| list_subjects(service.clone(), query)),
        )
        .route(
            "/ajax/get-subjects",
            get(move |Query(query): Query<SubjectQuery>| {
                list_subjects(alias_service.clone(), query)
            }),
        )
}

async fn list_subjects(
    service: TaxonomyService,
    query: SubjectQuery,
) -> Result<Json<Vec<SubjectOption>>, ServiceError> {
    let branch_id = optional_id("branch_id", query.branch_id.as_deref())?;
    let semester_id = optional_id("semester_id", query.semester_id.as_deref())?;
    Ok(Json(service.list_subjects(branch_id, semester_id).await?))
}
