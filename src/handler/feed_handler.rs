use crate::handler::session::CurrentUser;
use crate::handler::{PageError, PageFrame, PortalContext, optional_id};
use crate::service::points_service::PointsService;
use crate::service::taxonomy_service::TaxonomyService;
use crate::service::upload_service::{FeedFilter, UploadService};
use crate::view;
use crate::view::feed::{FeedSelection, HomeView};
use crate::view::pages::StaticPage;
use axum::{
    Router,
    extract::Query,
    http::HeaderMap,
    response::Response,
    routing::get,
};
use portal_http::AuthUser;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct HomeQuery {
    branch: Option<String>,
    semester: Option<String>,
    subject: Option<String>,
    #[serde(rename = "type")]
    upload_type: Option<String>,
}

#[derive(Clone)]
struct FeedServices {
    points: PointsService,
    taxonomy: TaxonomyService,
    uploads: UploadService,
}

pub(crate) fn router(ctx: &PortalContext) -> Router {
    let services = FeedServices {
        points: PointsService::new(ctx.db.clone()),
        taxonomy: TaxonomyService::new(ctx.db.clone()),
        uploads: UploadService::new(ctx.db.clone(), ctx.storage_dir.clone()),
    };

    let home_services = services.clone();
    let leaderboard_points = services.points.clone();

    let mut router = Router::new()
        .route(
            "/",
            get(
                move |CurrentUser(user), Query(query): Query<HomeQuery>, headers: HeaderMap| {
                    home(home_services.clone(), user, query, headers)
                },
            ),
        )
        .route(
            "/leaderboard",
            get(move |CurrentUser(user), headers: HeaderMap| {
                leaderboard(leaderboard_points.clone(), user, headers)
            }),
        );

    for page in StaticPage::ALL {
        let points = services.points.clone();
        router = router.route(
            page.path(),
            get(move |CurrentUser(user), headers: HeaderMap| {
                static_page(points.clone(), user, headers, page)
            }),
        );
    }
    router
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

async fn home(
    services: FeedServices,
    user: AuthUser,
    query: HomeQuery,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let filter = FeedFilter {
        branch_id: optional_id("branch", query.branch.as_deref())?,
        semester_id: optional_id("semester", query.semester.as_deref())?,
        subject_id: optional_id("subject", query.subject.as_deref())?,
        upload_type: non_blank(query.upload_type.clone()),
    };

    let branches = services.taxonomy.list_branches().await?;
    let semesters = services.taxonomy.list_semesters().await?;
    let subjects = services
        .taxonomy
        .list_subjects(filter.branch_id, filter.semester_id)
        .await?;
    let listings = services.uploads.home_feed(filter).await?;

    let selection = FeedSelection {
        branch: non_blank(query.branch),
        semester: non_blank(query.semester),
        subject: non_blank(query.subject),
        upload_type: non_blank(query.upload_type),
    };
    let frame = PageFrame::load(&services.points, Some(user), &headers).await?;
    Ok(frame.render(|chrome| {
        view::feed::home_page(
            chrome,
            &HomeView {
                branches: &branches,
                semesters: &semesters,
                subjects: &subjects,
                selection: &selection,
                listings: &listings,
            },
        )
    }))
}

async fn leaderboard(
    points: PointsService,
    user: AuthUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let entries = points.leaderboard().await?;
    let frame = PageFrame::load(&points, Some(user), &headers).await?;
    Ok(frame.render(|chrome| view::feed::leaderboard_page(chrome, &entries)))
}

async fn static_page(
    points: PointsService,
    user: AuthUser,
    headers: HeaderMap,
    page: StaticPage,
) -> Result<Response, PageError> {
    let frame = PageFrame::load(&points, Some(user), &headers).await?;
    Ok(frame.render(|chrome| view::pages::static_page(chrome, page)))
}
