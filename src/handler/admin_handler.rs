//! Staff moderation pages, nested under `/admin-panel`.

use crate::handler::session::CurrentUser;
use crate::handler::{PageError, PageFrame, PageResultExt, PortalContext, path_id};
use crate::persistence::UploadStatus;
use crate::service::points_service::PointsService;
use crate::service::report_service::ReportService;
use crate::service::upload_service::UploadService;
use crate::view;
use axum::{
    Router,
    extract::Path,
    http::HeaderMap,
    middleware,
    response::Response,
    routing::{get, post},
};
use portal_http::{AuthUser, Flash, redirect_with_flash, require_staff};

const UPLOADS_PAGE: &str = "/admin-panel/uploads";

#[derive(Clone)]
struct AdminServices {
    points: PointsService,
    uploads: UploadService,
    reports: ReportService,
}

pub(crate) fn router(ctx: &PortalContext) -> Router {
    let services = AdminServices {
        points: PointsService::new(ctx.db.clone()),
        uploads: UploadService::new(ctx.db.clone(), ctx.storage_dir.clone()),
        reports: ReportService::new(ctx.db.clone()),
    };

    let list_services = services.clone();
    let verify_services = services.clone();
    let remove_services = services.clone();
    let reports_services = services;

    Router::new()
        .route(
            "/uploads",
            get(move |CurrentUser(user), headers: HeaderMap| {
                list_uploads(list_services.clone(), user, headers)
            }),
        )
        .route(
            "/uploads/{id}/verify",
            post(move |CurrentUser(user), Path(id): Path<String>| {
                set_status(verify_services.clone(), user, id, UploadStatus::Verified)
            }),
        )
        .route(
            "/uploads/{id}/remove",
            post(move |CurrentUser(user), Path(id): Path<String>| {
                set_status(remove_services.clone(), user, id, UploadStatus::Removed)
            }),
        )
        .route(
            "/reports",
            get(move |CurrentUser(user), headers: HeaderMap| {
                list_reports(reports_services.clone(), user, headers)
            }),
        )
        .route_layer(middleware::from_fn(require_staff("/")))
}

async fn list_uploads(
    services: AdminServices,
    user: AuthUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let listings = services.uploads.list_all_uploads(&user).await?;
    let frame = PageFrame::load(&services.points, Some(user), &headers).await?;
    Ok(frame.render(|chrome| view::admin::uploads_page(chrome, &listings)))
}

async fn set_status(
    services: AdminServices,
    user: AuthUser,
    raw_id: String,
    target: UploadStatus,
) -> Result<Response, PageError> {
    let upload_id = path_id(&raw_id).or_redirect(UPLOADS_PAGE)?;
    services
        .uploads
        .set_status(upload_id, target, &user)
        .await
        .or_redirect(UPLOADS_PAGE)?;
    let message = match target {
        UploadStatus::Removed => "Upload removed.",
        _ => "Upload verified.",
    };
    Ok(redirect_with_flash(UPLOADS_PAGE, Flash::success(message)))
}

async fn list_reports(
    services: AdminServices,
    user: AuthUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let reports = services.reports.list_reports(&user).await?;
    let frame = PageFrame::load(&services.points, Some(user), &headers).await?;
    Ok(frame.render(|chrome| view::admin::reports_page(chrome, &reports)))
}

#[cfg(test)]
mod tests {
    use crate::handler::tests::{TestApp, body_text, flash_of, get_page, location, post_form};
    use crate::persistence::{PointsLogEntity, UploadEntity, UploadStatus};
    use crate::service::report_service::ReportService;
    use crate::service::upload_service::UploadService;
    use crate::test_support::{insert_user, new_upload, seed_subject};
    use axum::http::StatusCode;
    use sea_orm::{EntityTrait, PaginatorTrait};

    async fn app_with_upload() -> (TestApp, i32) {
        let app = TestApp::new().await;
        let alice = insert_user(&app.ctx.db, "alice", false).await;
        insert_user(&app.ctx.db, "mod", true).await;
        let subject = seed_subject(&app.ctx.db, "CSE", 3, "Data Structures").await;
        let upload = UploadService::new(app.ctx.db.clone(), app.ctx.storage_dir.clone())
            .create_upload(&alice, new_upload(subject.id, "Tries"))
            .await
            .unwrap();
        (app, upload.id)
    }

    #[tokio::test]
    async fn students_are_turned_away() {
        let (app, id) = app_with_upload().await;
        let cookie = app.login_cookie("alice").await;

        let response = app.send(get_page("/admin-panel/uploads", &cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let response = app
            .send(post_form(&format!("/admin-panel/uploads/{id}/verify"), &cookie, ""))
            .await;
        assert_eq!(location(&response), "/");
        let upload = UploadEntity::find_by_id(id)
            .one(app.ctx.db.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(upload.status, UploadStatus::Unverified);
    }

    #[tokio::test]
    async fn anonymous_admin_requests_go_to_login() {
        let (app, _) = app_with_upload().await;
        let response = app.send(get_page("/admin-panel/reports", "")).await;
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn staff_verify_then_remove_without_points() {
        let (app, id) = app_with_upload().await;
        let cookie = app.login_cookie("mod").await;

        let response = app
            .send(post_form(&format!("/admin-panel/uploads/{id}/verify"), &cookie, ""))
            .await;
        assert_eq!(location(&response), "/admin-panel/uploads");
        assert_eq!(flash_of(&response).unwrap().message, "Upload verified.");

        let response = app
            .send(post_form(&format!("/admin-panel/uploads/{id}/remove"), &cookie, ""))
            .await;
        assert_eq!(flash_of(&response).unwrap().message, "Upload removed.");

        let upload = UploadEntity::find_by_id(id)
            .one(app.ctx.db.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(upload.status, UploadStatus::Removed);
        assert_eq!(
            PointsLogEntity::find().count(app.ctx.db.as_ref()).await.unwrap(),
            1
        );

        let html = body_text(app.send(get_page("/admin-panel/uploads", &cookie)).await).await;
        assert!(html.contains("Tries"));
        assert!(html.contains("/verify"));
        assert!(!html.contains("/remove\""));
    }

    #[tokio::test]
    async fn unknown_upload_flashes_not_found() {
        let (app, _) = app_with_upload().await;
        let cookie = app.login_cookie("mod").await;
        let response = app
            .send(post_form("/admin-panel/uploads/999/verify", &cookie, ""))
            .await;
        assert_eq!(location(&response), "/admin-panel/uploads");
        assert_eq!(flash_of(&response).unwrap().message, "Upload 999 was not found.");
    }

    #[tokio::test]
    async fn reports_page_lists_titles_and_reporters() {
        let (app, id) = app_with_upload().await;
        let bob = insert_user(&app.ctx.db, "bob", false).await;
        ReportService::new(app.ctx.db.clone())
            .report(id, &bob, "COPYRIGHT")
            .await
            .unwrap();
        let cookie = app.login_cookie("mod").await;

        let response = app.send(get_page("/admin-panel/reports", &cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Tries"));
        assert!(html.contains("bob"));
        assert!(html.contains("Copyright"));
    }

    #[tokio::test]
    async fn malformed_upload_id_flashes_back_to_the_list() {
        let (app, id) = app_with_upload().await;
        let cookie = app.login_cookie("mod").await;
        let response = app
            .send(post_form("/admin-panel/uploads/tries/remove", &cookie, ""))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin-panel/uploads");
        assert_eq!(
            flash_of(&response).unwrap().message,
            "Upload `tries` was not found."
        );
        let upload = UploadEntity::find_by_id(id)
            .one(app.ctx.db.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(upload.status, UploadStatus::Unverified);
    }
}
