use crate::handler::session::CurrentUser;
use crate::handler::{PageError, PageFrame, PageResultExt, PortalContext, optional_id, path_id};
use crate::service::error::ServiceError;
use crate::service::file_store::IncomingFile;
use crate::service::points_service::PointsService;
use crate::service::rating_service::RatingService;
use crate::service::report_service::ReportService;
use crate::service::taxonomy_service::TaxonomyService;
use crate::service::upload_service::{Download, NewUpload, UploadService};
use crate::view;
use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Multipart, Path, multipart::MultipartError},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use portal_http::{AuthUser, Flash, redirect_with_flash};
use serde::Deserialize;

const REQUIRED_FIELDS: &str = "Please fill all required fields.";

#[derive(Clone)]
struct UploadServices {
    points: PointsService,
    taxonomy: TaxonomyService,
    uploads: UploadService,
    ratings: RatingService,
    reports: ReportService,
}

#[derive(Debug, Deserialize)]
struct RateForm {
    #[serde(default)]
    stars: String,
}

#[derive(Debug, Deserialize)]
struct ReportForm {
    #[serde(default)]
    reason: String,
}

pub(crate) fn router(ctx: &PortalContext) -> Router {
    let services = UploadServices {
        points: PointsService::new(ctx.db.clone()),
        taxonomy: TaxonomyService::new(ctx.db.clone()),
        uploads: UploadService::new(ctx.db.clone(), ctx.storage_dir.clone()),
        ratings: RatingService::new(ctx.db.clone()),
        reports: ReportService::new(ctx.db.clone()),
    };

    let form_services = services.clone();
    let create_services = services.clone();
    let view_services = services.clone();
    let download_services = services.clone();
    let rate_services = services.clone();
    let report_services = services.clone();
    let mine_services = services.clone();
    let delete_services = services;

    Router::new()
        .route(
            "/upload",
            get(move |CurrentUser(user), headers: HeaderMap| {
                upload_form(form_services.clone(), user, headers)
            })
            .post(move |CurrentUser(user), multipart: Multipart| {
                create_upload(create_services.clone(), user, multipart)
            })
            .layer(DefaultBodyLimit::max(ctx.max_upload_bytes)),
        )
        .route(
            "/view/{id}",
            get(move |CurrentUser(user), Path(id): Path<String>, headers: HeaderMap| {
                view_upload(view_services.clone(), user, id, headers)
            }),
        )
        .route(
            "/files/{id}",
            get(move |CurrentUser(user), Path(id): Path<String>| {
                download(download_services.clone(), user, id)
            }),
        )
        .route(
            "/rate/{id}",
            post(
                move |CurrentUser(user), Path(id): Path<String>, Form(form): Form<RateForm>| {
                    rate(rate_services.clone(), user, id, form)
                },
            ),
        )
        .route(
            "/report/{id}",
            post(
                move |CurrentUser(user), Path(id): Path<String>, Form(form): Form<ReportForm>| {
                    report(report_services.clone(), user, id, form)
                },
            ),
        )
        .route(
            "/my-uploads",
            get(move |CurrentUser(user), headers: HeaderMap| {
                my_uploads(mine_services.clone(), user, headers)
            }),
        )
        .route(
            "/delete/{id}",
            post(move |CurrentUser(user), Path(id): Path<String>| {
                delete_upload(delete_services.clone(), user, id)
            }),
        )
}

async fn upload_form(
    services: UploadServices,
    user: AuthUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let branches = services.taxonomy.list_branches().await?;
    let semesters = services.taxonomy.list_semesters().await?;
    let frame = PageFrame::load(&services.points, Some(user), &headers).await?;
    Ok(frame.render(|chrome| view::upload::upload_form(chrome, &branches, &semesters)))
}

fn multipart_error(error: MultipartError) -> ServiceError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServiceError::validation("The file is too large.")
    } else {
        ServiceError::validation(format!("Invalid upload form: {}", error.body_text()))
    }
}

/// Reads the upload form. Branch and semester only drive the subject
/// dropdown, but the form is incomplete without them.
async fn parse_upload_form(mut multipart: Multipart) -> Result<NewUpload, ServiceError> {
    let mut branch = None;
    let mut semester = None;
    let mut request = NewUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned).unwrap_or_default();
        match name.as_str() {
            "file" => {
                let original_filename = field
                    .file_name()
                    .map(str::to_owned)
                    .unwrap_or_default();
                let mime_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // browsers send an empty part when no file was chosen
                if !original_filename.is_empty() && !bytes.is_empty() {
                    request.file = Some(IncomingFile {
                        original_filename,
                        mime_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "branch" | "semester" | "subject" | "title" | "description" | "upload_type" => {
                let value = field.text().await.map_err(multipart_error)?;
                match name.as_str() {
                    "branch" => branch = optional_id("branch", Some(&value))?,
                    "semester" => semester = optional_id("semester", Some(&value))?,
                    "subject" => request.subject_id = optional_id("subject", Some(&value))?,
                    "title" => request.title = value,
                    "description" => request.description = value,
                    _ => request.upload_type = Some(value).filter(|v| !v.trim().is_empty()),
                }
            }
            _ => {}
        }
    }

    if branch.is_none() || semester.is_none() {
        return Err(ServiceError::validation(REQUIRED_FIELDS));
    }
    Ok(request)
}

async fn create_upload(
    services: UploadServices,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let request = parse_upload_form(multipart).await.or_redirect("/upload")?;
    services
        .uploads
        .create_upload(&user, request)
        .await
        .or_redirect("/upload")?;
    Ok(redirect_with_flash(
        "/my-uploads",
        Flash::success("Uploaded successfully! (Unverified)"),
    ))
}

async fn view_upload(
    services: UploadServices,
    user: AuthUser,
    raw_id: String,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let upload_id = path_id(&raw_id)?;
    let listing = services.uploads.get_listing(upload_id, &user).await?;
    let summary = services.ratings.get_rating_summary(upload_id).await?;
    let my_rating = services.ratings.rating_by(upload_id, &user).await?;
    let frame = PageFrame::load(&services.points, Some(user), &headers).await?;
    Ok(frame.render(|chrome| view::upload::detail_page(chrome, &listing, &summary, my_rating)))
}

/// Keeps the header value printable and unambiguous.
fn attachment_disposition(filename: &str) -> HeaderValue {
    let safe: String = filename
        .chars()
        .map(|ch| {
            if ch == ' ' || (ch.is_ascii_graphic() && ch != '"' && ch != '\\') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{safe}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

async fn download(
    services: UploadServices,
    user: AuthUser,
    raw_id: String,
) -> Result<Response, PageError> {
    let upload_id = path_id(&raw_id)?;
    let Download {
        filename,
        mime_type,
        bytes,
    } = services.uploads.download(upload_id, &user).await?;

    let content_type = mime_type
        .as_deref()
        .and_then(|mime| HeaderValue::from_str(mime).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, attachment_disposition(&filename)),
        ],
        bytes,
    )
        .into_response())
}

async fn rate(
    services: UploadServices,
    user: AuthUser,
    raw_id: String,
    form: RateForm,
) -> Result<Response, PageError> {
    let upload_id = path_id(&raw_id).or_redirect("/")?;
    let back = format!("/view/{upload_id}");
    let stars: i32 = form
        .stars
        .trim()
        .parse()
        .map_err(|_| ServiceError::validation("Invalid rating."))
        .or_redirect(&back)?;
    services
        .ratings
        .rate(upload_id, &user, stars)
        .await
        .or_redirect(&back)?;
    Ok(redirect_with_flash(&back, Flash::success("Rating saved.")))
}

async fn report(
    services: UploadServices,
    user: AuthUser,
    raw_id: String,
    form: ReportForm,
) -> Result<Response, PageError> {
    let upload_id = path_id(&raw_id).or_redirect("/")?;
    let back = format!("/view/{upload_id}");
    services
        .reports
        .report(upload_id, &user, &form.reason)
        .await
        .or_redirect(&back)?;
    Ok(redirect_with_flash(&back, Flash::success("Report submitted.")))
}

async fn my_uploads(
    services: UploadServices,
    user: AuthUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let listings = services.uploads.list_user_uploads(&user).await?;
    let history = services.points.history(user.id).await?;
    let frame = PageFrame::load(&services.points, Some(user), &headers).await?;
    Ok(frame.render(|chrome| view::upload::my_uploads_page(chrome, &listings, &history)))
}

async fn delete_upload(
    services: UploadServices,
    user: AuthUser,
    raw_id: String,
) -> Result<Response, PageError> {
    let upload_id = path_id(&raw_id).or_redirect("/my-uploads")?;
    services
        .uploads
        .delete_upload(upload_id, &user)
        .await
        .or_redirect("/my-uploads")?;
    Ok(redirect_with_flash(
        "/my-uploads",
        Flash::success("Upload deleted (-10 points)."),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::tests::{TestApp, body_text, flash_of, get_page, location, post_form};
    use crate::persistence::{PointsLogEntity, ReportEntity, UploadEntity};
    use crate::test_support::{insert_user, new_upload, seed_subject};
    use axum::{body::Body, http::Request};
    use portal_http::FlashLevel;
    use sea_orm::{EntityTrait, PaginatorTrait};

    const BOUNDARY: &str = "portal-test-boundary";

    fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn post_multipart(cookie: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::COOKIE, cookie)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    struct Scenario {
        app: TestApp,
        alice: AuthUser,
        cookie: String,
        subject_id: i32,
        branch_id: i32,
        semester_id: i32,
    }

    async fn scenario() -> Scenario {
        let app = TestApp::new().await;
        let alice = insert_user(&app.ctx.db, "alice", false).await;
        let subject = seed_subject(&app.ctx.db, "CSE", 3, "Data Structures").await;
        let cookie = app.login_cookie("alice").await;
        Scenario {
            app,
            alice,
            cookie,
            subject_id: subject.id,
            branch_id: subject.branch_id,
            semester_id: subject.semester_id,
        }
    }

    async fn existing_upload(s: &Scenario, title: &str) -> i32 {
        UploadService::new(s.app.ctx.db.clone(), s.app.ctx.storage_dir.clone())
            .create_upload(&s.alice, new_upload(s.subject_id, title))
            .await
            .unwrap()
            .id
    }

    async fn points_entries(s: &Scenario) -> u64 {
        PointsLogEntity::find().count(s.app.ctx.db.as_ref()).await.unwrap()
    }

    #[tokio::test]
    async fn multipart_upload_creates_record_and_rewards() {
        let s = scenario().await;
        let branch = s.branch_id.to_string();
        let semester = s.semester_id.to_string();
        let subject = s.subject_id.to_string();
        let body = multipart_body(
            &[
                ("branch", &branch),
                ("semester", &semester),
                ("subject", &subject),
                ("title", "Trees"),
                ("description", "AVL and red-black"),
                ("upload_type", "NOTES"),
            ],
            Some(("trees.pdf", b"%PDF-1.4 trees")),
        );

        let response = s.app.send(post_multipart(&s.cookie, body)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/my-uploads");
        assert_eq!(
            flash_of(&response).unwrap().message,
            "Uploaded successfully! (Unverified)"
        );
        assert_eq!(UploadEntity::find().count(s.app.ctx.db.as_ref()).await.unwrap(), 1);
        assert_eq!(points_entries(&s).await, 1);

        let html = body_text(s.app.send(get_page("/my-uploads", &s.cookie)).await).await;
        assert!(html.contains("Trees"));
        assert!(html.contains("alice &middot; 10 points"));
        assert!(html.contains("<td>Uploaded note</td><td>+10</td>"));
    }

    #[tokio::test]
    async fn incomplete_upload_form_is_rejected_without_points() {
        let s = scenario().await;
        let subject = s.subject_id.to_string();
        let body = multipart_body(
            &[("subject", &subject), ("title", "Trees"), ("upload_type", "NOTES")],
            Some(("trees.pdf", b"data")),
        );

        let response = s.app.send(post_multipart(&s.cookie, body)).await;
        assert_eq!(location(&response), "/upload");
        let flash = flash_of(&response).unwrap();
        assert_eq!(flash.level, FlashLevel::Error);
        assert_eq!(flash.message, REQUIRED_FIELDS);
        assert_eq!(points_entries(&s).await, 0);
    }

    #[tokio::test]
    async fn oversized_file_is_refused() {
        let s = scenario().await;
        let branch = s.branch_id.to_string();
        let semester = s.semester_id.to_string();
        let subject = s.subject_id.to_string();
        let huge = vec![b'x'; s.app.ctx.max_upload_bytes + 1];
        let body = multipart_body(
            &[
                ("branch", &branch),
                ("semester", &semester),
                ("subject", &subject),
                ("title", "Huge"),
                ("upload_type", "NOTES"),
            ],
            Some(("huge.pdf", &huge)),
        );

        let response = s.app.send(post_multipart(&s.cookie, body)).await;
        assert_eq!(location(&response), "/upload");
        assert_eq!(UploadEntity::find().count(s.app.ctx.db.as_ref()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn view_page_shows_rating_summary() {
        let s = scenario().await;
        let id = existing_upload(&s, "Graphs").await;
        let uri = format!("/view/{id}");

        let html = body_text(s.app.send(get_page(&uri, &s.cookie)).await).await;
        assert!(html.contains("No ratings yet"));

        let response = s
            .app
            .send(post_form(&format!("/rate/{id}"), &s.cookie, "stars=3"))
            .await;
        assert_eq!(location(&response), uri);
        s.app
            .send(post_form(&format!("/rate/{id}"), &s.cookie, "stars=5"))
            .await;

        let html = body_text(s.app.send(get_page(&uri, &s.cookie)).await).await;
        assert!(html.contains("5.0 / 5 from 1 rating"));
        assert!(html.contains("<option value=\"5\" selected>"));
    }

    #[tokio::test]
    async fn bad_ratings_flash_errors() {
        let s = scenario().await;
        let id = existing_upload(&s, "Graphs").await;

        let response = s
            .app
            .send(post_form(&format!("/rate/{id}"), &s.cookie, "stars=many"))
            .await;
        assert_eq!(flash_of(&response).unwrap().message, "Invalid rating.");

        let response = s
            .app
            .send(post_form(&format!("/rate/{id}"), &s.cookie, "stars=6"))
            .await;
        assert_eq!(flash_of(&response).unwrap().message, "Rating must be 1 to 5.");
    }

    #[tokio::test]
    async fn duplicate_reports_are_silent() {
        let s = scenario().await;
        let id = existing_upload(&s, "Graphs").await;
        let uri = format!("/report/{id}");

        for reason in ["SPAM", "WRONG"] {
            let response = s
                .app
                .send(post_form(&uri, &s.cookie, &format!("reason={reason}")))
                .await;
            assert_eq!(flash_of(&response).unwrap().message, "Report submitted.");
        }
        assert_eq!(ReportEntity::find().count(s.app.ctx.db.as_ref()).await.unwrap(), 1);

        let response = s.app.send(post_form(&uri, &s.cookie, "reason=RUDE")).await;
        assert_eq!(flash_of(&response).unwrap().message, "Invalid report reason.");
    }

    #[tokio::test]
    async fn download_streams_the_stored_file() {
        let s = scenario().await;
        let id = existing_upload(&s, "Graphs").await;

        let response = s
            .app
            .send(get_page(&format!("/files/{id}"), &s.cookie))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"notes.pdf\""
        );
        assert_eq!(body_text(response).await, "hello notes");

        let response = s.app.send(get_page("/files/9999", &s.cookie)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn owners_delete_and_others_cannot() {
        let s = scenario().await;
        let id = existing_upload(&s, "Graphs").await;
        insert_user(&s.app.ctx.db, "bob", false).await;
        let bob = s.app.login_cookie("bob").await;

        let response = s
            .app
            .send(post_form(&format!("/delete/{id}"), &bob, ""))
            .await;
        assert_eq!(location(&response), "/my-uploads");
        assert_eq!(flash_of(&response).unwrap().level, FlashLevel::Error);
        assert_eq!(UploadEntity::find().count(s.app.ctx.db.as_ref()).await.unwrap(), 1);

        let response = s
            .app
            .send(post_form(&format!("/delete/{id}"), &s.cookie, ""))
            .await;
        assert_eq!(
            flash_of(&response).unwrap().message,
            "Upload deleted (-10 points)."
        );
        assert_eq!(UploadEntity::find().count(s.app.ctx.db.as_ref()).await.unwrap(), 0);
        assert_eq!(points_entries(&s).await, 2);
    }

    #[tokio::test]
    async fn malformed_path_ids_render_or_flash_not_found() {
        let s = scenario().await;
        existing_upload(&s, "Heaps").await;

        for uri in ["/view/abc", "/files/abc"] {
            let response = s.app.send(get_page(uri, &s.cookie)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
            assert!(content_type.to_str().unwrap().starts_with("text/html"));
            assert!(body_text(response).await.contains("Upload `abc` was not found."));
        }

        let response = s.app.send(post_form("/delete/abc", &s.cookie, "")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/my-uploads");
        let flash = flash_of(&response).unwrap();
        assert_eq!(flash.level, FlashLevel::Error);
        assert_eq!(flash.message, "Upload `abc` was not found.");

        let response = s
            .app
            .send(post_form("/rate/99999999999", &s.cookie, "stars=5"))
            .await;
        assert_eq!(location(&response), "/");
        assert_eq!(flash_of(&response).unwrap().level, FlashLevel::Error);

        let response = s
            .app
            .send(post_form("/report/x1", &s.cookie, "reason=SPAM"))
            .await;
        assert_eq!(location(&response), "/");
        assert_eq!(UploadEntity::find().count(s.app.ctx.db.as_ref()).await.unwrap(), 1);
        assert_eq!(ReportEntity::find().count(s.app.ctx.db.as_ref()).await.unwrap(), 0);
    }

    #[test]
    fn disposition_strips_quotes_and_control_characters() {
        assert_eq!(
            attachment_disposition("my \"notes\"\n.pdf"),
            "attachment; filename=\"my _notes__.pdf\""
        );
        assert_eq!(
            attachment_disposition("résumé.pdf"),
            "attachment; filename=\"r_sum_.pdf\""
        );
    }
}
