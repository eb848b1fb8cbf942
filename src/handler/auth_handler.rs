use crate::handler::session::CurrentUser;
use crate::handler::{PageError, PageFrame, PageResultExt, PortalContext};
use crate::service::identity_service::{IdentityService, SignupRequest};
use crate::service::points_service::PointsService;
use crate::view;
use axum::{
    Form, Router,
    http::{HeaderMap, header},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use portal_http::{Flash, SessionConfig, read_cookie, redirect_with_flash};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct SignupForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    confirm_password: String,
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub(crate) fn router(ctx: &PortalContext, identity: IdentityService) -> Router {
    let points = PointsService::new(ctx.db.clone());
    let session = ctx.session.clone();

    let signup_points = points.clone();
    let login_points = points;
    let signup_identity = identity.clone();
    let login_identity = identity.clone();
    let logout_identity = identity;
    let logout_session = session.clone();

    Router::new()
        .route(
            "/signup",
            get(move |user: Option<CurrentUser>, headers: HeaderMap| {
                signup_form(signup_points.clone(), user, headers)
            })
            .post(move |Form(form): Form<SignupForm>| signup(signup_identity.clone(), form)),
        )
        .route(
            "/login",
            get(move |user: Option<CurrentUser>, headers: HeaderMap| {
                login_form(login_points.clone(), user, headers)
            })
            .post(move |Form(form): Form<LoginForm>| {
                login(login_identity.clone(), session.clone(), form)
            }),
        )
        .route(
            "/logout",
            post(move |headers: HeaderMap| {
                logout(logout_identity.clone(), logout_session.clone(), headers)
            }),
        )
}

async fn signup_form(
    points: PointsService,
    user: Option<CurrentUser>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    let frame = PageFrame::load(&points, None, &headers).await?;
    Ok(frame.render(view::auth::signup_page))
}

async fn signup(identity: IdentityService, form: SignupForm) -> Result<Response, PageError> {
    identity
        .signup(SignupRequest {
            username: form.username,
            email: form.email,
            password: form.password,
            confirm_password: form.confirm_password,
        })
        .await
        .or_redirect("/signup")?;
    Ok(redirect_with_flash(
        "/login",
        Flash::success("Account created. Please login."),
    ))
}

async fn login_form(
    points: PointsService,
    user: Option<CurrentUser>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    let frame = PageFrame::load(&points, None, &headers).await?;
    Ok(frame.render(view::auth::login_page))
}

async fn login(
    identity: IdentityService,
    session: SessionConfig,
    form: LoginForm,
) -> Result<Response, PageError> {
    let login = identity
        .login(&form.username, &form.password)
        .await
        .or_redirect("/login")?;
    Ok((
        AppendHeaders([(header::SET_COOKIE, session.session_cookie(&login.token))]),
        Redirect::to("/"),
    )
        .into_response())
}

async fn logout(identity: IdentityService, session: SessionConfig, headers: HeaderMap) -> Response {
    if let Some(token) = read_cookie(&headers, &session.cookie_name)
        && let Err(error) = identity.logout(token).await
    {
        warn!(error = %error, "Failed to delete session on logout");
    }

    (
        AppendHeaders([
            (header::SET_COOKIE, session.clear_session_cookie()),
            (header::SET_COOKIE, Flash::clear_cookie()),
        ]),
        Redirect::to("/login"),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use crate::handler::tests::{
        TestApp, body_text, flash_of, get_page, location, post_form,
    };
    use crate::persistence::{SessionEntity, UserEntity};
    use crate::test_support::insert_user;
    use axum::http::{StatusCode, header};
    use portal_http::FlashLevel;
    use sea_orm::{EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn signup_creates_account_and_points_to_login() {
        let app = TestApp::new().await;
        let response = app
            .send(post_form(
                "/signup",
                "",
                "username=alice&email=a%40uni.edu&password=pw1&confirm_password=pw1",
            ))
            .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
        let flash = flash_of(&response).unwrap();
        assert_eq!(flash.message, "Account created. Please login.");
        assert_eq!(UserEntity::find().count(app.ctx.db.as_ref()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn signup_errors_return_to_the_form() {
        let app = TestApp::new().await;
        let response = app
            .send(post_form(
                "/signup",
                "",
                "username=alice&password=pw1&confirm_password=pw2",
            ))
            .await;
        assert_eq!(location(&response), "/signup");
        let flash = flash_of(&response).unwrap();
        assert_eq!(flash.level, FlashLevel::Error);
        assert_eq!(flash.message, "Passwords do not match.");

        insert_user(&app.ctx.db, "bob", false).await;
        let response = app
            .send(post_form(
                "/signup",
                "",
                "username=bob&password=pw&confirm_password=pw",
            ))
            .await;
        assert_eq!(flash_of(&response).unwrap().message, "Username already exists.");
    }

    #[tokio::test]
    async fn login_sets_session_cookie() {
        let app = TestApp::new().await;
        insert_user(&app.ctx.db, "alice", false).await;

        let response = app
            .send(post_form("/login", "", "username=alice&password=password"))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap();
        assert!(cookie.starts_with("portal_session="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn wrong_password_is_a_generic_error() {
        let app = TestApp::new().await;
        insert_user(&app.ctx.db, "alice", false).await;

        let response = app
            .send(post_form("/login", "", "username=alice&password=nope"))
            .await;
        assert_eq!(location(&response), "/login");
        assert_eq!(
            flash_of(&response).unwrap().message,
            "Invalid username or password."
        );
    }

    #[tokio::test]
    async fn logout_destroys_the_session() {
        let app = TestApp::new().await;
        insert_user(&app.ctx.db, "alice", false).await;
        let cookie = app.login_cookie("alice").await;
        assert_eq!(
            SessionEntity::find().count(app.ctx.db.as_ref()).await.unwrap(),
            1
        );

        let response = app.send(post_form("/logout", &cookie, "")).await;
        assert_eq!(location(&response), "/login");
        assert_eq!(
            SessionEntity::find().count(app.ctx.db.as_ref()).await.unwrap(),
            0
        );

        let response = app.send(get_page("/", &cookie)).await;
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn signed_in_users_skip_the_login_form() {
        let app = TestApp::new().await;
        insert_user(&app.ctx.db, "alice", false).await;
        let cookie = app.login_cookie("alice").await;

        let response = app.send(get_page("/login", &cookie)).await;
        assert_eq!(location(&response), "/");

        let response = app.send(get_page("/login", "")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("action=\"/login\""));
    }
}
