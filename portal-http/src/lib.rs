//! `portal-http` is the Axum scaffold the notes portal runs on.
//!
//! It covers the request plumbing that is not specific to uploads or points:
//! - core bootstrap (`Server`, `ServerConfig`, `AppBuilder`, `AppConfig`)
//! - structured logging with request ids
//! - identity carried through request extensions, the staff guard and
//!   password hashing
//! - cookies, one-shot flash messages and HTML escaping for server-rendered pages

pub mod auth;
pub mod core;
pub mod web;

pub use core::{
    ApiResponse, AppBuilder, AppConfig, ConfigError, HealthResponse, LogFormat, LoggingConfig,
    REQUEST_ID_HEADER, RequestId, Server, ServerConfig, health_check, init_logging,
    structured_logging_middleware,
};

pub use auth::{
    AuthError, AuthUser, DEFAULT_HASH_COST, SessionConfig, get_auth_user, hash_password,
    hash_password_with_cost, require_staff, verify_password,
};

pub use web::{Flash, FlashLevel, escape_html, read_cookie, redirect_with_flash};
