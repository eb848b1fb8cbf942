//! Application router builder.
//!
//! `AppBuilder` only composes routes. Logging and tracing layers are applied
//! later by `Server::start`.

use crate::auth::SessionConfig;
use crate::core::{
    health::health_check,
    response::ApiResponse,
    server::{AppConfig, ConfigError, StartupValidation},
};
use axum::{Router, http::StatusCode, routing::get};

pub struct AppBuilder {
    router: Router,
    app_config: AppConfig,
    startup_validations: Vec<StartupValidation>,
    known_endpoints: Vec<String>,
}

impl AppBuilder {
    pub fn new(app_config: AppConfig) -> Self {
        Self {
            router: Router::new().route("/health", get(health_check)),
            app_config,
            startup_validations: Vec::new(),
            known_endpoints: vec!["/health".to_string()],
        }
    }

    pub fn route(mut self, path: &str, method: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, method);
        self.known_endpoints.push(path.to_string());
        self
    }

    pub fn nest(mut self, path: &str, router: Router) -> Self {
        self.router = self.router.nest(path, router);
        self.known_endpoints.push(format!("{path}/*"));
        self
    }

    /// Merge a router whose paths are already absolute.
    pub fn merge(mut self, router: Router) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// Register a check that runs before the server socket is bound.
    pub fn startup_validation<F>(mut self, validation: F) -> Self
    where
        F: Fn() -> Result<(), ConfigError> + Send + Sync + 'static,
    {
        self.startup_validations.push(Box::new(validation));
        self
    }

    pub fn validate_session_config(self, session_config: SessionConfig) -> Self {
        self.startup_validation(move || {
            session_config
                .validate()
                .map_err(|e| ConfigError::InvalidSession(e.to_string()))
        })
    }

    pub(crate) fn into_parts(self) -> (Router, AppConfig, Vec<StartupValidation>, Vec<String>) {
        let mut endpoints = self.known_endpoints;
        endpoints.sort();
        endpoints.dedup();

        (
            self.router.fallback(fallback_handler),
            self.app_config,
            self.startup_validations,
            endpoints,
        )
    }
}

async fn fallback_handler() -> ApiResponse<()> {
    ApiResponse::error_with_status("Endpoint not found", StatusCode::NOT_FOUND)
}
