//! Logging initialization and request logging middleware.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 128;
static JSON_LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(format!("unknown log format `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub include_target: bool,
    pub include_source_location: bool,
    /// Mirror every event as JSON lines into `json_backend_path`.
    pub enable_json_backend: bool,
    pub json_backend_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            include_target: false,
            include_source_location: false,
            enable_json_backend: false,
            json_backend_path: "logs/notes-portal.jsonl".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_target(mut self, include_target: bool) -> Self {
        self.include_target = include_target;
        self
    }

    pub fn with_json_backend(mut self, enable_json_backend: bool) -> Self {
        self.enable_json_backend = enable_json_backend;
        self
    }

    pub fn with_json_backend_path(mut self, json_backend_path: impl Into<String>) -> Self {
        self.json_backend_path = json_backend_path.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn is_valid_request_id(raw: &str) -> bool {
    !raw.is_empty()
        && raw.len() <= MAX_REQUEST_ID_LEN
        && raw
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b':'))
}

fn normalized_request_id(candidate: Option<&str>) -> String {
    if let Some(raw) = candidate {
        let trimmed = raw.trim();
        if is_valid_request_id(trimmed) {
            return trimmed.to_string();
        }
    }

    uuid::Uuid::new_v4().to_string()
}

/// Install the global subscriber. Calling it twice is not an error, so CLI
/// commands and the server can both ask for logging.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let pretty_layer = (config.format == LogFormat::Pretty).then(|| {
        tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(config.include_target)
            .with_file(config.include_source_location)
            .with_line_number(config.include_source_location)
    });
    let json_layer = (config.format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(config.include_target)
            .with_file(config.include_source_location)
            .with_line_number(config.include_source_location)
    });

    let backend_layer = if config.enable_json_backend {
        let json_writer = build_json_backend_writer(&config.json_backend_path)?;
        Some(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_writer(json_writer),
        )
    } else {
        None
    };

    let init_result = tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty_layer)
        .with(json_layer)
        .with(backend_layer)
        .try_init();

    if let Err(err) = init_result {
        if err.to_string().contains("already been set") {
            return Ok(());
        }
        return Err(Box::new(err));
    }

    info!(format = ?config.format, "Logging system initialized");
    Ok(())
}

fn build_json_backend_writer(
    path: &str,
) -> Result<tracing_appender::non_blocking::NonBlocking, Box<dyn std::error::Error>> {
    let path = PathBuf::from(path);
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "json backend path must contain a file name",
        )
    })?;
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = JSON_LOG_GUARD.set(guard);
    Ok(non_blocking)
}

/// Tags every request with an `x-request-id` and logs start/finish with the
/// elapsed time. The log level follows the response status class.
pub async fn structured_logging_middleware(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let request_id = normalized_request_id(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok()),
    );
    let mut request = request;
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    debug!(request_id = %request_id, method = %method, path = %path, "Request started");

    let mut response = next.run(request).await;
    let duration_ms = start_time.elapsed().as_millis();
    let status = response.status();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    match status.as_u16() {
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status,
            duration_ms,
            "Server error"
        ),
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status,
            duration_ms,
            "Client error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status,
            duration_ms,
            "Request completed"
        ),
    }

    response
}
