//! Runtime configuration read from the environment (after `.env`).

use portal_http::{ConfigError, LogFormat, LoggingConfig, SessionConfig};
use std::{path::PathBuf, str::FromStr};

const DEFAULT_DATABASE_URL: &str = "sqlite://notes_portal.db?mode=rwc";
const DEFAULT_STORAGE_DIR: &str = "uploads";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 14;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub(crate) struct PortalConfig {
    pub(crate) database_url: String,
    pub(crate) file_storage_dir: PathBuf,
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) session: SessionConfig,
    pub(crate) max_upload_bytes: usize,
    pub(crate) logging: LoggingConfig,
}

fn parse_var<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw.map(|value| value.trim().to_string()) {
        None => Ok(default),
        Some(value) if value.is_empty() => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidEnv {
            key: key.to_string(),
            value,
        }),
    }
}

impl PortalConfig {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let session = SessionConfig::default()
            .with_ttl_hours(parse_var(
                "SESSION_TTL_HOURS",
                lookup("SESSION_TTL_HOURS"),
                DEFAULT_SESSION_TTL_HOURS,
            )?)
            .with_secure_cookie(parse_var(
                "SESSION_COOKIE_SECURE",
                lookup("SESSION_COOKIE_SECURE"),
                false,
            )?);

        let format = parse_var("LOG_FORMAT", lookup("LOG_FORMAT"), LogFormat::Pretty)?;
        let mut logging = LoggingConfig::default().with_format(format);
        if let Some(path) = lookup("LOG_JSON_FILE").filter(|path| !path.trim().is_empty()) {
            logging = logging
                .with_json_backend(true)
                .with_json_backend_path(path.trim());
        }

        let max_upload_bytes = parse_var(
            "MAX_UPLOAD_BYTES",
            lookup("MAX_UPLOAD_BYTES"),
            DEFAULT_MAX_UPLOAD_BYTES,
        )?;
        if max_upload_bytes == 0 {
            return Err(ConfigError::InvalidEnv {
                key: "MAX_UPLOAD_BYTES".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url: text("DATABASE_URL", DEFAULT_DATABASE_URL),
            file_storage_dir: PathBuf::from(text("FILE_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
            host: text("HOST", DEFAULT_HOST),
            port: parse_var("PORT", lookup("PORT"), DEFAULT_PORT)?,
            session,
            max_upload_bytes,
            logging,
        })
    }
}
