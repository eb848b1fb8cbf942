//! One-shot status messages carried across a POST-redirect-GET.
//!
//! A mutating handler answers with `redirect_with_flash`; the next rendered
//! page reads the message with `Flash::from_headers` and clears the cookie
//! with `Flash::clear_cookie`.

use crate::web::cookie::{CookieOptions, build_cookie, expire_cookie, read_cookie};
use axum::{
    http::{HeaderMap, header},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

pub const FLASH_COOKIE: &str = "portal_flash";
const FLASH_MAX_AGE_SECONDS: i64 = 60;
const MAX_FLASH_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(Self::Success),
            "info" => Some(Self::Info),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlashError {
    #[error("flash cookie is not valid base64")]
    Encoding,
    #[error("flash cookie payload is malformed")]
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        let mut message: String = message.into();
        if message.len() > MAX_FLASH_LEN {
            let mut cut = MAX_FLASH_LEN;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
        }
        Self { level, message }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Error, message)
    }

    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}\n{}", self.level.as_str(), self.message))
    }

    pub fn decode(raw: &str) -> Result<Self, FlashError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(raw.as_bytes())
            .map_err(|_| FlashError::Encoding)?;
        let text = String::from_utf8(bytes).map_err(|_| FlashError::Malformed)?;
        let (level, message) = text.split_once('\n').ok_or(FlashError::Malformed)?;
        let level = FlashLevel::parse(level).ok_or(FlashError::Malformed)?;
        Ok(Self::new(level, message))
    }

    /// Malformed cookies are ignored; they are cleared on the same response.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        read_cookie(headers, FLASH_COOKIE).and_then(|raw| Self::decode(raw).ok())
    }

    pub fn is_present(headers: &HeaderMap) -> bool {
        read_cookie(headers, FLASH_COOKIE).is_some()
    }

    pub fn set_cookie(&self) -> String {
        build_cookie(
            FLASH_COOKIE,
            &self.encode(),
            CookieOptions {
                max_age_seconds: Some(FLASH_MAX_AGE_SECONDS),
                secure: false,
            },
        )
    }

    pub fn clear_cookie() -> String {
        expire_cookie(FLASH_COOKIE)
    }
}

/// 303 redirect carrying a flash message.
pub fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, flash.set_cookie())]),
        Redirect::to(to),
    )
        .into_response()
}
