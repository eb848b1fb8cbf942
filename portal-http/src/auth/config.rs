//! Session cookie configuration.

use crate::auth::types::AuthError;
use crate::web::cookie::{CookieOptions, build_cookie, expire_cookie};

const DEFAULT_COOKIE_NAME: &str = "portal_session";
/// Two weeks, the usual lifetime of a "remember me" style session.
const DEFAULT_TTL_HOURS: i64 = 24 * 14;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_hours: i64,
    /// Adds the `Secure` attribute; enable when served over HTTPS.
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            ttl_hours: DEFAULT_TTL_HOURS,
            secure_cookie: false,
        }
    }
}

impl SessionConfig {
    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    pub fn with_ttl_hours(mut self, ttl_hours: i64) -> Self {
        self.ttl_hours = ttl_hours;
        self
    }

    pub fn with_secure_cookie(mut self, secure_cookie: bool) -> Self {
        self.secure_cookie = secure_cookie;
        self
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        let name = self.cookie_name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidSessionConfig(
                "cookie name must not be empty".to_string(),
            ));
        }
        if !name
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-'))
        {
            return Err(AuthError::InvalidSessionConfig(format!(
                "cookie name `{name}` contains unsupported characters"
            )));
        }
        if self.ttl_hours <= 0 {
            return Err(AuthError::InvalidSessionConfig(
                "session lifetime must be greater than 0 hours".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }

    /// `Set-Cookie` value carrying a freshly issued session token.
    pub fn session_cookie(&self, token: &str) -> String {
        build_cookie(
            &self.cookie_name,
            token,
            CookieOptions {
                max_age_seconds: Some(self.ttl_hours * 3600),
                secure: self.secure_cookie,
            },
        )
    }

    pub fn clear_session_cookie(&self) -> String {
        expire_cookie(&self.cookie_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        let config = SessionConfig::default().with_ttl_hours(0);
        assert!(matches!(
            config.validate(),
            Err(AuthError::InvalidSessionConfig(_))
        ));
    }

    #[test]
    fn cookie_name_with_separator_is_rejected() {
        let config = SessionConfig::default().with_cookie_name("bad;name");
        assert!(config.validate().is_err());
    }

    #[test]
    fn session_cookie_carries_token_and_lifetime() {
        let config = SessionConfig::default()
            .with_ttl_hours(2)
            .with_secure_cookie(true);
        let cookie = config.session_cookie("abc123");
        assert!(cookie.starts_with("portal_session=abc123;"));
        assert!(cookie.contains("Max-Age=7200"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
    }
}
