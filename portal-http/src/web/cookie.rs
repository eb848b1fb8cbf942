use axum::http::{HeaderMap, header};

#[derive(Debug, Clone, Copy, Default)]
pub struct CookieOptions {
    pub max_age_seconds: Option<i64>,
    pub secure: bool,
}

/// Find a cookie by name across every `Cookie` header of the request.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Cookies are always path-wide, HttpOnly and `SameSite=Lax` so that the
/// POST-redirect-GET flow keeps them while cross-site posts do not.
pub fn build_cookie(name: &str, value: &str, options: CookieOptions) -> String {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax");
    if let Some(max_age) = options.max_age_seconds {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn expire_cookie(name: &str) -> String {
    build_cookie(
        name,
        "",
        CookieOptions {
            max_age_seconds: Some(0),
            secure: false,
        },
    )
}
