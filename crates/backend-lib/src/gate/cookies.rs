//! Cookie header helpers for the session and CSRF cookies.

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use axum::http::header::InvalidHeaderValue;

/// Attributes applied to a `Set-Cookie` header
#[derive(Debug, Clone, Copy)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    /// `None` for a browser-session cookie
    pub max_age_secs: Option<u64>,
}

/// Build a `Set-Cookie` value scoped to the whole site
pub fn set_cookie(
    name: &str,
    value: &str,
    options: CookieOptions,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; SameSite=Lax");
    if options.http_only {
        cookie.push_str("; HttpOnly");
    }
    if let Some(max_age) = options.max_age_secs {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    if options.secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build a `Set-Cookie` value that deletes the cookie
pub fn clear_cookie(name: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    set_cookie(
        name,
        "",
        CookieOptions {
            http_only: true,
            secure,
            max_age_secs: Some(0),
        },
    )
}

/// Read a cookie value from the request's `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                continue;
            };
            if key.trim() == name {
                let val = val.trim();
                if val.is_empty() {
                    return None;
                }
                return Some(val.to_string());
            }
        }
    }
    None
}
