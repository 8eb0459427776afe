//! Double-submit CSRF tokens.
//!
//! The login form issues a random token twice: as the `XSRF-TOKEN` cookie
//! and as a hidden `_csrf` field. A state-changing request passes only when
//! the submitted field (or the `X-XSRF-TOKEN` header) equals the cookie.
use super::cookies::{read_cookie, set_cookie, CookieOptions};
use crate::auth::token_generator::{generate_secure_token, tokens_match};
use axum::http::{header::InvalidHeaderValue, HeaderMap, HeaderValue, Method};

pub const CSRF_COOKIE: &str = "XSRF-TOKEN";
pub const CSRF_HEADER: &str = "x-xsrf-token";
pub const CSRF_FIELD: &str = "_csrf";

pub fn issue_token() -> String {
    generate_secure_token()
}

/// Readable by page scripts so they can echo it in the header
pub fn csrf_cookie(token: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    set_cookie(
        CSRF_COOKIE,
        token,
        CookieOptions {
            http_only: false,
            secure,
            max_age_secs: None,
        },
    )
}

/// The token currently held by the client, if any
pub fn current_token(headers: &HeaderMap) -> Option<String> {
    read_cookie(headers, CSRF_COOKIE)
}

pub fn is_state_changing(method: &Method) -> bool {
    !method.is_safe()
}

/// Check a submitted token (form field, else header) against the cookie
pub fn verify(headers: &HeaderMap, submitted: Option<&str>) -> bool {
    let Some(expected) = current_token(headers) else {
        return false;
    };
    let submitted = submitted
        .map(str::to_owned)
        .or_else(|| {
            headers
                .get(CSRF_HEADER)
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned)
        });
    submitted.is_some_and(|token| tokens_match(&token, &expected))
}
