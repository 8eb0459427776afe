// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers for the login/logout ceremony and the landing page.
pub mod dashboard;
pub mod health;
pub mod login;
pub mod logout;

pub use dashboard::{dashboard, index};
pub use health::{health, not_found};
pub use login::{login_page, login_submit};
pub use logout::logout;

use crate::error::AppError;
use axum::http::header::InvalidHeaderValue;

/// Escape text for interpolation into HTML
pub(crate) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub(crate) fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{body}\n</body></html>\n",
        escape_html(title)
    )
}

pub(crate) fn csrf_input(token: Option<&str>) -> String {
    match token {
        Some(token) => format!(
            r#"<input type="hidden" name="{}" value="{}">"#,
            crate::gate::csrf::CSRF_FIELD,
            escape_html(token)
        ),
        None => String::new(),
    }
}

pub(crate) fn header_error(err: InvalidHeaderValue) -> AppError {
    AppError::Internal(format!("invalid header value: {err}"))
}
