//! CSRF enforcement for state-changing requests.
use crate::error::AppError;
use crate::gate::csrf;
use crate::metrics::CSRF_REJECTED;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::counter;
use std::sync::Arc;
use tracing::warn;

/// Rejects state-changing requests whose `X-XSRF-TOKEN` header does not
/// match the `XSRF-TOKEN` cookie. Does nothing when CSRF protection is off.
///
/// The login and logout routes take the token as a form field and check it
/// in their handlers.
pub async fn csrf_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let security = &state.settings.security;
    if !security.csrf_enabled || !csrf::is_state_changing(request.method()) {
        return next.run(request).await;
    }

    let path = request.uri().path();
    if path == security.login_path || path == security.logout_path {
        return next.run(request).await;
    }

    if !csrf::verify(request.headers(), None) {
        warn!(path, method = %request.method(), "request rejected: CSRF token mismatch");
        counter!(CSRF_REJECTED).increment(1);
        return AppError::CsrfRejected.into_response();
    }

    next.run(request).await
}
