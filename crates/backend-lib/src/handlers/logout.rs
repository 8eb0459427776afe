use super::header_error;
use crate::error::AppError;
use crate::gate::cookies::{clear_cookie, read_cookie};
use crate::gate::csrf;
use crate::metrics::{CSRF_REJECTED, LOGOUT};
use crate::AppState;
use axum::{
    extract::{rejection::FormRejection, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use metrics::counter;
use regapp_common::LogoutForm;
use std::sync::Arc;
use tracing::{info, warn};

/// `POST /logout`: invalidates the session, clears the cookie and
/// redirects to the post-logout page. A request without a session is
/// redirected the same way.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<LogoutForm>, FormRejection>,
) -> Result<Response, AppError> {
    let security = &state.settings.security;
    let session_settings = &state.settings.session;

    if security.csrf_enabled {
        let submitted = form.ok().and_then(|Form(form)| form.csrf);
        if !csrf::verify(&headers, submitted.as_deref()) {
            warn!("logout rejected: CSRF token mismatch");
            counter!(CSRF_REJECTED).increment(1);
            return Err(AppError::CsrfRejected);
        }
    }

    if let Some(token) = read_cookie(&headers, &session_settings.cookie_name) {
        let email = state.sessions.get_session(&token).await.map(|s| s.email);
        if state.sessions.invalidate(&token).await {
            counter!(LOGOUT).increment(1);
            info!(email = email.as_deref().unwrap_or("-"), "session invalidated on logout");
        }
    }

    let cookie = clear_cookie(&session_settings.cookie_name, session_settings.secure_cookie)
        .map_err(header_error)?;
    Ok((
        [(SET_COOKIE, cookie)],
        Redirect::to(&security.logout_success_redirect),
    )
        .into_response())
}
