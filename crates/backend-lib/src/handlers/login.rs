// ============================
// crates/backend-lib/src/handlers/login.rs
// ============================
//! Login form and credential submission.
//!
//! Every credential failure (unknown email, wrong password, disabled
//! identity) produces the same redirect to `<login_path>?error`. Only
//! store failures surface differently, as a 503.
use super::{csrf_input, escape_html, header_error, page};
use crate::auth::AuthError;
use crate::error::{AppError, INVALID_CREDENTIALS_MSG};
use crate::gate::cookies::{read_cookie, set_cookie, CookieOptions};
use crate::gate::csrf;
use crate::metrics::{CSRF_REJECTED, LOGIN_FAILURE, LOGIN_SUCCESS};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use metrics::counter;
use regapp_common::LoginForm;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const LOGGED_OUT_MSG: &str = "You have been signed out.";

/// `GET /login`: renders the form; `?error` and `?logout` add a notice
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let security = &state.settings.security;

    let notice = if params.contains_key("error") {
        Some(INVALID_CREDENTIALS_MSG)
    } else if params.contains_key("logout") {
        Some(LOGGED_OUT_MSG)
    } else {
        None
    };

    let mut response_headers = HeaderMap::new();
    let token = if security.csrf_enabled {
        let token = csrf::current_token(&headers).unwrap_or_else(csrf::issue_token);
        let cookie = csrf::csrf_cookie(&token, state.settings.session.secure_cookie)
            .map_err(header_error)?;
        response_headers.insert(SET_COOKIE, cookie);
        Some(token)
    } else {
        None
    };

    let notice_html = notice
        .map(|msg| format!("<p class=\"notice\">{}</p>\n", escape_html(msg)))
        .unwrap_or_default();
    let body = format!(
        "<h1>Sign in</h1>\n{notice_html}<form method=\"post\" action=\"{action}\">\n\
         <label>Email <input type=\"email\" name=\"email\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         {csrf}\n<button type=\"submit\">Sign in</button>\n</form>",
        action = escape_html(&security.login_path),
        csrf = csrf_input(token.as_deref()),
    );

    Ok((response_headers, Html(page("Sign in", &body))).into_response())
}

/// `POST /login`: verifies credentials and establishes a session
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let security = &state.settings.security;
    let session_settings = &state.settings.session;

    if security.csrf_enabled && !csrf::verify(&headers, form.csrf.as_deref()) {
        warn!(email = %form.email, "login rejected: CSRF token mismatch");
        counter!(CSRF_REJECTED).increment(1);
        return Err(AppError::CsrfRejected);
    }

    match state.auth.authenticate(&form.email, &form.password).await {
        Ok(identity) => {
            // a fresh token per login; whatever the client held before is dropped
            if let Some(previous) = read_cookie(&headers, &session_settings.cookie_name) {
                state.sessions.invalidate(&previous).await;
            }
            let token = state.sessions.create_session(&identity).await;
            let cookie = set_cookie(
                &session_settings.cookie_name,
                &token,
                CookieOptions {
                    http_only: true,
                    secure: session_settings.secure_cookie,
                    max_age_secs: Some(state.sessions.absolute_ttl().as_secs()),
                },
            )
            .map_err(header_error)?;

            counter!(LOGIN_SUCCESS).increment(1);
            info!(email = %identity.email, "login succeeded");
            Ok((
                [(SET_COOKIE, cookie)],
                Redirect::to(&security.login_success_redirect),
            )
                .into_response())
        },
        Err(err) if err.is_credential_failure() => {
            counter!(LOGIN_FAILURE).increment(1);
            warn!(email = %form.email, reason = %err, "login failed");
            Ok(Redirect::to(&format!("{}?error", security.login_path)).into_response())
        },
        Err(AuthError::StoreUnavailable(reason)) => {
            error!(email = %form.email, error = %reason, "login could not be completed");
            Err(AppError::StoreUnavailable(reason))
        },
        Err(err) => {
            error!(email = %form.email, error = %err, "login could not be completed");
            Err(AppError::Internal(err.to_string()))
        },
    }
}
