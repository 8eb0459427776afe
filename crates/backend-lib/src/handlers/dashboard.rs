use super::{csrf_input, escape_html, page};
use crate::gate::{csrf, AuthenticatedUser};
use crate::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, Redirect},
};
use std::sync::Arc;

/// `GET /`: forwards to the landing page
pub async fn index(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::to(&state.settings.security.login_success_redirect)
}

/// `GET /dashboard`: landing page after login
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    user: AuthenticatedUser,
) -> Html<String> {
    let security = &state.settings.security;
    let token = if security.csrf_enabled {
        csrf::current_token(&headers)
    } else {
        None
    };

    let body = format!(
        "<h1>Dashboard</h1>\n<p>Signed in as <strong>{email}</strong></p>\n\
         <form method=\"post\" action=\"{action}\">{csrf}<button type=\"submit\">Sign out</button></form>",
        email = escape_html(&user.email),
        action = escape_html(&security.logout_path),
        csrf = csrf_input(token.as_deref()),
    );
    Html(page("Dashboard", &body))
}
