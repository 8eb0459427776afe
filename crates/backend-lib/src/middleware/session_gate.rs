//! Resolves the session cookie and enforces the route policy.
use crate::gate::{cookies::read_cookie, AuthenticatedUser};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Session gate middleware.
///
/// A request carrying a live session gets an [`AuthenticatedUser`]
/// extension. A request to a protected route without one is redirected to
/// the login page.
pub async fn session_gate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_name = &state.settings.session.cookie_name;
    if let Some(token) = read_cookie(request.headers(), cookie_name) {
        if let Some(session) = state.sessions.get_session(&token).await {
            request.extensions_mut().insert(AuthenticatedUser {
                email: session.email,
                roles: session.roles,
            });
            return next.run(request).await;
        }
    }

    let path = request.uri().path();
    if state.rules.requires_authentication(path) {
        debug!(path, "no session for protected route, redirecting to login");
        return Redirect::to(&state.settings.security.login_path).into_response();
    }

    next.run(request).await
}
