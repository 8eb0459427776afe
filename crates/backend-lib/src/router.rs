// ============================
// backend-lib/src/router.rs
// ============================
//! HTTP router with the authentication gate in front of every route.
use crate::handlers::{dashboard, health, index, login_page, login_submit, logout, not_found};
use crate::middleware::{csrf_guard, session_gate};
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub(crate) const INDEX_PATH: &str = "/";
pub(crate) const HEALTH_PATH: &str = "/health";
pub(crate) const DASHBOARD_PATH: &str = "/dashboard";

/// Routes the router always mounts; login and logout must not reuse them
pub(crate) const BUILTIN_PATHS: [&str; 3] = [INDEX_PATH, HEALTH_PATH, DASHBOARD_PATH];

/// Create the router with the built-in landing page
pub fn create_router(state: Arc<AppState>) -> Router {
    let app_routes = Router::new().route(DASHBOARD_PATH, get(dashboard));
    build_router(state, app_routes)
}

/// Wrap application routes with the login/logout routes and the gate.
/// Access to `app_routes` is decided by the configured route rules.
pub fn build_router(state: Arc<AppState>, app_routes: Router<Arc<AppState>>) -> Router {
    let login_path = state.settings.security.login_path.clone();
    let logout_path = state.settings.security.logout_path.clone();

    Router::new()
        .route(INDEX_PATH, get(index))
        .route(HEALTH_PATH, get(health))
        .route(&login_path, get(login_page).post(login_submit))
        .route(&logout_path, post(logout))
        .merge(app_routes)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), csrf_guard))
        .layer(middleware::from_fn_with_state(state.clone(), session_gate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
