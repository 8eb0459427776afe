//! Configured route rules applied by the gate
use crate::test_utils::*;
use axum::http::StatusCode;
use backend_lib::auth::MIN_HASH_COST;
use regapp_common::{Access, RouteRule};

#[tokio::test]
async fn test_permit_all_everything_opens_dashboard_route() {
    let mut settings = test_settings();
    settings.security.routes = vec![RouteRule::permit_all("/**")];
    let (_state, router) = setup_app(&settings);

    // the gate lets the request through; the handler itself still needs a user
    let response = send(&router, get("/dashboard", None)).await;
    assert_ne!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_default_permit_all_with_protected_prefix() {
    let mut settings = test_settings();
    settings.security.default_access = Access::PermitAll;
    settings.security.routes = vec![RouteRule::authenticated("/dashboard/**")];
    let (_state, router) = setup_app(&settings);

    let response = send(&router, get("/dashboard", None)).await;
    assert_eq!(location(&response), Some("/login"));

    let response = send(&router, get("/nowhere", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_paths_are_protected_by_default() {
    let settings = test_settings();
    let (_state, router) = setup_app(&settings);

    let response = send(&router, get("/reports/2024", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    let response = send(&router, get("/static/site.css", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_custom_login_path() {
    let mut settings = test_settings();
    settings.security.login_path = "/signin".to_string();
    let (_state, router) = setup_app(&settings);

    let response = send(&router, get("/dashboard", None)).await;
    assert_eq!(location(&response), Some("/signin"));

    let response = send(&router, post_form("/signin", &login_body(EMAIL, "bad"), None)).await;
    assert_eq!(location(&response), Some("/signin?error"));
}

#[test]
fn test_conflicting_login_paths_fail_at_startup_not_in_router() {
    for (login_path, logout_path) in [("/login", "/login"), ("/", "/logout"), ("/:x", "/logout")] {
        let mut settings = test_settings();
        settings.security.login_path = login_path.to_string();
        settings.security.logout_path = logout_path.to_string();

        let result = backend_lib::AppState::new(seeded_store(MIN_HASH_COST), &settings);
        assert!(
            matches!(result, Err(backend_lib::error::AppError::Config(_))),
            "login={login_path} logout={logout_path}"
        );
    }
}

#[tokio::test]
async fn test_renamed_login_and_logout_routes_mount() {
    let mut settings = test_settings();
    settings.security.login_path = "/signin".to_string();
    settings.security.logout_path = "/signout".to_string();
    let (_state, router) = setup_app(&settings);

    let response = send(&router, post_form("/signout", "", None)).await;
    assert_eq!(location(&response), Some("/login?logout"));
}
