//! End-to-end login, logout and gate behaviour through the router
use crate::test_utils::*;
use async_trait::async_trait;
use axum::http::StatusCode;
use backend_lib::{
    router::create_router,
    storage::{IdentityRepository, StoreError},
    AppState,
};
use regapp_common::Identity;
use std::sync::Arc;

#[tokio::test]
async fn test_valid_credentials_redirect_to_dashboard() {
    let settings = test_settings();
    let (state, router) = setup_app(&settings);

    let response = send(&router, post_form("/login", &login_body(EMAIL, PASSWORD), None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
    assert!(cookie_value(&response, &settings.session.cookie_name).is_some());
    assert_eq!(state.sessions.active_count().await, 1);
}

#[tokio::test]
async fn test_session_reaches_dashboard() {
    let settings = test_settings();
    let (_state, router) = setup_app(&settings);
    let cookie = login(&router, &settings).await;

    let response = send(&router, get("/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains(EMAIL));
    assert!(body.contains("action=\"/logout\""));
}

#[tokio::test]
async fn test_wrong_password_redirects_with_error() {
    let settings = test_settings();
    let (state, router) = setup_app(&settings);

    let response = send(&router, post_form("/login", &login_body(EMAIL, "wrong"), None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login?error"));
    assert!(cookie_value(&response, &settings.session.cookie_name).is_none());
    assert_eq!(state.sessions.active_count().await, 0);
}

#[tokio::test]
async fn test_unknown_email_is_indistinguishable_from_wrong_password() {
    let settings = test_settings();
    let (_state, router) = setup_app(&settings);

    let wrong_password =
        send(&router, post_form("/login", &login_body(EMAIL, "wrong"), None)).await;
    let unknown_email =
        send(&router, post_form("/login", &login_body("b@x.com", PASSWORD), None)).await;

    assert_eq!(wrong_password.status(), unknown_email.status());
    assert_eq!(location(&wrong_password), location(&unknown_email));
    assert_eq!(set_cookies(&wrong_password), set_cookies(&unknown_email));
    assert_eq!(body_string(wrong_password).await, body_string(unknown_email).await);
}

#[tokio::test]
async fn test_login_error_page_shows_generic_message() {
    let settings = test_settings();
    let (_state, router) = setup_app(&settings);

    let response = send(&router, get("/login?error", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains(backend_lib::error::INVALID_CREDENTIALS_MSG));
    assert!(!body.contains("not found"));
}

#[tokio::test]
async fn test_protected_route_without_session_redirects_to_login() {
    let settings = test_settings();
    let (_state, router) = setup_app(&settings);

    let response = send(&router, get("/dashboard", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    let forged = format!("{}=not-a-session", settings.session.cookie_name);
    let response = send(&router, get("/dashboard", Some(&forged))).await;
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_open_routes_need_no_session() {
    let settings = test_settings();
    let (_state, router) = setup_app(&settings);

    let response = send(&router, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");

    let response = send(&router, get("/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let settings = test_settings();
    let (state, router) = setup_app(&settings);
    let cookie = login(&router, &settings).await;

    let response = send(&router, post_form("/logout", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login?logout"));
    assert!(cookie_value(&response, &settings.session.cookie_name).is_none());
    assert_eq!(state.sessions.active_count().await, 0);

    let response = send(&router, get("/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_logout_without_session_still_redirects() {
    let settings = test_settings();
    let (_state, router) = setup_app(&settings);

    let response = send(&router, post_form("/logout", "", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login?logout"));
}

#[tokio::test]
async fn test_relogin_replaces_previous_session() {
    let settings = test_settings();
    let (state, router) = setup_app(&settings);
    let first = login(&router, &settings).await;

    let response = send(
        &router,
        post_form("/login", &login_body(EMAIL, PASSWORD), Some(&first)),
    )
    .await;
    let second = cookie_value(&response, &settings.session.cookie_name).unwrap();

    assert_ne!(format!("{}={second}", settings.session.cookie_name), first);
    assert_eq!(state.sessions.active_count().await, 1);
    let response = send(&router, get("/dashboard", Some(&first))).await;
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_custom_redirect_targets() {
    let mut settings = test_settings();
    settings.security.login_success_redirect = "/home".to_string();
    settings.security.logout_success_redirect = "/bye".to_string();
    let (_state, router) = setup_app(&settings);

    let response = send(&router, post_form("/login", &login_body(EMAIL, PASSWORD), None)).await;
    assert_eq!(location(&response), Some("/home"));

    let response = send(&router, post_form("/logout", "", None)).await;
    assert_eq!(location(&response), Some("/bye"));
}

struct UnavailableStore;

#[async_trait]
impl IdentityRepository for UnavailableStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<Identity>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_store_failure_is_service_unavailable() {
    let settings = test_settings();
    let state = Arc::new(AppState::new(UnavailableStore, &settings).unwrap());
    let router = create_router(state);

    let response = send(&router, post_form("/login", &login_body(EMAIL, PASSWORD), None)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(location(&response).is_none());

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["code"], "STORE_001");
}
