// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error taxonomy as the HTTP layer sees it
use axum::http::StatusCode;
use axum::response::IntoResponse;
use backend_lib::auth::AuthError;
use backend_lib::error::AppError;

#[test]
fn test_credential_failures_are_classified_together() {
    let failures = [
        AuthError::IdentityNotFound {
            email: "b@x.com".to_string(),
        },
        AuthError::PasswordMismatch {
            email: "a@x.com".to_string(),
        },
        AuthError::Disabled {
            email: "off@x.com".to_string(),
        },
    ];

    for failure in failures {
        assert!(failure.is_credential_failure(), "{failure}");
    }
}

#[test]
fn test_store_failure_is_not_a_credential_failure() {
    let failure = AuthError::StoreUnavailable("disk gone".to_string());
    assert!(!failure.is_credential_failure());
    assert!(!AuthError::Internal("join error".to_string()).is_credential_failure());
}

#[test]
fn test_error_codes() {
    assert_eq!(AppError::Unauthenticated.error_code(), "AUTH_002");
    assert_eq!(AppError::CsrfRejected.error_code(), "AUTH_003");
    assert_eq!(
        AppError::StoreUnavailable(String::new()).error_code(),
        "STORE_001"
    );
}

#[test]
fn test_into_response_status() {
    assert_eq!(
        AppError::CsrfRejected.into_response().status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        AppError::StoreUnavailable("disk gone".to_string())
            .into_response()
            .status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        AppError::Internal("boom".to_string()).into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
