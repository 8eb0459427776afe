// ============================
// crates/backend-lib/src/gate/mod.rs
// ============================
//! Authentication gate: route policy, cookies, CSRF tokens and the
//! authenticated-user extractor.
pub mod cookies;
pub mod csrf;
pub mod rules;

pub use rules::{PatternError, RoutePattern, RouteRules};

use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::collections::BTreeSet;

/// The identity behind the current request's session.
/// Inserted into request extensions by the session gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
    pub roles: BTreeSet<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}
