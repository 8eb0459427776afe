// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `Authenticator` trait, which the gate uses to
//! verify submitted credentials
use async_trait::async_trait;
use regapp_common::Identity;
use thiserror::Error;

/// Why an authentication attempt failed.
///
/// The first three variants are credential failures and must reach the end
/// user as one generic message; the email is kept for operator logs.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user with email {email} not found")]
    IdentityNotFound { email: String },

    #[error("password mismatch for {email}")]
    PasswordMismatch { email: String },

    #[error("identity {email} is disabled")]
    Disabled { email: String },

    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("authentication failed: {0}")]
    Internal(String),
}

impl AuthError {
    /// True for failures caused by the submitted credentials rather than
    /// by infrastructure
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AuthError::IdentityNotFound { .. }
                | AuthError::PasswordMismatch { .. }
                | AuthError::Disabled { .. }
        )
    }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify `password` for `email` and return the matching identity
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
}
