// =============
// crates/backend-lib/src/auth/lookup.rs
// =============
//! Credential store adapter: maps a login email to a stored identity.
use crate::storage::{IdentityRepository, StoreError};
use async_trait::async_trait;
use regapp_common::Identity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    /// No identity is registered under the queried email
    #[error("user with email {email} not found")]
    IdentityNotFound { email: String },

    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

/// Load-identity-by-email capability the gate authenticates against
#[async_trait]
pub trait CredentialLookup: Send + Sync {
    /// Resolve `email` to its identity. Not-found is an ordinary result
    /// carrying the queried email; it is neither logged nor swallowed here.
    async fn load_by_email(&self, email: &str) -> Result<Identity, LookupError>;
}

/// Bridges an [`IdentityRepository`] to [`CredentialLookup`]
pub struct CredentialStoreAdapter<R> {
    repository: R,
}

impl<R: IdentityRepository> CredentialStoreAdapter<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: IdentityRepository> CredentialLookup for CredentialStoreAdapter<R> {
    async fn load_by_email(&self, email: &str) -> Result<Identity, LookupError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| LookupError::IdentityNotFound {
                email: email.to_string(),
            })
    }
}
