// ============================
// backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the registration app's
//! authentication gate.

pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod telemetry;

use crate::auth::{Authenticator, CredentialStoreAdapter, DefaultAuth, PasswordEncoder, SessionManager};
use crate::config::{ConfigError, Settings};
use crate::error::AppError;
use crate::gate::RouteRules;
use crate::storage::IdentityRepository;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Credential verification
    pub auth: Arc<dyn Authenticator>,
    /// Session manager
    pub sessions: Arc<SessionManager>,
    /// Configuration settings
    pub settings: Arc<Settings>,
    /// Compiled route policy
    pub rules: Arc<RouteRules>,
}

impl AppState {
    /// Create the state around an identity repository
    pub fn new<R: IdentityRepository + 'static>(
        repository: R,
        settings: &Settings,
    ) -> Result<Self, AppError> {
        let encoder = PasswordEncoder::new(settings.security.password_hash_cost)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let auth = DefaultAuth::new(
            CredentialStoreAdapter::new(repository),
            encoder,
            settings.security.max_concurrent_verifications,
        )
        .map_err(|e| AppError::Internal(e.to_string()))?;
        Self::with_authenticator(Arc::new(auth), settings)
    }

    /// Create the state around any authenticator
    pub fn with_authenticator(
        auth: Arc<dyn Authenticator>,
        settings: &Settings,
    ) -> Result<Self, AppError> {
        settings.validate()?;
        let rules = RouteRules::from_settings(&settings.security)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let sessions = SessionManager::new_with_timeouts(
            Duration::from_secs(settings.session.absolute_ttl_secs),
            Duration::from_secs(settings.session.idle_ttl_secs),
        );

        Ok(Self {
            auth,
            sessions: Arc::new(sessions),
            settings: Arc::new(settings.clone()),
            rules: Arc::new(rules),
        })
    }
}
