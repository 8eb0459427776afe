// ================
// common/src/lib.rs
// ================
//! Common types shared between the registration app's gate, its
//! persistence adapters and the provisioning CLI.
//! This module defines the stored identity record, the login/logout form
//! payloads and the route-access rule data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// A stored user record keyed by email.
///
/// The email is the login identifier and identifies at most one record.
/// `password_hash` is an opaque PHC string produced by a salted one-way
/// hash; it is never compared directly.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Record id. A hand-written record without one gets a fresh id on
    /// each read until the store rewrites it.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Login identifier (opaque, case-sensitive)
    pub email: String,
    /// PHC-formatted password hash
    pub password_hash: String,
    /// Granted roles (carried, not enforced)
    #[serde(default)]
    pub roles: BTreeSet<String>,
    /// Disabled identities cannot log in
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// When the record was provisioned; defaults to the read time when absent
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

impl Identity {
    /// Create an enabled identity with no roles
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            roles: BTreeSet::new(),
            enabled: true,
            created_at: Utc::now(),
        }
    }

    /// Grant a role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Mark the identity as disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[redacted]")
            .field("roles", &self.roles)
            .field("enabled", &self.enabled)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Login form submission
/// # Fields
/// * `email` - Login identifier
/// * `password` - Plaintext password, never logged
/// * `csrf` - Double-submit token, required only when CSRF protection is on
#[derive(Deserialize, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default, rename = "_csrf")]
    pub csrf: Option<String>,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("csrf", &self.csrf.as_ref().map(|_| "[present]"))
            .finish()
    }
}

/// Logout form submission
#[derive(Deserialize, Debug, Clone, Default)]
pub struct LogoutForm {
    #[serde(default, rename = "_csrf")]
    pub csrf: Option<String>,
}

/// Access requirement attached to a route pattern
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Reachable without a session
    PermitAll,
    /// Requires an authenticated session
    Authenticated,
}

/// One entry of the ordered route rule list
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    /// Path glob (`/**`, `/static/*`, `/login`)
    pub pattern: String,
    /// Requirement applied when the pattern matches
    pub access: Access,
}

impl RouteRule {
    pub fn permit_all(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            access: Access::PermitAll,
        }
    }

    pub fn authenticated(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            access: Access::Authenticated,
        }
    }
}
