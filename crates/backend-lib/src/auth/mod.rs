// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.
pub mod lookup;
pub mod password;
mod service;
mod service_impl;
pub mod session;
pub mod token_generator;

pub use lookup::{CredentialLookup, CredentialStoreAdapter, LookupError};
pub use password::{
    validate_password_strength, verify_password, PasswordEncoder, PasswordError,
    PasswordRequirements, DEFAULT_HASH_COST, MAX_HASH_COST, MIN_HASH_COST, MIN_PASSWORD_LENGTH,
};
pub use service::{AuthError, Authenticator};
pub use service_impl::DefaultAuth;
pub use session::{Session, SessionManager, SESSION_ABSOLUTE_TTL, SESSION_IDLE_TTL};
