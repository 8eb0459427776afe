// ============================
// backend-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
use super::token_generator::generate_secure_token;
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_EXPIRED, SESSION_INVALIDATED};
use metrics::{counter, gauge};
use regapp_common::Identity;
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

/// Absolute session lifetime (8 hours)
pub const SESSION_ABSOLUTE_TTL: Duration = Duration::from_secs(60 * 60 * 8);

/// Idle session lifetime (30 minutes)
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(60 * 30);

/// Proof of a prior successful login, scoped to one identity
#[derive(Debug, Clone)]
pub struct Session {
    pub email: String,
    pub roles: BTreeSet<String>,
    pub created_at: Instant,
    pub last_active: Instant,
}

impl Session {
    fn is_expired(&self, now: Instant, absolute_ttl: Duration, idle_ttl: Duration) -> bool {
        now.duration_since(self.created_at) >= absolute_ttl
            || now.duration_since(self.last_active) >= idle_ttl
    }
}

/// In-memory session store keyed by opaque token
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    absolute_ttl: Duration,
    idle_ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Create a new session manager with the default lifetimes
    pub fn new() -> Self {
        Self::new_with_timeouts(SESSION_ABSOLUTE_TTL, SESSION_IDLE_TTL)
    }

    /// Create a new session manager with custom timeouts
    pub fn new_with_timeouts(absolute_ttl: Duration, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            absolute_ttl,
            idle_ttl,
        }
    }

    pub fn absolute_ttl(&self) -> Duration {
        self.absolute_ttl
    }

    /// Create a session for an authenticated identity and return its token
    pub async fn create_session(&self, identity: &Identity) -> String {
        let token = generate_secure_token();
        let now = Instant::now();
        let session = Session {
            email: identity.email.clone(),
            roles: identity.roles.clone(),
            created_at: now,
            last_active: now,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), session);

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(sessions.len() as f64);

        token
    }

    /// Look up a live session and refresh its idle timer.
    /// Expired sessions are removed and reported as absent.
    pub async fn get_session(&self, token: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();

        let expired = sessions
            .get(token)?
            .is_expired(now, self.absolute_ttl, self.idle_ttl);
        if expired {
            sessions.remove(token);
            counter!(SESSION_EXPIRED).increment(1);
            gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
            return None;
        }

        let session = sessions.get_mut(token)?;
        session.last_active = now;
        Some(session.clone())
    }

    /// Invalidate a session. Returns whether it existed.
    pub async fn invalidate(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(token).is_some();
        if removed {
            counter!(SESSION_INVALIDATED).increment(1);
            gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        }
        removed
    }

    /// Remove every expired session, returning how many were dropped
    pub async fn cleanup_expired_sessions(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let before_count = sessions.len();

        sessions.retain(|_, session| !session.is_expired(now, self.absolute_ttl, self.idle_ttl));

        let after_count = sessions.len();
        let removed = before_count - after_count;
        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed as u64);
            gauge!(SESSION_ACTIVE).set(after_count as f64);
        }
        removed
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
