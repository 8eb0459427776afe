use crate::auth::{
    AuthError, Authenticator, CredentialLookup, LookupError, PasswordEncoder, PasswordError,
};
use async_trait::async_trait;
use regapp_common::Identity;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Hashed once per authenticator and verified against whenever the email is
/// unknown, so a miss costs as much as a wrong password.
///
/// The dummy hash uses the configured cost. Identities whose stored hash
/// predates a cost change verify at their own cost, so their timing differs
/// from a miss until they are re-provisioned; `authenticate` warns when it
/// sees one.
const DUMMY_PASSWORD: &str = "regapp-dummy-password";

/// Bounds how many scrypt verifications run at once.
/// Each one holds `128 * r * 2^log_n` bytes for its whole run.
#[derive(Clone)]
struct VerifyLimiter {
    permits: Arc<Semaphore>,
}

impl VerifyLimiter {
    fn new(limit: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(limit.clamp(1, Semaphore::MAX_PERMITS))),
        }
    }

    /// Run `job` on the blocking pool once a slot is free. The slot is held
    /// until the job finishes, even if the caller stops waiting.
    async fn run<T, F>(&self, job: F) -> Result<T, AuthError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| AuthError::Internal(format!("verification limiter closed: {e}")))?;
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| AuthError::Internal(format!("password verification task failed: {e}")))
    }
}

pub struct DefaultAuth<L> {
    lookup: L,
    encoder: PasswordEncoder,
    dummy_hash: String,
    limiter: VerifyLimiter,
}

impl<L: CredentialLookup> DefaultAuth<L> {
    /// `max_concurrent_verifications` caps parallel scrypt runs; further
    /// attempts queue
    pub fn new(
        lookup: L,
        encoder: PasswordEncoder,
        max_concurrent_verifications: usize,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = encoder.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            lookup,
            encoder,
            dummy_hash,
            limiter: VerifyLimiter::new(max_concurrent_verifications),
        })
    }

    async fn verify(&self, hash: String, password: &str) -> Result<bool, AuthError> {
        let encoder = self.encoder;
        let password = password.to_owned();
        self.limiter
            .run(move || encoder.verify(&hash, &password))
            .await
    }
}

#[async_trait]
impl<L: CredentialLookup> Authenticator for DefaultAuth<L> {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = match self.lookup.load_by_email(email).await {
            Ok(identity) => identity,
            Err(LookupError::IdentityNotFound { email }) => {
                let _ = self.verify(self.dummy_hash.clone(), password).await?;
                return Err(AuthError::IdentityNotFound { email });
            },
            Err(LookupError::StoreUnavailable(e)) => {
                return Err(AuthError::StoreUnavailable(e.to_string()));
            },
        };

        if !self.verify(identity.password_hash.clone(), password).await? {
            return Err(AuthError::PasswordMismatch {
                email: identity.email,
            });
        }

        if !identity.enabled {
            return Err(AuthError::Disabled {
                email: identity.email,
            });
        }

        if self.encoder.needs_rehash(&identity.password_hash) {
            warn!(
                email = %identity.email,
                configured_cost = self.encoder.cost(),
                "stored password hash uses other parameters than the configured cost; re-provision it"
            );
        }

        debug!(email = %identity.email, "credentials verified");
        Ok(identity)
    }
}
