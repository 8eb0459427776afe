// ============================
// backend-lib/src/storage.rs
// ============================
//! Identity persistence: the repository trait the credential adapter
//! depends on, plus in-memory and flat-file implementations.
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use regapp_common::Identity;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::{fs as tokio_fs, sync::Mutex};

/// File name of the flat-file store inside the storage directory
pub const IDENTITIES_FILE: &str = "identities.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("identity store unavailable: {0}")]
    Unavailable(String),

    #[error("identity with email {0} already exists")]
    Duplicate(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Unavailable(format!("corrupt identity file: {err}"))
    }
}

/// Persistence collaborator for stored identities
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find the identity registered under `email`.
    /// `Ok(None)` means no such identity; `Err` means the store failed.
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;
}

#[async_trait]
impl<R: IdentityRepository + ?Sized> IdentityRepository for Arc<R> {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        (**self).find_by_email(email).await
    }
}

/// Concurrent in-memory identity store
#[derive(Clone, Default)]
pub struct InMemoryIdentityStore {
    identities: Arc<DashMap<String, Identity>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity, rejecting a second record for the same email
    pub fn insert(&self, identity: Identity) -> Result<(), StoreError> {
        match self.identities.entry(identity.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(identity.email)),
            Entry::Vacant(slot) => {
                slot.insert(identity);
                Ok(())
            },
        }
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.identities.get(email).map(|entry| entry.value().clone()))
    }
}

/// Flat-file identity store: a JSON array in `<root>/identities.json`
#[derive(Clone)]
pub struct FlatFileIdentityStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FlatFileIdentityStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            path: root.join(IDENTITIES_FILE),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored identity. A missing file is an empty store.
    pub async fn read_all(&self) -> Result<Vec<Identity>, StoreError> {
        if !tokio_fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }

        let content = tokio_fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Append an identity, rejecting duplicate emails
    pub async fn insert(&self, identity: Identity) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut identities = self.read_all().await?;
        if identities.iter().any(|existing| existing.email == identity.email) {
            return Err(StoreError::Duplicate(identity.email));
        }
        identities.push(identity);

        // write to a sibling file then rename so readers never see a partial document
        let json = serde_json::to_string_pretty(&identities)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp_path, json).await?;
        tokio_fs::rename(&tmp_path, &self.path).await?;

        Ok(())
    }
}

#[async_trait]
impl IdentityRepository for FlatFileIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let identities = self.read_all().await?;
        Ok(identities.into_iter().find(|identity| identity.email == email))
    }
}
