//! Unit tests for the identity stores behind the repository trait
use backend_lib::storage::{
    FlatFileIdentityStore, IdentityRepository, InMemoryIdentityStore, StoreError,
    IDENTITIES_FILE,
};
use regapp_common::Identity;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_flat_file_store_persists_across_instances() {
    let dir = TempDir::new().unwrap();
    let store = FlatFileIdentityStore::new(dir.path()).unwrap();
    store
        .insert(Identity::new("a@x.com", "$scrypt$hash").with_role("USER"))
        .await
        .unwrap();

    let reopened = FlatFileIdentityStore::new(dir.path()).unwrap();
    let found = reopened.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(found.password_hash, "$scrypt$hash");
    assert!(found.roles.contains("USER"));
    assert!(dir.path().join(IDENTITIES_FILE).exists());
}

#[tokio::test]
async fn test_flat_file_store_rejects_duplicates() {
    let dir = TempDir::new().unwrap();
    let store = FlatFileIdentityStore::new(dir.path()).unwrap();
    store.insert(Identity::new("a@x.com", "h1")).await.unwrap();

    let err = store.insert(Identity::new("a@x.com", "h2")).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)));
    assert_eq!(store.read_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_corrupt_file_is_unavailable_not_missing() {
    let dir = TempDir::new().unwrap();
    let store = FlatFileIdentityStore::new(dir.path()).unwrap();
    std::fs::write(store.path(), "{ not json").unwrap();

    let err = store.find_by_email("a@x.com").await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test]
async fn test_repository_through_trait_object() {
    let store = InMemoryIdentityStore::new();
    store.insert(Identity::new("a@x.com", "h")).unwrap();
    let repository: Arc<dyn IdentityRepository> = Arc::new(store);

    assert!(repository.find_by_email("a@x.com").await.unwrap().is_some());
    assert!(repository.find_by_email("b@x.com").await.unwrap().is_none());
}
