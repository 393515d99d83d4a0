//! In-memory store backends.
//!
//! Suitable for tests and single-process deployments; the production
//! identity and memorial services implement the same traits over their
//! own persistence.

use super::{IdentityStore, MemorialStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use solace_access_types::{Identity, Memorial};
use solace_common_core::{MemorialId, UserId};

/// In-memory identity store.
#[derive(Default)]
pub struct MemoryIdentityStore {
    users: DashMap<UserId, Identity>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an identity.
    pub fn upsert(&self, identity: Identity) {
        self.users.insert(identity.id, identity);
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn load(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }
}

/// In-memory memorial store.
#[derive(Default)]
pub struct MemoryMemorialStore {
    memorials: DashMap<MemorialId, Memorial>,
}

impl MemoryMemorialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a memorial.
    pub fn upsert(&self, memorial: Memorial) {
        self.memorials.insert(memorial.id, memorial);
    }

    /// Number of stored memorials.
    pub fn len(&self) -> usize {
        self.memorials.len()
    }

    /// True when no memorials are stored.
    pub fn is_empty(&self) -> bool {
        self.memorials.is_empty()
    }
}

#[async_trait]
impl MemorialStore for MemoryMemorialStore {
    async fn load(&self, id: MemorialId) -> Result<Option<Memorial>, StoreError> {
        Ok(self.memorials.get(&id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, memorial: &Memorial) -> Result<(), StoreError> {
        self.memorials.insert(memorial.id, memorial.clone());
        Ok(())
    }

    async fn delete(&self, id: MemorialId) -> Result<(), StoreError> {
        self.memorials.remove(&id);
        Ok(())
    }

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Memorial>, StoreError> {
        Ok(self
            .memorials
            .iter()
            .filter(|entry| entry.value().owner == owner)
            .map(|entry| entry.value().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use solace_access_types::{Role, SubscriptionTier};

    #[tokio::test]
    async fn test_identity_load_absent_is_none_not_error() {
        let store = MemoryIdentityStore::new();
        let loaded = store.load(UserId::new()).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_identity_roundtrip() {
        let store = MemoryIdentityStore::new();
        let identity = Identity::new(UserId::new(), Role::User, SubscriptionTier::Premium);
        store.upsert(identity.clone());

        let loaded = store.load(identity.id).await.unwrap();
        assert_eq!(loaded, Some(identity));
    }

    #[tokio::test]
    async fn test_list_for_owner_filters() {
        let store = MemoryMemorialStore::new();
        let owner = UserId::new();
        let other = UserId::new();
        let now = Utc::now();

        store.upsert(Memorial::new(owner, "First", now));
        store.upsert(Memorial::new(owner, "Second", now));
        store.upsert(Memorial::new(other, "Elsewhere", now));

        let owned = store.list_for_owner(owner).await.unwrap();
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|m| m.owner == owner));
    }

    #[tokio::test]
    async fn test_delete_removes() {
        let store = MemoryMemorialStore::new();
        let memorial = Memorial::new(UserId::new(), "Eleanor Vance", Utc::now());
        let id = memorial.id;
        store.upsert(memorial);

        store.delete(id).await.unwrap();
        assert!(store.load(id).await.unwrap().is_none());
        assert!(store.is_empty());
    }
}
