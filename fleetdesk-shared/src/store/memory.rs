/// In-memory identity store
///
/// Backs the test suites and local tooling; keyed by normalized email. Not
/// intended for production use — nothing survives a restart.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identity::Identity;

use super::{IdentityRecord, IdentityStore, NewIdentity, StoreError};

/// Identity store backed by a process-local map
#[derive(Default)]
pub struct MemoryIdentityStore {
    records: RwLock<HashMap<String, IdentityRecord>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record directly, bypassing duplicate checks (test setup)
    pub fn insert(&self, record: IdentityRecord) {
        self.records
            .write()
            .unwrap()
            .insert(record.identity.email.clone(), record);
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, StoreError> {
        Ok(self.records.read().unwrap().get(email).cloned())
    }

    async fn create(&self, data: NewIdentity) -> Result<Identity, StoreError> {
        let mut records = self.records.write().unwrap();

        if records.contains_key(&data.email) {
            return Err(StoreError::Duplicate);
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            email: data.email.clone(),
            role: data.role,
            employee_id: data.employee_id,
            truck_id: data.truck_id,
        };

        records.insert(
            data.email,
            IdentityRecord {
                identity: identity.clone(),
                password_hash: data.password_hash,
            },
        );

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::identity::Role;

    fn new_identity(email: &str) -> NewIdentity {
        NewIdentity {
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role: Role::User,
            employee_id: None,
            truck_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryIdentityStore::new();

        let created = store.create(new_identity("ada@example.com")).await.unwrap();
        let found = store.find_by_email("ada@example.com").await.unwrap().unwrap();

        assert_eq!(found.identity, created);
        assert_eq!(found.password_hash, "$argon2id$placeholder");
    }

    #[tokio::test]
    async fn test_missing_email_is_none() {
        let store = MemoryIdentityStore::new();

        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryIdentityStore::new();
        store.create(new_identity("ada@example.com")).await.unwrap();

        let result = store.create(new_identity("ada@example.com")).await;

        assert!(matches!(result, Err(StoreError::Duplicate)));
    }
}
