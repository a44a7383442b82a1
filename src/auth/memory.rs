use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, hash_map::Entry};
use tokio::sync::RwLock;

use super::credentials::{Credential, CredentialStore, InsertOutcome};

/// Process-local credential store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, Credential>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<Credential>> {
        Ok(self.users.read().await.get(login).cloned())
    }

    async fn insert(&self, credential: Credential) -> Result<InsertOutcome> {
        // The write lock covers both the lookup and the insert.
        let mut users = self.users.write().await;
        match users.entry(credential.login.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(credential);
                Ok(InsertOutcome::Created)
            }
        }
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
