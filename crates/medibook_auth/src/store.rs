// --- File: crates/medibook_auth/src/store.rs ---
use std::collections::HashMap;

use async_trait::async_trait;
use medibook_config::{UserSeed, SECRET_MARKER};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A user who may log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub email: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
}

/// Lookup of credential records by identity (email).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find(&self, identity: &str) -> Option<CredentialRecord>;
}

/// Read-only store seeded once at startup.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    users: HashMap<String, CredentialRecord>,
}

impl InMemoryCredentialStore {
    pub fn new(records: impl IntoIterator<Item = CredentialRecord>) -> Self {
        Self {
            users: records
                .into_iter()
                .map(|record| (record.email.clone(), record))
                .collect(),
        }
    }

    /// Builds the store from `[[auth.users]]`. Seeds whose hash was never
    /// supplied are skipped.
    pub fn from_seeds(seeds: &[UserSeed]) -> Self {
        let records = seeds.iter().filter_map(|seed| {
            if seed.password_hash.is_empty() || seed.password_hash == SECRET_MARKER {
                warn!("No password hash for user {}; skipping", seed.email);
                return None;
            }
            Some(CredentialRecord {
                email: seed.email.clone(),
                password_hash: seed.password_hash.clone(),
                role: seed.role.clone(),
            })
        });
        let store = Self::new(records);
        info!("Credential store seeded with {} user(s)", store.len());
        store
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find(&self, identity: &str) -> Option<CredentialRecord> {
        self.users.get(identity).cloned()
    }
}
