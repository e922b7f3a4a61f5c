//! High-level API for the stored credential pair.

use crate::{CredentialStore, StorageKeys, StorageResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Access and refresh tokens issued together by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .finish()
    }
}

/// Reads and writes the credential pair through a storage backend.
///
/// Cheap to clone; clones share the same backend.
#[derive(Clone)]
pub struct CredentialsManager {
    storage: Arc<dyn CredentialStore>,
}

impl CredentialsManager {
    pub fn new(storage: Arc<dyn CredentialStore>) -> Self {
        Self { storage }
    }

    pub fn access_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::ACCESS_TOKEN)
    }

    pub fn refresh_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::REFRESH_TOKEN)
    }

    pub fn has_access_token(&self) -> StorageResult<bool> {
        self.storage.has(StorageKeys::ACCESS_TOKEN)
    }

    /// Both tokens, when both are present.
    pub fn pair(&self) -> StorageResult<Option<CredentialPair>> {
        match (self.access_token()?, self.refresh_token()?) {
            (Some(access_token), Some(refresh_token)) => Ok(Some(CredentialPair {
                access_token,
                refresh_token,
            })),
            _ => Ok(None),
        }
    }

    /// Replace the stored pair in one write.
    pub fn set_pair(&self, pair: &CredentialPair) -> StorageResult<()> {
        debug!("Storing credential pair");
        self.storage.set_many(&[
            (StorageKeys::ACCESS_TOKEN, pair.access_token.as_str()),
            (StorageKeys::REFRESH_TOKEN, pair.refresh_token.as_str()),
        ])
    }

    /// Remove every persisted credential.
    pub fn clear(&self) -> StorageResult<()> {
        debug!("Clearing stored credentials");
        self.storage.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn manager() -> CredentialsManager {
        CredentialsManager::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_pair_roundtrip() {
        let manager = manager();
        assert!(manager.pair().unwrap().is_none());

        manager.set_pair(&CredentialPair::new("a1", "r1")).unwrap();

        assert_eq!(manager.access_token().unwrap(), Some("a1".to_string()));
        assert_eq!(manager.refresh_token().unwrap(), Some("r1".to_string()));
        assert_eq!(
            manager.pair().unwrap(),
            Some(CredentialPair::new("a1", "r1"))
        );
    }

    #[test]
    fn test_pair_requires_both_tokens() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(StorageKeys::ACCESS_TOKEN, "a1").unwrap();
        let manager = CredentialsManager::new(storage);

        assert!(manager.has_access_token().unwrap());
        assert!(manager.pair().unwrap().is_none());
    }

    #[test]
    fn test_set_pair_replaces_previous() {
        let manager = manager();
        manager.set_pair(&CredentialPair::new("a1", "r1")).unwrap();
        manager.set_pair(&CredentialPair::new("a2", "r2")).unwrap();

        assert_eq!(
            manager.pair().unwrap(),
            Some(CredentialPair::new("a2", "r2"))
        );
    }

    #[test]
    fn test_clear_removes_everything() {
        let manager = manager();
        manager.set_pair(&CredentialPair::new("a1", "r1")).unwrap();

        manager.clear().unwrap();

        assert!(!manager.has_access_token().unwrap());
        assert!(manager.refresh_token().unwrap().is_none());
    }

    #[test]
    fn test_clones_share_storage() {
        let manager = manager();
        let clone = manager.clone();
        clone.set_pair(&CredentialPair::new("a1", "r1")).unwrap();

        assert_eq!(manager.access_token().unwrap(), Some("a1".to_string()));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let rendered = format!("{:?}", CredentialPair::new("secret-a", "secret-r"));
        assert!(!rendered.contains("secret-a"));
        assert!(!rendered.contains("secret-r"));
    }
}
