//! Credential storage for the autoreply client.
//!
//! This crate provides the storage port the API client persists its token
//! pair through, plus two backends:
//! - **File**: `~/.autoreply/credentials.json`, owner-only permissions
//! - **Memory**: process-local, used by tests and `--ephemeral` runs

mod credentials;
mod file;
mod keys;
mod memory;
mod traits;

pub use credentials::{CredentialPair, CredentialsManager};
pub use file::FileStore;
pub use keys::StorageKeys;
pub use memory::MemoryStore;
pub use traits::CredentialStore;

use client_config_and_utils::Paths;
use std::sync::Arc;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default file-backed storage under the given paths.
pub fn create_storage(paths: &Paths) -> StorageResult<Arc<dyn CredentialStore>> {
    let store = FileStore::open(paths.credentials_file())?;
    Ok(Arc::new(store))
}

/// Create a CredentialsManager with the default file storage.
pub fn create_credentials_manager(paths: &Paths) -> StorageResult<CredentialsManager> {
    let storage = create_storage(paths)?;
    Ok(CredentialsManager::new(storage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_storage_keys_distinct() {
        assert!(!StorageKeys::ACCESS_TOKEN.is_empty());
        assert!(!StorageKeys::REFRESH_TOKEN.is_empty());
        assert_ne!(StorageKeys::ACCESS_TOKEN, StorageKeys::REFRESH_TOKEN);
    }

    #[test]
    fn test_create_credentials_manager_uses_credentials_file() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let manager = create_credentials_manager(&paths).unwrap();
        manager.set_pair(&CredentialPair::new("a1", "r1")).unwrap();

        assert!(paths.credentials_file().exists());
        let again = create_credentials_manager(&paths).unwrap();
        assert_eq!(again.refresh_token().unwrap(), Some("r1".to_string()));
    }
}
