//! Storage trait definitions.

use crate::StorageResult;

/// Trait for credential storage backends.
///
/// Implementations are synchronous and internally locked; callers share them
/// behind an `Arc`.
pub trait CredentialStore: Send + Sync {
    /// Store a value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Retrieve a value
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Delete a value, returning whether it existed
    fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Remove every stored value
    fn clear(&self) -> StorageResult<()>;

    /// Check if a key exists
    fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Store several values together.
    ///
    /// The default writes them one by one; backends that can replace them in
    /// a single write override this.
    fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}
