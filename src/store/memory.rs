//! In-memory credential store
//!
//! Clones share the same entries, so a caller can keep a handle and inspect
//! what the session manager persisted.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{CredentialStore, StoreResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a persisted session
    pub fn with_credentials(token: &str, address: &str) -> Self {
        let store = Self::new();
        {
            let mut entries = store.entries();
            entries.insert(super::TOKEN_KEY.to_string(), token.to_string());
            entries.insert(super::ADDRESS_KEY.to_string(), address.to_string());
        }
        store
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ADDRESS_KEY, TOKEN_KEY};

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryCredentialStore::new();
        let handle = store.clone();

        store.set(TOKEN_KEY, "T1").unwrap();
        assert_eq!(handle.get(TOKEN_KEY).unwrap(), Some("T1".to_string()));

        handle.remove(TOKEN_KEY).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_seeded_credentials() {
        let store = MemoryCredentialStore::with_credentials("T1", "A1");
        assert_eq!(store.get(TOKEN_KEY).unwrap(), Some("T1".to_string()));
        assert_eq!(store.get(ADDRESS_KEY).unwrap(), Some("A1".to_string()));
    }
}
