//! In-memory store.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{PersistenceStore, StoreKey};
use crate::error::StoreError;

/// A store that keeps values in memory only.
///
/// Used by tests and by `hoverpane --ephemeral`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<StoreKey, serde_json::Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl PersistenceStore for MemoryStore {
    fn load_raw(&self, key: StoreKey) -> Option<serde_json::Value> {
        self.data.read().get(&key).cloned()
    }

    fn save_raw(&self, key: StoreKey, value: serde_json::Value) -> Result<(), StoreError> {
        self.data.write().insert(key, value);
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<(), StoreError> {
        self.data.write().remove(&key);
        Ok(())
    }
}
