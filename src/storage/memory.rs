//! In-memory store

use rustc_hash::FxHashMap;

use crate::storage::{KeyValueStore, StorageError};

/// Keeps slots in process memory. Contents are lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slots are occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value);

        Ok(())
    }
}
