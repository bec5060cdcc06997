//! Key-value storage
//!
//! Durable slots for session state. Each slot is a string value under a string key.

use std::io;

use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error reading or writing a slot
    #[error("storage IO error: {0}")]
    Io(#[from] io::Error),

    /// Key cannot be used by this store
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A store of string values keyed by string.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the slot exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value cannot be written.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}
