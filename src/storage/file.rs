//! File-backed store

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::storage::{KeyValueStore, StorageError};

/// Keeps each slot in its own `<key>.json` file under a base directory.
///
/// The directory is created on first write. Writes go to a temporary sibling
/// file which is then renamed over the slot.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory holding the slot files.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if the key is empty, starts with a `.`,
    /// or contains anything other than ASCII alphanumerics, `-`, `_` and `.`.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.base_path.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.slot_path(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let tmp_path = path.with_extension("json.tmp");

        fs::create_dir_all(&self.base_path)?;
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;

        Ok(())
    }
}
