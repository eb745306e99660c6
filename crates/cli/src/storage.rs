//! File-backed key-value storage.
//!
//! Each key is a `<key>.json` file in one directory. Writes go through a
//! temporary file in the same directory and are renamed into place, so a
//! crashed write never leaves a half-written cart behind.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use cart_widget_core::{KeyValueStorage, StorageError};
use tempfile::NamedTempFile;

/// A directory of JSON files, one per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] for keys that are not a plain
    /// file name.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::Unavailable(format!(
                "invalid storage key: {key:?}"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(value.as_bytes())?;
        file.persist(&path).map_err(|e| e.error)?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "storage slot written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_unset() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get_item("cart").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));

        storage.set_item("cart", "[]".to_string()).unwrap();
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("nested/cart.json").is_file());

        storage.set_item("cart", "[1]".to_string()).unwrap();
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());

        assert!(matches!(
            storage.set_item("../cart", String::new()),
            Err(StorageError::Unavailable(_))
        ));
        assert!(matches!(
            storage.get_item(""),
            Err(StorageError::Unavailable(_))
        ));
    }
}
