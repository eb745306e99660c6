//! Key-value storage slots the cart persists into.
//!
//! The cart lives in a single string slot ([`CART_STORAGE_KEY`]) of a
//! browser-scoped key-value store. Hosts adapt whatever they have (a session,
//! a directory of files, plain memory) to [`KeyValueStorage`].

use std::collections::HashMap;

/// The storage key holding the JSON-serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors raised by a storage backend.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string-to-string store, modeled on the browser's `localStorage`.
pub trait KeyValueStorage {
    /// Read the value under `key`, or `None` if nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// In-memory storage.
///
/// ```
/// use cart_widget_core::{KeyValueStorage, MemoryStorage};
///
/// let mut storage = MemoryStorage::default();
/// storage.set_item("cart", "[]".to_string()).unwrap();
/// assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("[]"));
/// assert_eq!(storage.get_item("other").unwrap(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Storage pre-populated with a single entry.
    #[must_use]
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }

    /// Take the value under `key` out of the storage.
    pub fn take_item(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &mut S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}
