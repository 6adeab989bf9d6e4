//! Durable key-value persistence.
//!
//! Models the client's local storage: the access token survives reloads of
//! the same client, and the buy-now record lives just long enough to carry
//! a single purchase from the product page into checkout.
//!
//! The token is never cached by callers - it is read from here at the
//! moment of each request, so a refresh performed by one in-flight call is
//! immediately visible to every other.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::StorageError;

/// Well-known storage keys.
pub mod keys {
    /// Bearer credential attached to authenticated requests.
    pub const ACCESS_TOKEN: &str = "accessToken";

    /// Legacy refresh token slot. Written on login and deleted on logout,
    /// but never read - the refresh flow relies on the server-set cookie.
    pub const REFRESH_TOKEN: &str = "refreshToken";

    /// Short-lived buy-now record written by the product page and consumed
    /// once by checkout.
    pub const DIRECT_CHECKOUT_ITEM: &str = "directCheckoutItem";
}

/// Key-value persistence for client-side state.
///
/// Mutation only ever happens in direct response to a single user action
/// or a single completed network callback, so a plain read-write lock is
/// all the coordination the implementations need.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store. State lives for the client process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .map
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.map
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// File-backed store: a single JSON object of string keys and values.
///
/// Each operation does a full read-modify-write. The store is tiny (a
/// handful of keys) and mutations are rare, so simplicity wins over
/// cleverness here.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within one process.
    lock: RwLock<()>,
}

impl FileStore {
    /// Create a store backed by the JSON file at `path`.
    ///
    /// The file is created on first write; a missing file reads as empty.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: RwLock::new(()),
        }
    }

    fn read_map(&self) -> Result<HashMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self
            .lock
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self
            .lock
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut map = self.read_map()?;
        map.insert(key.to_owned(), value.to_owned());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self
            .lock
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert_eq!(store.get(keys::ACCESS_TOKEN).unwrap(), None);

        store.set(keys::ACCESS_TOKEN, "tok-1").unwrap();
        assert_eq!(
            store.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
            Some("tok-1")
        );

        store.remove(keys::ACCESS_TOKEN).unwrap();
        assert_eq!(store.get(keys::ACCESS_TOKEN).unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = std::env::temp_dir().join(format!(
            "clementine-storage-test-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        {
            let store = FileStore::new(path.clone());
            store.set(keys::ACCESS_TOKEN, "tok-persisted").unwrap();
            store.set(keys::REFRESH_TOKEN, "legacy").unwrap();
            store.remove(keys::REFRESH_TOKEN).unwrap();
        }

        let reopened = FileStore::new(path.clone());
        assert_eq!(
            reopened.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
            Some("tok-persisted")
        );
        assert_eq!(reopened.get(keys::REFRESH_TOKEN).unwrap(), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let store = FileStore::new(std::env::temp_dir().join("clementine-does-not-exist.json"));
        assert_eq!(store.get(keys::ACCESS_TOKEN).unwrap(), None);
    }
}
