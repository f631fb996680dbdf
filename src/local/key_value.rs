//! String key-value storage backing the flat store.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StoreError;

/// Minimal string-to-string storage, shared process-wide with no locking
/// or versioning between writers.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// One file per key in a directory.
///
/// ```text
/// <dir>/
///   opsdriver_users.json
///   opsdriver_requests.json
/// ```
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let path = self.path(key);
        let temp_path = path.with_extension("json.tmp");

        let mut file = File::create(&temp_path).map_err(|e| StoreError::io(&temp_path, e))?;
        file.write_all(value.as_bytes())
            .map_err(|e| StoreError::io(&temp_path, e))?;
        file.sync_all().map_err(|e| StoreError::io(&temp_path, e))?;

        fs::rename(&temp_path, &path).map_err(|e| StoreError::io(&path, e))
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

/// In-process storage; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_key_is_none() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp.path());
        assert!(store.get_item("opsdriver_users").unwrap().is_none());
    }

    #[test]
    fn test_file_store_creates_directory_on_write() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("flat");
        let store = FileKeyValueStore::new(&dir);

        store.set_item("opsdriver_users", "[]").unwrap();

        assert!(dir.join("opsdriver_users.json").exists());
        assert!(!dir.join("opsdriver_users.json.tmp").exists());
        assert_eq!(
            store.get_item("opsdriver_users").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_file_store_remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp.path());

        store.set_item("k", "v").unwrap();
        store.remove_item("k").unwrap();
        store.remove_item("k").unwrap();

        assert!(store.get_item("k").unwrap().is_none());
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryKeyValueStore::new();
        store.set_item("k", "1").unwrap();
        store.set_item("k", "2").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("2"));
        store.remove_item("k").unwrap();
        assert!(store.get_item("k").unwrap().is_none());
    }
}
