//! Blob storage for the remote collection endpoint.
//!
//! One JSON array per collection:
//! ```text
//! <DATA_DIR>/
//!   users.json
//!   vehicles.json
//!   requests.json
//!   movements.json
//! ```
//!
//! Every mutation rewrites the whole file. There is no locking and no
//! version check, so concurrent writers can overwrite each other.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;

use crate::models::{Collection, Record};

/// Errors that can occur during server storage operations.
#[derive(Debug)]
pub enum ServerStorageError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// Stored file is not a JSON array of records.
    ParseError(PathBuf, serde_json::Error),
}

impl std::fmt::Display for ServerStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerStorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            ServerStorageError::ParseError(path, e) => {
                write!(f, "Failed to parse collection {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ServerStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerStorageError::IoError(_, e) => Some(e),
            ServerStorageError::ParseError(_, e) => Some(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectionStorage {
    data_dir: PathBuf,
}

impl CollectionStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the full path for a collection's blob.
    pub fn path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection.name()))
    }

    /// Loads a collection. A missing blob is an empty collection.
    pub fn load(&self, collection: Collection) -> Result<Vec<Record>, ServerStorageError> {
        let path = self.path(collection);

        match fs::read_to_string(&path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| ServerStorageError::ParseError(path, e))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(ServerStorageError::IoError(path, e)),
        }
    }

    /// Overwrites a collection's blob.
    pub fn save(
        &self,
        collection: Collection,
        records: &[Record],
    ) -> Result<(), ServerStorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| ServerStorageError::IoError(self.data_dir.clone(), e))?;

        let path = self.path(collection);
        let bytes = serde_json::to_vec(records)
            .map_err(|e| ServerStorageError::ParseError(path.clone(), e))?;

        // Unique temp file per write, then rename over the blob
        let mut file = NamedTempFile::new_in(&self.data_dir)
            .map_err(|e| ServerStorageError::IoError(self.data_dir.clone(), e))?;

        file.write_all(&bytes)
            .map_err(|e| ServerStorageError::IoError(file.path().to_path_buf(), e))?;

        file.as_file()
            .sync_all()
            .map_err(|e| ServerStorageError::IoError(file.path().to_path_buf(), e))?;

        file.persist(&path)
            .map_err(|e| ServerStorageError::IoError(path, e.error))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (CollectionStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = CollectionStorage::new(temp_dir.path());
        (storage, temp_dir)
    }

    #[test]
    fn test_path_per_collection() {
        let (storage, _temp) = setup();
        assert!(storage.path(Collection::Users).ends_with("users.json"));
        assert!(storage
            .path(Collection::Movements)
            .ends_with("movements.json"));
    }

    #[test]
    fn test_load_nonexistent_is_empty() {
        let (storage, _temp) = setup();
        assert!(storage.load(Collection::Requests).unwrap().is_empty());
    }

    #[test]
    fn test_save_overwrites_whole_collection() {
        let (storage, temp) = setup();

        let first = vec![
            Record::new().with("id", 1).with("plate", "A"),
            Record::new().with("id", 2).with("plate", "B"),
        ];
        storage.save(Collection::Vehicles, &first).unwrap();

        let second = vec![Record::new().with("id", 3).with("plate", "C")];
        storage.save(Collection::Vehicles, &second).unwrap();

        assert_eq!(storage.load(Collection::Vehicles).unwrap(), second);
        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("vehicles.json")]);
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let (storage, _temp) = setup();
        fs::write(storage.path(Collection::Users), "{broken").unwrap();

        let err = storage.load(Collection::Users).unwrap_err();
        assert!(matches!(err, ServerStorageError::ParseError(_, _)));
    }
}
