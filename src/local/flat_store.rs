//! Flat fallback backend: one serialized array per collection.
//!
//! Used when the structured store is unavailable. There are no secondary
//! indexes here, so `ticketNumber` uniqueness is not enforced and filters
//! are linear scans done by the caller.

use std::sync::Arc;

use super::key_value::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use super::RecordStore;
use crate::error::StoreError;
use crate::models::{now_timestamp, Collection, Record};

/// Prefix for every flat-store key (`opsdriver_users`, ...).
pub const KEY_PREFIX: &str = "opsdriver_";

#[derive(Clone)]
pub struct FlatStore {
    kv: Arc<dyn KeyValueStore>,
}

impl FlatStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Flat store persisted as files under `dir`.
    pub fn in_dir(dir: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(FileKeyValueStore::new(dir)))
    }

    /// Flat store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKeyValueStore::new()))
    }

    pub fn key(collection: Collection) -> String {
        format!("{}{}", KEY_PREFIX, collection.name())
    }

    /// Loads the stored array. Missing or unparseable data reads as empty.
    fn load(&self, collection: Collection) -> Result<Vec<Record>, StoreError> {
        let key = Self::key(collection);
        let Some(raw) = self.kv.get_item(&key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(
                    collection = %collection,
                    error = %e,
                    "flat store data is corrupt, treating collection as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, collection: Collection, records: &[Record]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(records)?;
        self.kv.set_item(&Self::key(collection), &raw)
    }
}

impl std::fmt::Debug for FlatStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlatStore").finish_non_exhaustive()
    }
}

/// `max(existing ids) + 1`, or 1 for an empty collection.
fn next_id(records: &[Record]) -> i64 {
    records.iter().filter_map(Record::id).max().unwrap_or(0) + 1
}

impl RecordStore for FlatStore {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Record>, StoreError> {
        self.load(collection)
    }

    async fn put(&self, collection: Collection, mut record: Record) -> Result<i64, StoreError> {
        let mut records = self.load(collection)?;

        record.ensure_created_at(&now_timestamp());
        let id = match record.id() {
            Some(id) => id,
            None => next_id(&records),
        };
        record.set_id(id);

        match records.iter().position(|r| r.id() == Some(id)) {
            Some(pos) => records[pos] = record,
            None => records.push(record),
        }

        self.save(collection, &records)?;
        Ok(id)
    }

    async fn delete(&self, collection: Collection, id: i64) -> Result<bool, StoreError> {
        let mut records = self.load(collection)?;
        let before = records.len();
        records.retain(|r| r.id() != Some(id));

        if records.len() == before {
            return Ok(false);
        }

        self.save(collection, &records)?;
        Ok(true)
    }

    async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        self.kv.remove_item(&Self::key(collection))
    }
}
