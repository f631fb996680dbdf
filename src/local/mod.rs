//! Local persistence: the storage contract, the flat fallback backend and
//! the facade that picks a backend per call.

#![allow(async_fn_in_trait)]

mod flat_store;
mod import;
mod key_value;
mod store;

pub use flat_store::{FlatStore, KEY_PREFIX};
pub use import::ImportData;
pub use key_value::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use store::LocalStore;

use crate::error::StoreError;
use crate::models::{now_timestamp, Collection, Record};

/// Storage contract shared by the structured store, the flat store and the
/// facade over both.
///
/// Every call is scoped to one collection; there are no cross-collection
/// transactions.
pub trait RecordStore {
    /// Every record in the collection, in id order.
    async fn get_all(&self, collection: Collection) -> Result<Vec<Record>, StoreError>;

    /// Inserts or overwrites by id, stamping `createdAt` if absent.
    ///
    /// Returns the record's id, assigning a new one when it has none.
    async fn put(&self, collection: Collection, record: Record) -> Result<i64, StoreError>;

    /// Removes one record. Returns `false` if no record had that id.
    async fn delete(&self, collection: Collection, id: i64) -> Result<bool, StoreError>;

    async fn clear(&self, collection: Collection) -> Result<(), StoreError>;

    /// Merges `patch` into the record with `id` and stamps `updatedAt`.
    ///
    /// Read-modify-write over [`get_all`](Self::get_all) and
    /// [`put`](Self::put); concurrent updates to the same record race and
    /// the last write wins. Returns `false` if no record had that id.
    async fn update(
        &self,
        collection: Collection,
        id: i64,
        patch: &Record,
    ) -> Result<bool, StoreError> {
        let records = self.get_all(collection).await?;
        let Some(mut record) = records.into_iter().find(|r| r.id() == Some(id)) else {
            return Ok(false);
        };

        record.merge(patch);
        record.stamp_updated_at(&now_timestamp());
        self.put(collection, record).await?;
        Ok(true)
    }
}
