//! Local persistence facade.
//!
//! Every call tries the structured store first and retries the same
//! operation on the flat store if it fails for any reason. The choice is
//! made per call: a structured-store failure does not disable it for later
//! calls.

use std::sync::Arc;

use futures::future::try_join_all;

use super::{FlatStore, ImportData, RecordStore};
use crate::config::Config;
use crate::db::StructuredStore;
use crate::error::StoreError;
use crate::models::{Collection, Record, Snapshot};

/// Runs `$call` against the structured store, then against the flat store
/// if there is no structured store or the first attempt failed.
macro_rules! with_fallback {
    ($self:ident, $op:literal, $collection:expr, |$store:ident| $call:expr) => {{
        if let Some($store) = $self.structured.as_deref() {
            match $call.await {
                Ok(value) => return Ok(value),
                Err(e) => tracing::warn!(
                    collection = %$collection,
                    op = $op,
                    error = %e,
                    "structured store failed, falling back to flat store"
                ),
            }
        }
        let $store = &$self.flat;
        $call.await
    }};
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    structured: Option<Arc<StructuredStore>>,
    flat: FlatStore,
}

impl LocalStore {
    pub fn new(structured: Arc<StructuredStore>, flat: FlatStore) -> Self {
        Self {
            structured: Some(structured),
            flat,
        }
    }

    /// A store with no structured backend; every call goes to `flat`.
    pub fn flat_only(flat: FlatStore) -> Self {
        Self {
            structured: None,
            flat,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let flat = FlatStore::in_dir(config.flat_store_dir.value.clone());
        if config.structured_store.value {
            Self::new(
                Arc::new(StructuredStore::new(config.database_path.value.clone())),
                flat,
            )
        } else {
            Self::flat_only(flat)
        }
    }

    pub fn structured(&self) -> Option<&StructuredStore> {
        self.structured.as_deref()
    }

    pub fn flat(&self) -> &FlatStore {
        &self.flat
    }

    /// Every collection's records, read concurrently.
    pub async fn export_all(&self) -> Result<Snapshot, StoreError> {
        let lists = try_join_all(Collection::ALL.iter().map(|c| self.get_all(*c))).await?;
        Ok(Collection::ALL.into_iter().zip(lists).collect())
    }

    /// Replaces the contents of every collection with `data`.
    ///
    /// The input is validated up front, then all four collections are
    /// cleared, then every record is written one at a time, keeping any ids
    /// it carries. This is not atomic: a storage failure partway through
    /// leaves some collections cleared and others partly repopulated, with
    /// no rollback.
    ///
    /// Returns the number of records written.
    pub async fn import_all(&self, data: impl Into<ImportData>) -> Result<usize, StoreError> {
        let mut snapshot = data.into().into_snapshot()?;

        for collection in Collection::ALL {
            self.clear(collection).await?;
        }

        let mut imported = 0;
        for collection in Collection::ALL {
            for record in snapshot.remove(&collection).unwrap_or_default() {
                self.put(collection, record).await?;
                imported += 1;
            }
        }

        tracing::info!(records = imported, "import complete");
        Ok(imported)
    }
}

impl RecordStore for LocalStore {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Record>, StoreError> {
        with_fallback!(self, "get_all", collection, |store| store.get_all(collection))
    }

    async fn put(&self, collection: Collection, record: Record) -> Result<i64, StoreError> {
        with_fallback!(self, "put", collection, |store| store.put(collection, record.clone()))
    }

    async fn delete(&self, collection: Collection, id: i64) -> Result<bool, StoreError> {
        with_fallback!(self, "delete", collection, |store| store.delete(collection, id))
    }

    async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        with_fallback!(self, "clear", collection, |store| store.clear(collection))
    }

    async fn update(
        &self,
        collection: Collection,
        id: i64,
        patch: &Record,
    ) -> Result<bool, StoreError> {
        with_fallback!(self, "update", collection, |store| store.update(collection, id, patch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn structured_store() -> (LocalStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(
            Arc::new(StructuredStore::new(temp.path().join("opsdriver.db"))),
            FlatStore::in_dir(temp.path().join("flat")),
        );
        (store, temp)
    }

    /// Structured store whose database path cannot be created.
    fn broken_structured_store() -> (LocalStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "file in the way").unwrap();
        let store = LocalStore::new(
            Arc::new(StructuredStore::new(blocker.join("opsdriver.db"))),
            FlatStore::in_dir(temp.path().join("flat")),
        );
        (store, temp)
    }

    #[tokio::test]
    async fn test_uses_structured_store_when_available() {
        let (store, temp) = structured_store();

        store
            .put(Collection::Users, Record::new().with("role", "driver"))
            .await
            .unwrap();

        assert!(store.structured().unwrap().is_open());
        assert!(!temp.path().join("flat").join("opsdriver_users.json").exists());
        assert!(store
            .flat()
            .get_all(Collection::Users)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(store.get_all(Collection::Users).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_flat_store() {
        let (store, temp) = broken_structured_store();

        let id = store
            .put(Collection::Vehicles, Record::new().with("plate", "QWE-987"))
            .await
            .unwrap();

        assert_eq!(id, 1);
        assert!(temp
            .path()
            .join("flat")
            .join("opsdriver_vehicles.json")
            .exists());

        let all = store.get_all(Collection::Vehicles).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].get_str("plate"), Some("QWE-987"));

        assert!(store
            .update(
                Collection::Vehicles,
                id,
                &Record::new().with("type", "truck")
            )
            .await
            .unwrap());
        assert!(store.delete(Collection::Vehicles, id).await.unwrap());
        assert!(!store.delete(Collection::Vehicles, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_fallback_is_not_sticky() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("data");
        std::fs::write(&blocker, "file in the way").unwrap();
        let store = LocalStore::new(
            Arc::new(StructuredStore::new(blocker.join("opsdriver.db"))),
            FlatStore::in_dir(temp.path().join("flat")),
        );

        store
            .put(Collection::Users, Record::new().with("name", "offline"))
            .await
            .unwrap();
        assert!(!store.structured().unwrap().is_open());

        // The obstacle goes away; the next call uses the structured store.
        std::fs::remove_file(&blocker).unwrap();
        store
            .put(Collection::Users, Record::new().with("name", "online"))
            .await
            .unwrap();

        assert!(store.structured().unwrap().is_open());
        let structured = store
            .structured()
            .unwrap()
            .get_all(Collection::Users)
            .await
            .unwrap();
        assert_eq!(structured.len(), 1);
        assert_eq!(structured[0].get_str("name"), Some("online"));
    }

    #[tokio::test]
    async fn test_unique_violation_falls_through_to_flat() {
        let (store, _temp) = structured_store();

        let request = Record::new().with("ticketNumber", "55555-2026");
        store
            .put(Collection::Requests, request.clone())
            .await
            .unwrap();
        store.put(Collection::Requests, request).await.unwrap();

        let flat = store.flat().get_all(Collection::Requests).await.unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].get_str("ticketNumber"), Some("55555-2026"));
    }

    #[tokio::test]
    async fn test_flat_only_store() {
        let store = LocalStore::flat_only(FlatStore::in_memory());
        assert!(store.structured().is_none());

        store
            .put(Collection::Movements, Record::new().with("kind", "gate-out"))
            .await
            .unwrap();
        assert_eq!(store.get_all(Collection::Movements).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_on_missing_id_leaves_collection_unchanged() {
        let (store, _temp) = structured_store();
        store
            .put(Collection::Users, Record::new().with("role", "driver"))
            .await
            .unwrap();
        let before = store.get_all(Collection::Users).await.unwrap();

        let patch = Record::new().with("role", "admin");
        assert!(!store.update(Collection::Users, 404, &patch).await.unwrap());
        assert!(!store.delete(Collection::Users, 404).await.unwrap());

        assert_eq!(store.get_all(Collection::Users).await.unwrap(), before);
    }

    async fn seed(store: &LocalStore) {
        store
            .put(
                Collection::Users,
                Record::new().with("role", "admin").with("name", "Ana"),
            )
            .await
            .unwrap();
        store
            .put(Collection::Vehicles, Record::new().with("plate", "AAA-1"))
            .await
            .unwrap();
        store
            .put(
                Collection::Requests,
                Record::new()
                    .with("state", "Pending")
                    .with("ticketNumber", "20000-2026"),
            )
            .await
            .unwrap();
        store
            .put(Collection::Movements, Record::new().with("kind", "odometer"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_export_clear_import_restores_everything() {
        let (store, _temp) = structured_store();
        seed(&store).await;

        let exported = store.export_all().await.unwrap();
        assert_eq!(exported.len(), 4);

        for collection in Collection::ALL {
            store.clear(collection).await.unwrap();
        }
        assert!(store.get_all(Collection::Users).await.unwrap().is_empty());

        let imported = store.import_all(exported.clone()).await.unwrap();
        assert_eq!(imported, 4);
        assert_eq!(store.export_all().await.unwrap(), exported);
    }

    #[tokio::test]
    async fn test_import_serialized_export() {
        let (source, _source_temp) = structured_store();
        seed(&source).await;
        let json = serde_json::to_string(&source.export_all().await.unwrap()).unwrap();

        let (target, _target_temp) = structured_store();
        target
            .put(Collection::Vehicles, Record::new().with("plate", "OLD-0"))
            .await
            .unwrap();

        target.import_all(json).await.unwrap();

        assert_eq!(
            target.export_all().await.unwrap(),
            source.export_all().await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_invalid_import_leaves_store_untouched() {
        let (store, _temp) = structured_store();
        seed(&store).await;
        let before = store.export_all().await.unwrap();

        let result = store.import_all(r#"{"users": "nope"}"#).await;

        assert!(matches!(result, Err(StoreError::InvalidImport(_))));
        assert_eq!(store.export_all().await.unwrap(), before);
    }
}
