//! Collection-specific operations on top of [`SyncedStore`].
//!
//! Filters are applied client-side after fetching the full collection,
//! whichever backend served the read.

mod ticket;

pub use ticket::{generate_ticket_number, is_ticket_number};

use crate::config::Config;
use crate::error::StoreError;
use crate::local::ImportData;
use crate::models::{fields, now_timestamp, Collection, Record, RequestState, Snapshot};
use crate::sync::{AddOutcome, SyncedStore};

#[derive(Debug, Clone)]
pub struct OpsApi {
    store: SyncedStore,
}

impl OpsApi {
    pub fn new(store: SyncedStore) -> Self {
        Self { store }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(SyncedStore::from_config(config))
    }

    pub fn store(&self) -> &SyncedStore {
        &self.store
    }

    /// Lists a collection, keeping only records whose filter field equals
    /// `filter`. Collections without a filter field ignore it.
    pub async fn list(
        &self,
        collection: Collection,
        filter: Option<&str>,
    ) -> Result<Vec<Record>, StoreError> {
        let records = self.store.list(collection).await?;

        match (collection.filter_field(), filter) {
            (Some(field), Some(value)) => Ok(records
                .into_iter()
                .filter(|r| r.matches(field, value))
                .collect()),
            _ => Ok(records),
        }
    }

    /// Looks a record up by id with a scan over [`OpsApi::list`].
    pub async fn find(&self, collection: Collection, id: i64) -> Result<Option<Record>, StoreError> {
        let records = self.store.list(collection).await?;
        Ok(records.into_iter().find(|r| r.id() == Some(id)))
    }

    pub async fn add(&self, collection: Collection, record: Record) -> Result<AddOutcome, StoreError> {
        self.store.add(collection, record).await
    }

    pub async fn update(
        &self,
        collection: Collection,
        id: i64,
        patch: &Record,
    ) -> Result<bool, StoreError> {
        self.store.update(collection, id, patch).await
    }

    pub async fn delete(&self, collection: Collection, id: i64) -> Result<bool, StoreError> {
        self.store.delete(collection, id).await
    }

    // Users

    pub async fn list_users(&self, role: Option<&str>) -> Result<Vec<Record>, StoreError> {
        self.list(Collection::Users, role).await
    }

    pub async fn add_user(&self, user: Record) -> Result<AddOutcome, StoreError> {
        self.add(Collection::Users, user).await
    }

    pub async fn update_user(&self, id: i64, patch: &Record) -> Result<bool, StoreError> {
        self.update(Collection::Users, id, patch).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        self.delete(Collection::Users, id).await
    }

    // Vehicles

    pub async fn list_vehicles(&self) -> Result<Vec<Record>, StoreError> {
        self.list(Collection::Vehicles, None).await
    }

    pub async fn add_vehicle(&self, vehicle: Record) -> Result<AddOutcome, StoreError> {
        self.add(Collection::Vehicles, vehicle).await
    }

    pub async fn update_vehicle(&self, id: i64, patch: &Record) -> Result<bool, StoreError> {
        self.update(Collection::Vehicles, id, patch).await
    }

    pub async fn delete_vehicle(&self, id: i64) -> Result<bool, StoreError> {
        self.delete(Collection::Vehicles, id).await
    }

    // Requests

    pub async fn list_requests(
        &self,
        state: Option<RequestState>,
    ) -> Result<Vec<Record>, StoreError> {
        self.list(Collection::Requests, state.as_ref().map(RequestState::as_str))
            .await
    }

    pub async fn get_request(&self, id: i64) -> Result<Option<Record>, StoreError> {
        self.find(Collection::Requests, id).await
    }

    /// Creates a request from `details`.
    ///
    /// `state` is always `Pending` and `ticketNumber` is always freshly
    /// generated, whatever the caller passed. The returned record carries
    /// the id only when the write landed in the local store.
    pub async fn create_request(&self, details: Record) -> Result<Record, StoreError> {
        let mut request = details
            .with(fields::STATE, RequestState::Pending)
            .with(fields::TICKET_NUMBER, generate_ticket_number());
        request.ensure_created_at(&now_timestamp());

        let outcome = self.add(Collection::Requests, request.clone()).await?;
        if let Some(id) = outcome.local_id() {
            request.set_id(id);
        }

        tracing::info!(
            ticket = request.get_str(fields::TICKET_NUMBER).unwrap_or_default(),
            "request created"
        );
        Ok(request)
    }

    pub async fn approve_request(&self, id: i64) -> Result<bool, StoreError> {
        let patch = Record::new().with(fields::STATE, RequestState::Approved);
        self.update(Collection::Requests, id, &patch).await
    }

    pub async fn reject_request(&self, id: i64, note: &str) -> Result<bool, StoreError> {
        let patch = Record::new()
            .with(fields::STATE, RequestState::Rejected)
            .with(fields::OBSERVATION, note);
        self.update(Collection::Requests, id, &patch).await
    }

    pub async fn delete_request(&self, id: i64) -> Result<bool, StoreError> {
        self.delete(Collection::Requests, id).await
    }

    // Movements

    pub async fn list_movements(&self, kind: Option<&str>) -> Result<Vec<Record>, StoreError> {
        self.list(Collection::Movements, kind).await
    }

    pub async fn add_movement(&self, movement: Record) -> Result<AddOutcome, StoreError> {
        self.add(Collection::Movements, movement).await
    }

    pub async fn delete_movement(&self, id: i64) -> Result<bool, StoreError> {
        self.delete(Collection::Movements, id).await
    }

    // Backup

    /// Snapshot of the local store. Remote data is not included.
    pub async fn export_all(&self) -> Result<Snapshot, StoreError> {
        self.store.local().export_all().await
    }

    /// Replaces the local store's contents. See [`crate::LocalStore::import_all`].
    pub async fn import_all(&self, data: impl Into<ImportData>) -> Result<usize, StoreError> {
        self.store.local().import_all(data).await
    }
}
