//! Remote-first reads and writes with local fallback.
//!
//! Reads: a well-formed remote array is returned as-is and the local store is
//! neither consulted nor updated. Any remote failure falls back to a local
//! read.
//!
//! Writes: the remote side is notified first. If that succeeds the call
//! returns without touching the local store, so local storage is not a
//! reliable copy of remote state after online operation. If it fails for any
//! reason the same write is applied locally.

use super::client::RemoteClient;
use super::protocol::RemoteOp;
use crate::config::Config;
use crate::error::StoreError;
use crate::local::{LocalStore, RecordStore};
use crate::models::{Collection, Record};

/// Where an added record ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The remote endpoint accepted it and assigns the id itself.
    Remote,
    /// Written to the local store under `id`.
    Local { id: i64 },
}

impl AddOutcome {
    /// The locally assigned id, if the write went to the local store.
    pub fn local_id(&self) -> Option<i64> {
        match self {
            AddOutcome::Remote => None,
            AddOutcome::Local { id } => Some(*id),
        }
    }
}

/// Result of [`SyncedStore::push_all`].
#[derive(Debug, Default)]
pub struct PushReport {
    pub replaced: Vec<(Collection, usize)>,
    pub failed: Vec<(Collection, String)>,
}

#[derive(Debug, Clone)]
pub struct SyncedStore {
    local: LocalStore,
    remote: Option<RemoteClient>,
}

impl SyncedStore {
    pub fn new(local: LocalStore, remote: Option<RemoteClient>) -> Self {
        Self { local, remote }
    }

    /// No remote attempts are ever made.
    pub fn local_only(local: LocalStore) -> Self {
        Self::new(local, None)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            LocalStore::from_config(config),
            config.remote_base().map(RemoteClient::new),
        )
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    pub fn remote(&self) -> Option<&RemoteClient> {
        self.remote.as_ref()
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn list(&self, collection: Collection) -> Result<Vec<Record>, StoreError> {
        if let Some(remote) = &self.remote {
            match remote.fetch(collection).await {
                Ok(records) => {
                    tracing::debug!(collection = %collection, count = records.len(), "remote read");
                    return Ok(records);
                }
                Err(e) => tracing::warn!(
                    collection = %collection,
                    error = %e,
                    "remote read failed, reading local store"
                ),
            }
        }

        self.local.get_all(collection).await
    }

    pub async fn add(&self, collection: Collection, record: Record) -> Result<AddOutcome, StoreError> {
        let op = RemoteOp::Add {
            payload: record.clone(),
        };
        if self.try_remote(collection, &op).await {
            return Ok(AddOutcome::Remote);
        }

        let id = self.local.put(collection, record).await?;
        Ok(AddOutcome::Local { id })
    }

    /// Returns `true` if the remote accepted the update or the local record
    /// existed, `false` if it fell back locally and no record had that id.
    pub async fn update(
        &self,
        collection: Collection,
        id: i64,
        patch: &Record,
    ) -> Result<bool, StoreError> {
        let op = RemoteOp::Update {
            id,
            payload: patch.clone(),
        };
        if self.try_remote(collection, &op).await {
            return Ok(true);
        }

        self.local.update(collection, id, patch).await
    }

    pub async fn delete(&self, collection: Collection, id: i64) -> Result<bool, StoreError> {
        if self.try_remote(collection, &RemoteOp::Delete { id }).await {
            return Ok(true);
        }

        self.local.delete(collection, id).await
    }

    /// Overwrites every remote collection with the local copy.
    ///
    /// Unlike the other writes this does not fall back: it needs a remote
    /// base and reports per-collection failures.
    pub async fn push_all(&self) -> Result<PushReport, StoreError> {
        let Some(remote) = &self.remote else {
            return Err(StoreError::Unavailable(
                "remote sync is not configured".to_string(),
            ));
        };

        let snapshot = self.local.export_all().await?;
        let mut report = PushReport::default();

        for (collection, items) in snapshot {
            let count = items.len();
            match remote.send(collection, &RemoteOp::Replace { items }).await {
                Ok(()) => report.replaced.push((collection, count)),
                Err(e) => report.failed.push((collection, e.to_string())),
            }
        }

        Ok(report)
    }

    /// True if a remote base is configured and it accepted `op`.
    async fn try_remote(&self, collection: Collection, op: &RemoteOp) -> bool {
        let Some(remote) = &self.remote else {
            return false;
        };

        match remote.send(collection, op).await {
            Ok(()) => {
                tracing::debug!(collection = %collection, op = op.name(), "remote write accepted");
                true
            }
            Err(e) => {
                tracing::warn!(
                    collection = %collection,
                    op = op.name(),
                    error = %e,
                    "remote write failed, writing local store"
                );
                false
            }
        }
    }
}
