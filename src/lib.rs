//! Ops Driver persistence layer.
//!
//! Stores users, vehicles, requests and movements locally and optionally
//! mirrors reads and writes to a remote collection endpoint.
//!
//! Layers, from the outside in:
//! - [`api::OpsApi`]: collection-specific operations (ticket numbers, approvals, filters)
//! - [`sync::SyncedStore`]: remote-first reads and writes with local fallback
//! - [`local::LocalStore`]: structured store with a per-call flat-store fallback
//! - [`db::StructuredStore`] and [`local::FlatStore`]: the two backends

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod local;
pub mod models;
pub mod server;
pub mod sync;

pub use api::OpsApi;
pub use error::{RemoteError, StoreError};
pub use local::{FlatStore, LocalStore, RecordStore};
pub use models::{Collection, Record, RequestState, Snapshot};
pub use sync::{AddOutcome, SyncedStore};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
