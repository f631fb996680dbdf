//! Best-effort synchronization with the remote collection endpoint.
//!
//! The remote side is optional: with no remote base configured every call
//! goes straight to the local store and no network traffic happens.

pub mod client;
pub mod protocol;
pub mod synced_store;

pub use client::RemoteClient;
pub use protocol::{OkResponse, OpRequest, RemoteOp};
pub use synced_store::{AddOutcome, PushReport, SyncedStore};
