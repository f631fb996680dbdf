//! Remote collection endpoint.
//!
//! Keeps one JSON blob per collection and exposes it over HTTP:
//!
//! - `GET /health`: health check
//! - `GET /api/{collection}`: the collection as a JSON array
//! - `POST /api/{collection}`: apply one `add|update|delete|replace` op

pub mod handlers;
pub mod storage;

pub use storage::{CollectionStorage, ServerStorageError};

use axum::{routing::get, Router};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<CollectionStorage>,
}

/// Builds the endpoint router over `storage`.
pub fn router(storage: CollectionStorage) -> Router {
    let state = AppState {
        storage: Arc::new(storage),
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/{collection}",
            get(handlers::list_collection).post(handlers::mutate_collection),
        )
        .with_state(state)
}
