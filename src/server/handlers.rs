use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::AppState;
use crate::models::{now_timestamp, Collection, Record};
use crate::sync::{OkResponse, OpRequest, RemoteOp};

/// Error body: `{ "error": "...", "message": "..." }`
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<super::ServerStorageError> for ApiError {
    fn from(e: super::ServerStorageError) -> Self {
        tracing::error!("Storage error: {}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", e.to_string())
    }
}

fn parse_collection(name: &str) -> Result<Collection, ApiError> {
    name.parse()
        .map_err(|e: String| ApiError::new(StatusCode::NOT_FOUND, "unknown_collection", e))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn list_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let collection = parse_collection(&name)?;
    Ok(Json(state.storage.load(collection)?))
}

pub async fn mutate_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<OpRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let collection = parse_collection(&name)?;
    let Json(request) = body.map_err(|rejection| {
        ApiError::new(StatusCode::BAD_REQUEST, "invalid_op", rejection.body_text())
    })?;
    let op = RemoteOp::try_from(request)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, "invalid_op", e))?;

    let op_name = op.name();
    // Replace does not read the stored blob.
    let changed = match op {
        RemoteOp::Replace { items } => Some(items),
        op => {
            let mut records = state.storage.load(collection)?;
            apply_op(&mut records, op, &now_timestamp()).then_some(records)
        }
    };
    if let Some(records) = changed {
        state.storage.save(collection, &records)?;
    }

    tracing::info!(collection = %collection, op = op_name, "applied remote op");
    Ok(Json(OkResponse { ok: true }))
}

/// Applies `op` to a collection in memory. Returns whether anything changed.
///
/// - `add` assigns `max(existing ids) + 1` and stamps `createdAt`
/// - `update` merges into the matching record and stamps `updatedAt`
/// - `delete` removes the matching record
/// - `replace` swaps in the given items
///
/// `update` and `delete` on an unknown id are no-ops.
pub fn apply_op(records: &mut Vec<Record>, op: RemoteOp, now: &str) -> bool {
    match op {
        RemoteOp::Add { mut payload } => {
            let id = records.iter().filter_map(Record::id).max().unwrap_or(0) + 1;
            payload.set_id(id);
            payload.ensure_created_at(now);
            records.push(payload);
            true
        }
        RemoteOp::Update { id, payload } => {
            match records.iter_mut().find(|r| r.id() == Some(id)) {
                Some(record) => {
                    record.merge(&payload);
                    record.stamp_updated_at(now);
                    true
                }
                None => false,
            }
        }
        RemoteOp::Delete { id } => {
            let before = records.len();
            records.retain(|r| r.id() != Some(id));
            records.len() != before
        }
        RemoteOp::Replace { items } => {
            *records = items;
            true
        }
    }
}
