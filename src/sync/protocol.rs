//! Wire format for the remote collection endpoint.
//!
//! `GET <base>/<collection>` returns a JSON array of records.
//! `POST <base>/<collection>` takes one operation:
//!
//! ```text
//! { "op": "add",     "payload": {...} }
//! { "op": "update",  "id": 3, "payload": {...} }
//! { "op": "delete",  "id": 3 }
//! { "op": "replace", "items": [...] }
//! ```
//!
//! and answers `{ "ok": true }` or an error object with a message.

use serde::{Deserialize, Serialize};

use crate::models::Record;

/// A mutation sent to the remote endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum RemoteOp {
    Add { payload: Record },
    Update { id: i64, payload: Record },
    Delete { id: i64 },
    Replace { items: Vec<Record> },
}

impl RemoteOp {
    pub fn name(&self) -> &'static str {
        match self {
            RemoteOp::Add { .. } => "add",
            RemoteOp::Update { .. } => "update",
            RemoteOp::Delete { .. } => "delete",
            RemoteOp::Replace { .. } => "replace",
        }
    }
}

/// Loose form of a POST body, as received before the op is validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpRequest {
    #[serde(default)]
    pub op: String,
    pub id: Option<i64>,
    pub payload: Option<Record>,
    pub items: Option<Vec<Record>>,
}

impl TryFrom<OpRequest> for RemoteOp {
    type Error = String;

    fn try_from(request: OpRequest) -> Result<Self, Self::Error> {
        let OpRequest {
            op,
            id,
            payload,
            items,
        } = request;
        let missing_id = || format!("'{}' requires an id", op);

        match op.as_str() {
            "add" => Ok(RemoteOp::Add {
                payload: payload.unwrap_or_default(),
            }),
            "update" => Ok(RemoteOp::Update {
                id: id.ok_or_else(missing_id)?,
                payload: payload.unwrap_or_default(),
            }),
            "delete" => Ok(RemoteOp::Delete {
                id: id.ok_or_else(missing_id)?,
            }),
            "replace" => Ok(RemoteOp::Replace {
                items: items.unwrap_or_default(),
            }),
            other => Err(format!("Unsupported op '{}'", other)),
        }
    }
}

/// Success body for a POST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_op_wire_format() {
        let op = RemoteOp::Update {
            id: 7,
            payload: Record::new().with("state", "Approved"),
        };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "update", "id": 7, "payload": {"state": "Approved"}})
        );

        let op = RemoteOp::Delete { id: 2 };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "delete", "id": 2})
        );
    }

    #[test]
    fn test_op_request_validation() {
        let request: OpRequest =
            serde_json::from_value(json!({"op": "replace", "items": [{"id": 1}]})).unwrap();
        let op = RemoteOp::try_from(request).unwrap();
        assert_eq!(op.name(), "replace");

        let request: OpRequest = serde_json::from_value(json!({"op": "delete"})).unwrap();
        assert!(RemoteOp::try_from(request)
            .unwrap_err()
            .contains("requires an id"));

        let request: OpRequest = serde_json::from_value(json!({"op": "truncate"})).unwrap();
        assert_eq!(
            RemoteOp::try_from(request).unwrap_err(),
            "Unsupported op 'truncate'"
        );
    }
}
