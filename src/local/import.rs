use serde_json::Value;

use crate::error::StoreError;
use crate::models::{Collection, Record, Snapshot};

/// Input accepted by [`LocalStore::import_all`](super::LocalStore::import_all):
/// either the serialized export document or an already-parsed snapshot.
#[derive(Debug, Clone)]
pub enum ImportData {
    Serialized(String),
    Parsed(Snapshot),
}

impl From<String> for ImportData {
    fn from(raw: String) -> Self {
        ImportData::Serialized(raw)
    }
}

impl From<&str> for ImportData {
    fn from(raw: &str) -> Self {
        ImportData::Serialized(raw.to_string())
    }
}

impl From<Snapshot> for ImportData {
    fn from(snapshot: Snapshot) -> Self {
        ImportData::Parsed(snapshot)
    }
}

impl ImportData {
    /// Validates the input and returns one record list per collection.
    ///
    /// Collections missing from the input (or `null`) import as empty;
    /// unknown keys are ignored.
    pub fn into_snapshot(self) -> Result<Snapshot, StoreError> {
        match self {
            ImportData::Parsed(mut snapshot) => {
                for collection in Collection::ALL {
                    snapshot.entry(collection).or_default();
                }
                Ok(snapshot)
            }
            ImportData::Serialized(raw) => parse_serialized(&raw),
        }
    }
}

fn parse_serialized(raw: &str) -> Result<Snapshot, StoreError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| StoreError::InvalidImport(format!("not valid JSON: {}", e)))?;

    let Value::Object(mut document) = value else {
        return Err(StoreError::InvalidImport(
            "expected an object keyed by collection name".to_string(),
        ));
    };

    let mut snapshot = Snapshot::new();
    for collection in Collection::ALL {
        let records = match document.remove(collection.name()) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    Record::try_from(item).map_err(|e| {
                        StoreError::InvalidImport(format!("{}[{}]: {}", collection, i, e))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(StoreError::InvalidImport(format!(
                    "'{}' must be an array",
                    collection
                )))
            }
        };
        snapshot.insert(collection, records);
    }

    Ok(snapshot)
}
