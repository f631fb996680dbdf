use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field names shared by every backend and the remote endpoint.
pub mod fields {
    pub const ID: &str = "id";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const ROLE: &str = "role";
    pub const STATE: &str = "state";
    pub const TICKET_NUMBER: &str = "ticketNumber";
    pub const OBSERVATION: &str = "observation";
    pub const KIND: &str = "kind";
}

/// Current time as an RFC 3339 UTC string with millisecond precision.
///
/// Fixed width, so lexical order matches chronological order.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A stored record: a JSON object with a few well-known fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Store-assigned identifier. Non-integer values count as absent.
    pub fn id(&self) -> Option<i64> {
        self.0.get(fields::ID).and_then(Value::as_i64)
    }

    pub fn set_id(&mut self, id: i64) {
        self.0.insert(fields::ID.to_string(), Value::from(id));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn created_at(&self) -> Option<&str> {
        self.get_str(fields::CREATED_AT)
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.get_str(fields::UPDATED_AT)
    }

    /// Sets `createdAt` unless the record already carries one.
    pub fn ensure_created_at(&mut self, now: &str) {
        let missing = matches!(self.0.get(fields::CREATED_AT), None | Some(Value::Null));
        if missing {
            self.0
                .insert(fields::CREATED_AT.to_string(), Value::from(now));
        }
    }

    pub fn stamp_updated_at(&mut self, now: &str) {
        self.0
            .insert(fields::UPDATED_AT.to_string(), Value::from(now));
    }

    /// Shallow-merges `patch` into this record.
    ///
    /// `id` and `createdAt` in the patch are ignored.
    pub fn merge(&mut self, patch: &Record) {
        for (key, value) in &patch.0 {
            if key == fields::ID || key == fields::CREATED_AT {
                continue;
            }
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Value of `field` as an index key: strings as-is, numbers in decimal.
    pub fn index_key(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// True if the indexed value of `field` equals `expected`.
    pub fn matches(&self, field: &str, expected: &str) -> bool {
        self.index_key(field).as_deref() == Some(expected)
    }

    /// The record body without its identifier.
    pub fn body(&self) -> Map<String, Value> {
        let mut map = self.0.clone();
        map.remove(fields::ID);
        map
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(format!("expected a JSON object, got {}", other)),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => writeln!(f, "#{}", id)?,
            None => writeln!(f, "(unsaved)")?,
        }
        for (key, value) in &self.0 {
            if key == fields::ID {
                continue;
            }
            match value {
                Value::String(s) => writeln!(f, "  {}: {}", key, s)?,
                other => writeln!(f, "  {}: {}", key, other)?,
            }
        }
        Ok(())
    }
}
