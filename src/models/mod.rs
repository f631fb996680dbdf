mod collection;
mod record;
mod request_state;

pub use collection::{Collection, Index};
pub use record::{fields, now_timestamp, Record};
pub use request_state::RequestState;

use std::collections::BTreeMap;

/// Full contents of the local store, keyed by collection.
///
/// Serialized as a JSON object such as `{"users": [...], "vehicles": [...]}`.
pub type Snapshot = BTreeMap<Collection, Vec<Record>>;
