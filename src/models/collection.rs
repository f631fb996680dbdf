use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::fields;

/// One of the four record sets kept by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Users,
    Vehicles,
    Requests,
    Movements,
}

/// A secondary index on a record field, mirrored into its own SQL column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index {
    /// Record field the index reads.
    pub field: &'static str,
    /// Column holding the indexed value.
    pub column: &'static str,
    pub unique: bool,
}

const USER_INDEXES: &[Index] = &[Index {
    field: fields::ROLE,
    column: "role",
    unique: false,
}];

const REQUEST_INDEXES: &[Index] = &[
    Index {
        field: fields::STATE,
        column: "state",
        unique: false,
    },
    Index {
        field: fields::TICKET_NUMBER,
        column: "ticket_number",
        unique: true,
    },
];

const MOVEMENT_INDEXES: &[Index] = &[Index {
    field: fields::KIND,
    column: "kind",
    unique: false,
}];

impl Collection {
    /// Every collection, in export/import order.
    pub const ALL: [Collection; 4] = [
        Collection::Users,
        Collection::Vehicles,
        Collection::Requests,
        Collection::Movements,
    ];

    /// Wire and table name.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Vehicles => "vehicles",
            Collection::Requests => "requests",
            Collection::Movements => "movements",
        }
    }

    /// Secondary indexes besides `createdAt`, which every collection has.
    pub fn indexes(&self) -> &'static [Index] {
        match self {
            Collection::Users => USER_INDEXES,
            Collection::Vehicles => &[],
            Collection::Requests => REQUEST_INDEXES,
            Collection::Movements => MOVEMENT_INDEXES,
        }
    }

    /// Field used by the list filter for this collection, if any.
    pub fn filter_field(&self) -> Option<&'static str> {
        match self {
            Collection::Users => Some(fields::ROLE),
            Collection::Vehicles => None,
            Collection::Requests => Some(fields::STATE),
            Collection::Movements => Some(fields::KIND),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "users" => Ok(Collection::Users),
            "vehicles" => Ok(Collection::Vehicles),
            "requests" => Ok(Collection::Requests),
            "movements" => Ok(Collection::Movements),
            _ => Err(format!(
                "Invalid collection '{}'. Valid options: users, vehicles, requests, movements",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names() {
        let names: Vec<_> = Collection::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["users", "vehicles", "requests", "movements"]);
    }

    #[test]
    fn test_collection_from_str() {
        assert_eq!(Collection::from_str("users").unwrap(), Collection::Users);
        assert_eq!(
            Collection::from_str("REQUESTS").unwrap(),
            Collection::Requests
        );
        assert!(Collection::from_str("drivers").is_err());
    }

    #[test]
    fn test_only_ticket_number_is_unique() {
        let unique: Vec<_> = Collection::ALL
            .iter()
            .flat_map(|c| c.indexes())
            .filter(|i| i.unique)
            .map(|i| i.field)
            .collect();
        assert_eq!(unique, vec![fields::TICKET_NUMBER]);
    }

    #[test]
    fn test_collection_serializes_as_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Collection::Vehicles, 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"vehicles":1}"#);
    }
}
