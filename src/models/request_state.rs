use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a vehicle request.
///
/// Only `Pending -> Approved` and `Pending -> Rejected` are modelled; other
/// transitions are not blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestState {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Pending => "Pending",
            RequestState::Approved => "Approved",
            RequestState::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RequestState::Pending),
            "approved" => Ok(RequestState::Approved),
            "rejected" => Ok(RequestState::Rejected),
            _ => Err(format!(
                "Invalid request state '{}'. Valid options: pending, approved, rejected",
                s
            )),
        }
    }
}

impl From<RequestState> for serde_json::Value {
    fn from(state: RequestState) -> Self {
        serde_json::Value::String(state.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_state_display() {
        assert_eq!(RequestState::Pending.to_string(), "Pending");
        assert_eq!(RequestState::Approved.to_string(), "Approved");
        assert_eq!(RequestState::Rejected.to_string(), "Rejected");
    }

    #[test]
    fn test_request_state_from_str() {
        assert_eq!(
            RequestState::from_str("approved").unwrap(),
            RequestState::Approved
        );
        assert_eq!(
            RequestState::from_str("REJECTED").unwrap(),
            RequestState::Rejected
        );
        assert!(RequestState::from_str("cancelled").is_err());
    }

    #[test]
    fn test_request_state_json() {
        let json = serde_json::to_string(&RequestState::Pending).unwrap();
        assert_eq!(json, "\"Pending\"");
        let value: serde_json::Value = RequestState::Rejected.into();
        assert_eq!(value, serde_json::json!("Rejected"));
    }
}
