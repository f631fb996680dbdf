//! HTTP client for the remote collection endpoint.

use serde_json::Value;

use super::protocol::RemoteOp;
use crate::error::RemoteError;
use crate::models::{Collection, Record};

/// Client bound to one remote base, e.g. `https://ops.example.com/api`.
///
/// No timeout is configured beyond what the transport applies.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    base: String,
    http: reqwest::Client,
}

impl RemoteClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            base,
            http: reqwest::Client::new(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `<base>/<collection>`
    pub fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.base, collection.name())
    }

    /// Fetches the remote copy of a collection.
    ///
    /// Anything other than a success status with a JSON array of objects is
    /// an error.
    pub async fn fetch(&self, collection: Collection) -> Result<Vec<Record>, RemoteError> {
        let response = self.http.get(self.collection_url(collection)).send().await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }

        let body: Value = response.json().await?;
        let Value::Array(items) = body else {
            return Err(RemoteError::Malformed(format!(
                "expected an array of {}, got {}",
                collection,
                type_name(&body)
            )));
        };

        items
            .into_iter()
            .map(Record::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RemoteError::Malformed)
    }

    /// Sends one mutation. Only the status code is checked.
    pub async fn send(&self, collection: Collection, op: &RemoteOp) -> Result<(), RemoteError> {
        let response = self
            .http
            .post(self.collection_url(collection))
            .json(op)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }

        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url() {
        let client = RemoteClient::new("http://localhost:8080/api");
        assert_eq!(
            client.collection_url(Collection::Requests),
            "http://localhost:8080/api/requests"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = RemoteClient::new("https://ops.example.com/api//");
        assert_eq!(client.base(), "https://ops.example.com/api");
        assert_eq!(
            client.collection_url(Collection::Users),
            "https://ops.example.com/api/users"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        let client = RemoteClient::new("http://127.0.0.1:1");
        let result = client.fetch(Collection::Users).await;
        assert!(matches!(result, Err(RemoteError::Http(_))));
    }
}
