//! Error types for the local stores and the remote client.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the local persistence layer.
///
/// Structured-store failures are normally swallowed by the facade and
/// retried on the flat store; callers only see one when both backends fail.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid import data: {0}")]
    InvalidImport(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from the remote collection endpoint.
///
/// "Remote refused" and "remote unreachable" are not distinguished by the
/// sync layer; both downgrade to the local path.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    Status(StatusCode),

    #[error("Malformed response: {0}")]
    Malformed(String),

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_includes_path() {
        let err = StoreError::io(
            "/tmp/flat/opsdriver_users.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("opsdriver_users.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_remote_status_display() {
        let err = RemoteError::Status(StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Server returned status 502 Bad Gateway");
    }
}
