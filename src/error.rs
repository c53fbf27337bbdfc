// src/error.rs
// Standardized error types for opsrelay

use crate::credentials::Service;
use thiserror::Error;

/// Main error type for the opsrelay library
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("no session id available on this connection")]
    SessionUnavailable,

    #[error("credential entry for {0} was declined")]
    CredentialDeclined(Service),

    #[error("no credential available for {0}")]
    CredentialMissing(Service),

    #[error("remote request failed with status {status}: {body}")]
    RemoteRequestFailed { status: u16, body: String },

    #[error("`{command}` failed: {message}")]
    LocalCommandFailed {
        command: String,
        code: Option<i32>,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Result using RelayError
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_unavailable_display() {
        let err = RelayError::SessionUnavailable;
        assert!(err.to_string().contains("no session id"));
    }

    #[test]
    fn test_credential_declined_names_service() {
        let err = RelayError::CredentialDeclined(Service::GitHub);
        assert!(err.to_string().contains("github"));
        assert!(err.to_string().contains("declined"));
    }

    #[test]
    fn test_credential_missing_names_service() {
        let err = RelayError::CredentialMissing(Service::Slack);
        assert!(err.to_string().contains("slack"));
    }

    #[test]
    fn test_remote_request_failed_carries_status_and_body() {
        let err = RelayError::RemoteRequestFailed {
            status: 500,
            body: "internal server error".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("500"));
        assert!(rendered.contains("internal server error"));
    }

    #[test]
    fn test_local_command_failed_carries_command() {
        let err = RelayError::LocalCommandFailed {
            command: "git commit -m msg".to_string(),
            code: Some(1),
            message: "nothing to commit".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("git commit"));
        assert!(rendered.contains("nothing to commit"));
    }

    #[test]
    fn test_config_error_display() {
        let err = RelayError::Config("REDMINE_URL must be set".to_string());
        assert!(err.to_string().contains("configuration error"));
        assert!(err.to_string().contains("REDMINE_URL"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: RelayError = json_err.into();
        assert!(matches!(err, RelayError::Json(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "git not found");
        let err: RelayError = io_err.into();
        assert!(matches!(err, RelayError::Io(_)));
    }
}
