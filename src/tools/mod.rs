// src/tools/mod.rs
// Tool implementations and the error-to-payload boundary

use crate::error::Result;
use serde_json::{Value, json};

pub mod git;
pub mod github;
pub mod redmine;
pub mod slack;

/// Render a tool outcome as the JSON text handed back to the dispatcher.
///
/// Failures become `{"error": "<label>: <detail>"}` payloads; the dispatcher
/// never sees a raised error.
pub fn respond(label: &str, result: Result<Value>) -> String {
    match result {
        Ok(value) => value.to_string(),
        Err(e) => json!({ "error": format!("{label}: {e}") }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;

    #[test]
    fn test_respond_passes_success_payload_through() {
        let rendered = respond("issue fetch error", Ok(json!({"message": "ok"})));
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["message"], "ok");
    }

    #[test]
    fn test_respond_wraps_failures_with_the_operation_label() {
        let rendered = respond(
            "issue fetch error",
            Err(RelayError::RemoteRequestFailed {
                status: 500,
                body: "boom".to_string(),
            }),
        );
        let value: Value = serde_json::from_str(&rendered).unwrap();
        let message = value["error"].as_str().unwrap();
        assert!(message.starts_with("issue fetch error:"));
        assert!(message.contains("500"));
    }
}
