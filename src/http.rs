// src/http.rs
// Shared HTTP client and JSON transport for all remote service calls

use crate::error::{RelayError, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest response-body excerpt kept in logs and error values
const BODY_PREVIEW_LIMIT: usize = 600;

/// Create the shared HTTP client with appropriate defaults.
///
/// This client should be created once at startup and handed to the client
/// factory. Uses connection pooling internally.
pub fn create_shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(10)
        .user_agent(concat!("opsrelay/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// JSON request/response transport bound to a base address and a fixed set
/// of authentication headers. Stateless; construction is cheap.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    headers: Vec<(&'static str, String)>,
}

impl ApiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        headers: Vec<(&'static str, String)>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            headers,
        }
    }

    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let request = self.http.get(self.url(path)).query(query);
        self.execute(self.apply_headers(request)).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let request = self.http.post(self.url(path)).json(body);
        self.execute(self.apply_headers(request)).await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> Result<Value> {
        let request = self.http.put(self.url(path)).json(body);
        self.execute(self.apply_headers(request)).await
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn apply_headers(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for (name, value) in &self.headers {
            request = request.header(*name, value.as_str());
        }
        request
    }

    /// Send the request; non-2xx responses are logged with status and body
    /// and surfaced as a single `RemoteRequestFailed` error.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!(status = %status, body = %preview(&body), "remote request failed");
            return Err(RelayError::RemoteRequestFailed {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        if body.trim().is_empty() {
            // 204-style responses carry no payload
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Char-boundary-safe excerpt of a response body.
fn preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_LIMIT) {
        Some((i, _)) => format!("{}...", &body[..i]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(reqwest::Client::new(), base, Vec::new())
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let api = client("https://api.example.com");
        assert_eq!(
            api.url("/issues.json"),
            "https://api.example.com/issues.json"
        );
    }

    #[test]
    fn test_url_handles_trailing_and_missing_slashes() {
        let api = client("https://slack.com/api/");
        assert_eq!(api.url("chat.postMessage"), "https://slack.com/api/chat.postMessage");
        let api = client("https://api.example.com/");
        assert_eq!(api.url("/repos/o/r/issues"), "https://api.example.com/repos/o/r/issues");
    }

    #[test]
    fn test_preview_keeps_short_bodies_verbatim() {
        assert_eq!(preview("not found"), "not found");
    }

    #[test]
    fn test_preview_truncates_long_bodies() {
        let long = "x".repeat(5000);
        let excerpt = preview(&long);
        assert!(excerpt.len() < long.len());
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let long = "é".repeat(2000);
        let excerpt = preview(&long);
        assert!(excerpt.ends_with("..."));
    }
}
