// src/api/slack.rs
// Slack Web API client (messages and channels)

use crate::error::{RelayError, Result};
use crate::http::ApiClient;
use serde::Deserialize;
use serde_json::json;

const SLACK_API_BASE: &str = "https://slack.com/api/";
const DEFAULT_CHANNEL_TYPES: &str = "public_channel,private_channel";

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: String,
    pub ts: String,
}

/// Slack wraps every response in an `{ok, error?}` envelope; `post_message`
/// hands it to the caller because the tool layer renders the failure itself.
#[derive(Debug, Deserialize)]
pub struct PostMessageResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug)]
pub struct SlackClient {
    api: ApiClient,
}

impl SlackClient {
    pub fn new(http: reqwest::Client, token: &str) -> Self {
        let api = ApiClient::new(
            http,
            SLACK_API_BASE,
            vec![("Authorization", format!("Bearer {token}"))],
        );
        Self { api }
    }

    pub async fn post_message(&self, channel: &str, text: &str) -> Result<PostMessageResponse> {
        let value = self
            .api
            .post_json("chat.postMessage", &json!({ "channel": channel, "text": text }))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn list_channels(&self, limit: u32) -> Result<Vec<Channel>> {
        let query = [
            ("limit", limit.to_string()),
            ("types", DEFAULT_CHANNEL_TYPES.to_string()),
        ];
        let value = self.api.get_json("conversations.list", &query).await?;
        let response: ChannelListResponse = serde_json::from_value(value)?;
        if !response.ok {
            return Err(app_error(response.error));
        }
        Ok(response.channels)
    }

    pub async fn history(&self, channel: &str, limit: u32) -> Result<Vec<Message>> {
        let query = [
            ("channel", channel.to_string()),
            ("limit", limit.to_string()),
        ];
        let value = self.api.get_json("conversations.history", &query).await?;
        let response: HistoryResponse = serde_json::from_value(value)?;
        if !response.ok {
            return Err(app_error(response.error));
        }
        Ok(response.messages)
    }
}

/// Slack reports application errors with HTTP 200 and `ok: false`.
fn app_error(error: Option<String>) -> RelayError {
    RelayError::RemoteRequestFailed {
        status: 200,
        body: error.unwrap_or_else(|| "unknown Slack error".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_message_response_parses_failure_envelope() {
        let response: PostMessageResponse =
            serde_json::from_value(json!({"ok": false, "error": "channel_not_found"})).unwrap();
        assert!(!response.ok);
        assert_eq!(response.error.as_deref(), Some("channel_not_found"));
    }

    #[test]
    fn test_app_error_carries_slack_error_code() {
        let err = app_error(Some("invalid_auth".to_string()));
        assert!(err.to_string().contains("invalid_auth"));
    }

    #[test]
    fn test_message_tolerates_missing_user() {
        // Bot and system messages omit the user field.
        let message: Message =
            serde_json::from_value(json!({"type": "message", "text": "deployed", "ts": "17.0001"}))
                .unwrap();
        assert!(message.user.is_none());
    }
}
