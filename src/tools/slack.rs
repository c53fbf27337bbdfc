// src/tools/slack.rs
// Slack messaging tools

use crate::api::slack::{Channel, Message, PostMessageResponse};
use crate::auth::{AuthContext, ClientFactory};
use crate::error::Result;
use serde_json::{Value, json};

const DEFAULT_LIMIT: u32 = 100;

pub async fn post_message(
    factory: &ClientFactory,
    auth: &AuthContext,
    channel: String,
    text: String,
) -> Result<Value> {
    let client = factory.slack(auth).await?;
    let response = client.post_message(&channel, &text).await?;
    Ok(render_post_result(&channel, &response))
}

pub async fn list_channels(
    factory: &ClientFactory,
    auth: &AuthContext,
    limit: Option<u32>,
) -> Result<Value> {
    let client = factory.slack(auth).await?;
    let channels = client.list_channels(limit.unwrap_or(DEFAULT_LIMIT)).await?;
    Ok(render_channel_list(&channels))
}

pub async fn history(
    factory: &ClientFactory,
    auth: &AuthContext,
    channel: String,
    limit: Option<u32>,
) -> Result<Value> {
    let client = factory.slack(auth).await?;
    let messages = client
        .history(&channel, limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(render_history(&messages))
}

fn render_post_result(channel: &str, response: &PostMessageResponse) -> Value {
    if response.ok {
        json!({ "message": format!("Posted message to {channel}.") })
    } else {
        let detail = response.error.as_deref().unwrap_or("unknown error");
        json!({ "error": format!("message post error: {detail}") })
    }
}

fn render_channel_list(channels: &[Channel]) -> Value {
    if channels.is_empty() {
        return json!({ "message": "No channels found." });
    }
    let rows: Vec<Value> = channels
        .iter()
        .map(|channel| {
            json!({
                "id": channel.id,
                "name": channel.name,
                "is_private": channel.is_private,
            })
        })
        .collect();
    Value::Array(rows)
}

fn render_history(messages: &[Message]) -> Value {
    if messages.is_empty() {
        return json!({ "message": "No messages in this channel." });
    }
    let rows: Vec<Value> = messages
        .iter()
        .map(|message| {
            json!({
                "user": message.user,
                "text": message.text,
                "timestamp": message.ts,
            })
        })
        .collect();
    Value::Array(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_post_renders_confirmation() {
        let response = PostMessageResponse {
            ok: true,
            error: None,
        };
        let value = render_post_result("#general", &response);
        assert_eq!(value["message"], "Posted message to #general.");
    }

    #[test]
    fn test_failed_post_renders_error_with_label() {
        let response = PostMessageResponse {
            ok: false,
            error: Some("channel_not_found".to_string()),
        };
        let value = render_post_result("#general", &response);
        let message = value["error"].as_str().unwrap();
        assert!(message.starts_with("message post error:"));
        assert!(message.contains("channel_not_found"));
    }

    #[test]
    fn test_zero_channels_renders_a_message() {
        assert_eq!(render_channel_list(&[])["message"], "No channels found.");
    }

    #[test]
    fn test_history_rows_are_reshaped() {
        let messages = vec![Message {
            user: Some("U123".to_string()),
            text: "release shipped".to_string(),
            ts: "1714550400.000100".to_string(),
        }];
        let value = render_history(&messages);
        let rows = value.as_array().unwrap();
        assert_eq!(rows[0]["user"], "U123");
        assert_eq!(rows[0]["timestamp"], "1714550400.000100");
    }
}
