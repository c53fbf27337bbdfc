// src/mcp/elicitation.rs
// MCP elicitation support — secret entry during tool execution.
//
// Wraps rmcp's elicitation API behind the SecretPrompt capability. Call
// sites see a structured outcome when the client can't prompt.

use crate::auth::{PromptOutcome, SecretPrompt};
use crate::credentials::{SECRET_FIELD, Service};
use async_trait::async_trait;
use rmcp::model::{CreateElicitationRequestParams, ElicitationAction, ElicitationSchema};
use rmcp::service::{Peer, RoleServer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Timeout for elicitation requests (user is typing, so be generous)
const ELICITATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Wrapper around the MCP peer for secret prompts.
#[derive(Clone)]
pub struct ElicitationClient {
    peer: Arc<RwLock<Option<Peer<RoleServer>>>>,
}

impl ElicitationClient {
    pub fn new(peer: Arc<RwLock<Option<Peer<RoleServer>>>>) -> Self {
        Self { peer }
    }

    /// Check if the connected client supports elicitation.
    pub async fn is_available(&self) -> bool {
        let guard = self.peer.read().await;
        guard
            .as_ref()
            .map(|p| p.supports_elicitation())
            .unwrap_or(false)
    }

    /// Send an elicitation request and map the result to an outcome.
    async fn request(&self, message: String, schema: ElicitationSchema) -> PromptOutcome {
        let guard = self.peer.read().await;
        let peer = match guard.as_ref() {
            Some(p) if p.supports_elicitation() => p,
            Some(_) => {
                return PromptOutcome::Unavailable(
                    "client does not support elicitation".to_string(),
                );
            }
            None => return PromptOutcome::Unavailable("no client connected".to_string()),
        };

        let params = CreateElicitationRequestParams {
            meta: None,
            message,
            requested_schema: schema,
        };

        match peer
            .create_elicitation_with_timeout(params, Some(ELICITATION_TIMEOUT))
            .await
        {
            Ok(result) => match result.action {
                ElicitationAction::Accept => match result.content {
                    Some(data) => PromptOutcome::Submitted(data),
                    None => PromptOutcome::Declined,
                },
                ElicitationAction::Decline => PromptOutcome::Declined,
                ElicitationAction::Cancel => PromptOutcome::Cancelled,
            },
            Err(e) => {
                let reason = format!("elicitation request failed: {e}");
                tracing::warn!("{reason}");
                PromptOutcome::Unavailable(reason)
            }
        }
    }
}

#[async_trait]
impl SecretPrompt for ElicitationClient {
    async fn request_secret(&self, service: Service) -> PromptOutcome {
        let message = match service.secret_instructions() {
            Some(instructions) => format!("{} {}", service.secret_label(), instructions),
            None => service.secret_label().to_string(),
        };
        self.request(message, secret_schema(service)).await
    }
}

/// Build the one-field schema for a service secret.
pub fn secret_schema(service: Service) -> ElicitationSchema {
    let description = service
        .secret_instructions()
        .unwrap_or_else(|| service.secret_label());

    ElicitationSchema::builder()
        .title(format!("{} authentication", service.display_name()))
        .description(description)
        .required_string_property(SECRET_FIELD, |s| s.description(service.secret_label()))
        .build_unchecked()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_schema_requires_the_api_key_field() {
        for service in [Service::Redmine, Service::GitHub, Service::Slack] {
            let schema = secret_schema(service);
            let required = schema.required.as_ref().expect("should have required fields");
            assert!(required.contains(&SECRET_FIELD.to_string()));
            assert_eq!(schema.properties.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_no_peer_is_unavailable() {
        let client = ElicitationClient::new(Arc::new(RwLock::new(None)));
        assert!(!client.is_available().await);

        let outcome = client.request_secret(Service::GitHub).await;
        assert!(matches!(outcome, PromptOutcome::Unavailable(_)));
    }
}
