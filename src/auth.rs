// src/auth.rs
// Per-session credential resolution and authenticated client construction

use crate::api::github::GitHubClient;
use crate::api::redmine::RedmineClient;
use crate::api::slack::SlackClient;
use crate::config::EnvConfig;
use crate::credentials::{CredentialStore, SECRET_FIELD, Service};
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a secret prompt round-trip with the connected client.
#[derive(Debug)]
pub enum PromptOutcome {
    /// The client submitted data (expected to carry the secret field)
    Submitted(serde_json::Value),
    /// The user explicitly declined
    Declined,
    /// The user cancelled / dismissed the prompt
    Cancelled,
    /// The client cannot prompt (no capability, transport failure)
    Unavailable(String),
}

/// Capability to ask the connected client for a service secret.
///
/// Implemented by the MCP elicitation client; tests substitute a mock.
#[async_trait]
pub trait SecretPrompt: Send + Sync {
    async fn request_secret(&self, service: Service) -> PromptOutcome;
}

/// Per-request capability bundle: the calling session's identity plus the
/// means to prompt it for a secret. Constructed once per inbound tool call
/// at the dispatcher boundary.
pub struct AuthContext {
    session_id: Option<String>,
    prompt: Arc<dyn SecretPrompt>,
}

impl AuthContext {
    pub fn new(session_id: Option<String>, prompt: Arc<dyn SecretPrompt>) -> Self {
        Self { session_id, prompt }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Resolve the secret for a service: store hit, or one elicitation
    /// round-trip whose submitted value is cached for the session.
    ///
    /// Declined prompts are not negatively cached; the next call re-prompts.
    pub async fn resolve_secret(
        &self,
        store: &CredentialStore,
        service: Service,
    ) -> Result<String> {
        let session = self
            .session_id
            .as_deref()
            .ok_or(RelayError::SessionUnavailable)?;

        if let Some(secret) = store.get(session, service).await {
            debug!(%service, "credential cache hit");
            return Ok(secret);
        }

        match self.prompt.request_secret(service).await {
            PromptOutcome::Submitted(content) => {
                let secret = content
                    .get(SECRET_FIELD)
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .ok_or(RelayError::CredentialMissing(service))?;
                store.set(session, service, &secret).await;
                debug!(%service, "credential stored for session");
                Ok(secret)
            }
            PromptOutcome::Declined | PromptOutcome::Cancelled => {
                Err(RelayError::CredentialDeclined(service))
            }
            PromptOutcome::Unavailable(reason) => {
                warn!(%service, %reason, "secret prompt unavailable");
                Err(RelayError::CredentialMissing(service))
            }
        }
    }
}

/// Builds authenticated service clients on demand.
///
/// Invoked exactly once per tool execution, immediately before the network
/// operation. Constructed clients are never cached; only secrets are.
pub struct ClientFactory {
    store: Arc<CredentialStore>,
    config: EnvConfig,
    http: reqwest::Client,
}

impl ClientFactory {
    pub fn new(store: Arc<CredentialStore>, config: EnvConfig, http: reqwest::Client) -> Self {
        Self {
            store,
            config,
            http,
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Redmine requires its base address before anything else: a missing
    /// REDMINE_URL fails fast, before any elicitation or network attempt.
    pub async fn redmine(&self, auth: &AuthContext) -> Result<RedmineClient> {
        let base_url = self.config.redmine_base_url()?.to_string();
        let api_key = auth.resolve_secret(&self.store, Service::Redmine).await?;
        Ok(RedmineClient::new(self.http.clone(), &base_url, &api_key))
    }

    pub async fn github(&self, auth: &AuthContext) -> Result<GitHubClient> {
        let token = auth.resolve_secret(&self.store, Service::GitHub).await?;
        Ok(GitHubClient::new(self.http.clone(), &token))
    }

    pub async fn slack(&self, auth: &AuthContext) -> Result<SlackClient> {
        let token = auth.resolve_secret(&self.store, Service::Slack).await?;
        Ok(SlackClient::new(self.http.clone(), &token))
    }
}
