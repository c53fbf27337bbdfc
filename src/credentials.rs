// src/credentials.rs
// Session-scoped credential cache for remote services

use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;

/// Field name the elicitation exchange uses for the secret value.
pub const SECRET_FIELD: &str = "api_key";

/// The remote services that require a per-session secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Redmine,
    GitHub,
    Slack,
}

impl Service {
    pub fn name(&self) -> &'static str {
        match self {
            Service::Redmine => "redmine",
            Service::GitHub => "github",
            Service::Slack => "slack",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Service::Redmine => "Redmine",
            Service::GitHub => "GitHub",
            Service::Slack => "Slack",
        }
    }

    /// Prompt label shown to the user when the secret is elicited.
    pub fn secret_label(&self) -> &'static str {
        match self {
            Service::Redmine => "Enter your Redmine API key.",
            Service::GitHub => "Enter a GitHub personal access token (PAT).",
            Service::Slack => "Enter a Slack bot user OAuth token.",
        }
    }

    /// Optional free-text instructions accompanying the prompt.
    pub fn secret_instructions(&self) -> Option<&'static str> {
        match self {
            Service::Redmine => None,
            Service::GitHub => {
                Some("A token with repository read and write access is required.")
            }
            Service::Slack => {
                Some("Use the bot token starting with xoxb-. It must carry the required scopes.")
            }
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Process-lifetime cache of secrets, keyed by (session id, service).
///
/// Explicitly constructed in `main` and injected into the client factory.
/// Entries are created on first successful elicitation and never expire.
#[derive(Default)]
pub struct CredentialStore {
    inner: RwLock<HashMap<String, HashMap<Service, String>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure lookup, no side effect.
    pub async fn get(&self, session: &str, service: Service) -> Option<String> {
        let sessions = self.inner.read().await;
        sessions
            .get(session)
            .and_then(|record| record.get(&service))
            .cloned()
    }

    /// Creates the session's record if absent, then overwrites the single
    /// slot for the service. Last write wins.
    pub async fn set(&self, session: &str, service: Service, secret: &str) {
        let mut sessions = self.inner.write().await;
        sessions
            .entry(session.to_string())
            .or_default()
            .insert(service, secret.to_string());
    }

    /// Number of sessions holding at least one secret.
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.len()
    }
}
