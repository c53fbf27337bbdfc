// src/config.rs
// Environment-based configuration - single source of truth for env vars

use crate::error::{RelayError, Result};
use tracing::{debug, warn};

pub const REDMINE_URL_VAR: &str = "REDMINE_URL";

/// Configuration loaded once at startup.
///
/// Service secrets are deliberately absent here: they are elicited from the
/// connected client per session, never read from the environment.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// Redmine base URL (REDMINE_URL). Mandatory for issue-tracker tools.
    pub redmine_base_url: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        let config = Self {
            redmine_base_url: read_var(REDMINE_URL_VAR),
        };
        config.log_status();
        config
    }

    /// Log which configuration values are available (without printing them).
    fn log_status(&self) {
        if self.redmine_base_url.is_some() {
            debug!("Redmine base URL configured");
        } else {
            warn!("{REDMINE_URL_VAR} is not set - Redmine tools will fail until it is configured");
        }
    }

    /// The mandatory Redmine base address, or a configuration error.
    pub fn redmine_base_url(&self) -> Result<&str> {
        self.redmine_base_url.as_deref().ok_or_else(|| {
            RelayError::Config(format!("{REDMINE_URL_VAR} must be set to the Redmine base URL"))
        })
    }
}

/// Read a single env var, filtering empty values.
fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
