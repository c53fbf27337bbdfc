// src/api/redmine.rs
// Redmine REST API client (issues and journal notes)

use crate::error::Result;
use crate::http::ApiClient;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// `{id, name}` reference embedded throughout Redmine payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub subject: String,
    #[serde(default)]
    pub description: Option<String>,
    pub project: NamedRef,
    pub tracker: NamedRef,
    pub status: NamedRef,
    pub priority: NamedRef,
    #[serde(default)]
    pub assigned_to: Option<NamedRef>,
    #[serde(default)]
    pub updated_on: Option<String>,
}

#[derive(Debug, Default)]
pub struct IssueFilter {
    /// Restrict to issues assigned to the key's owner (`assigned_to_id=me`)
    pub assigned_to_me: bool,
    /// Partial subject match (sent as `~subject~`)
    pub subject: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewIssue {
    pub project_id: i64,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct IssuesEnvelope {
    issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
struct IssueEnvelope {
    issue: Issue,
}

#[derive(Debug)]
pub struct RedmineClient {
    api: ApiClient,
}

impl RedmineClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        let api = ApiClient::new(
            http,
            base_url,
            vec![("X-Redmine-API-Key", api_key.to_string())],
        );
        Self { api }
    }

    pub async fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if filter.assigned_to_me {
            query.push(("assigned_to_id", "me".to_string()));
        }
        if let Some(subject) = &filter.subject {
            query.push(("subject", format!("~{subject}~")));
        }

        let value = self.api.get_json("/issues.json", &query).await?;
        let envelope: IssuesEnvelope = serde_json::from_value(value)?;
        Ok(envelope.issues)
    }

    pub async fn create_issue(&self, issue: &NewIssue) -> Result<Issue> {
        let body = json!({ "issue": serde_json::to_value(issue)? });
        let value = self.api.post_json("/issues.json", &body).await?;
        let envelope: IssueEnvelope = serde_json::from_value(value)?;
        Ok(envelope.issue)
    }

    /// Notes are appended to the issue's journal via an update request.
    pub async fn add_comment(&self, issue_id: i64, notes: &str) -> Result<()> {
        let body = json!({ "issue": { "notes": notes } });
        self.api
            .put_json(&format!("/issues/{issue_id}.json"), &body)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_deserializes_without_assignee() {
        let issue: Issue = serde_json::from_value(json!({
            "id": 42,
            "subject": "Broken login",
            "project": {"id": 1, "name": "portal"},
            "tracker": {"id": 2, "name": "Bug"},
            "status": {"id": 1, "name": "New"},
            "priority": {"id": 4, "name": "Normal"},
            "author": {"id": 9, "name": "ignored"},
            "created_on": "2024-05-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(issue.id, 42);
        assert!(issue.assigned_to.is_none());
        assert!(issue.updated_on.is_none());
    }

    #[test]
    fn test_new_issue_omits_absent_optionals() {
        let issue = NewIssue {
            project_id: 7,
            subject: "Add metrics".to_string(),
            description: None,
            assigned_to_id: None,
        };
        let value = serde_json::to_value(&issue).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(!object.contains_key("description"));
        assert!(!object.contains_key("assigned_to_id"));
    }
}
