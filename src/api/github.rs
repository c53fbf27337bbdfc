// src/api/github.rs
// GitHub REST API client (issues and pull requests)

use crate::error::Result;
use crate::http::ApiClient;
use serde::{Deserialize, Serialize};
use serde_json::json;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: i64,
    pub title: String,
    pub state: String,
    pub user: Actor,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: i64,
    pub title: String,
    pub state: String,
    pub user: Actor,
    pub html_url: String,
}

#[derive(Debug, Default)]
pub struct IssueFilter {
    pub assignee: Option<String>,
    /// Comma-separated label names
    pub labels: Option<String>,
    /// open / closed / all
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug)]
pub struct GitHubClient {
    api: ApiClient,
}

impl GitHubClient {
    pub fn new(http: reqwest::Client, token: &str) -> Self {
        let api = ApiClient::new(
            http,
            GITHUB_API_BASE,
            vec![
                ("Authorization", format!("Bearer {token}")),
                ("X-GitHub-Api-Version", GITHUB_API_VERSION.to_string()),
                ("Accept", "application/vnd.github+json".to_string()),
            ],
        );
        Self { api }
    }

    pub async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        filter: &IssueFilter,
    ) -> Result<Vec<Issue>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(assignee) = &filter.assignee {
            query.push(("assignee", assignee.clone()));
        }
        if let Some(labels) = &filter.labels {
            query.push(("labels", labels.clone()));
        }
        if let Some(state) = &filter.state {
            query.push(("state", state.clone()));
        }

        let value = self
            .api
            .get_json(&format!("/repos/{owner}/{repo}/issues"), &query)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn create_issue(&self, owner: &str, repo: &str, issue: &NewIssue) -> Result<Issue> {
        let value = self
            .api
            .post_json(
                &format!("/repos/{owner}/{repo}/issues"),
                &serde_json::to_value(issue)?,
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn add_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: i64,
        body: &str,
    ) -> Result<()> {
        self.api
            .post_json(
                &format!("/repos/{owner}/{repo}/issues/{issue_number}/comments"),
                &json!({ "body": body }),
            )
            .await?;
        Ok(())
    }

    pub async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        state: Option<&str>,
    ) -> Result<Vec<PullRequest>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(state) = state {
            query.push(("state", state.to_string()));
        }

        let value = self
            .api
            .get_json(&format!("/repos/{owner}/{repo}/pulls"), &query)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pull: &NewPullRequest,
    ) -> Result<PullRequest> {
        let value = self
            .api
            .post_json(
                &format!("/repos/{owner}/{repo}/pulls"),
                &serde_json::to_value(pull)?,
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn merge_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pull_number: i64,
        merge_method: &str,
    ) -> Result<()> {
        self.api
            .put_json(
                &format!("/repos/{owner}/{repo}/pulls/{pull_number}/merge"),
                &json!({ "merge_method": merge_method }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_deserializes_from_api_shape() {
        let issues: Vec<Issue> = serde_json::from_value(json!([{
            "id": 1,
            "number": 17,
            "title": "Crash on startup",
            "state": "open",
            "user": {"login": "octocat"},
            "html_url": "https://github.com/o/r/issues/17",
            "labels": [{"name": "bug"}]
        }]))
        .unwrap();
        assert_eq!(issues[0].number, 17);
        assert_eq!(issues[0].user.login, "octocat");
    }

    #[test]
    fn test_new_pull_request_omits_absent_body() {
        let pull = NewPullRequest {
            title: "Fix crash".to_string(),
            head: "fix/crash".to_string(),
            base: "main".to_string(),
            body: None,
        };
        let value = serde_json::to_value(&pull).unwrap();
        assert!(!value.as_object().unwrap().contains_key("body"));
    }
}
