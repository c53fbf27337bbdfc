// src/tools/github.rs
// GitHub issue and pull request tools

use crate::api::github::{Issue, IssueFilter, NewIssue, NewPullRequest, PullRequest};
use crate::auth::{AuthContext, ClientFactory};
use crate::error::Result;
use serde_json::{Value, json};

pub async fn list_issues(
    factory: &ClientFactory,
    auth: &AuthContext,
    owner: String,
    repo: String,
    assignee: Option<String>,
    labels: Option<String>,
    state: Option<String>,
) -> Result<Value> {
    let client = factory.github(auth).await?;
    let filter = IssueFilter {
        assignee,
        labels,
        state: Some(state.unwrap_or_else(|| "open".to_string())),
    };
    let issues = client.list_issues(&owner, &repo, &filter).await?;
    Ok(render_issue_list(&issues))
}

pub async fn create_issue(
    factory: &ClientFactory,
    auth: &AuthContext,
    owner: String,
    repo: String,
    title: String,
    body: Option<String>,
    assignees: Option<Vec<String>>,
    labels: Option<Vec<String>>,
) -> Result<Value> {
    let client = factory.github(auth).await?;
    let issue = client
        .create_issue(
            &owner,
            &repo,
            &NewIssue {
                title,
                body,
                assignees,
                labels,
            },
        )
        .await?;
    Ok(json!({
        "message": format!("Created issue #{}.", issue.number),
        "url": issue.html_url,
    }))
}

pub async fn add_comment(
    factory: &ClientFactory,
    auth: &AuthContext,
    owner: String,
    repo: String,
    issue_number: i64,
    body: String,
) -> Result<Value> {
    let client = factory.github(auth).await?;
    client
        .add_issue_comment(&owner, &repo, issue_number, &body)
        .await?;
    Ok(json!({ "message": format!("Added a comment to issue #{issue_number}.") }))
}

pub async fn list_pull_requests(
    factory: &ClientFactory,
    auth: &AuthContext,
    owner: String,
    repo: String,
    state: Option<String>,
) -> Result<Value> {
    let client = factory.github(auth).await?;
    let state = state.unwrap_or_else(|| "open".to_string());
    let pulls = client
        .list_pull_requests(&owner, &repo, Some(&state))
        .await?;
    Ok(render_pull_list(&pulls))
}

pub async fn create_pull_request(
    factory: &ClientFactory,
    auth: &AuthContext,
    owner: String,
    repo: String,
    title: String,
    head: String,
    base: String,
    body: Option<String>,
) -> Result<Value> {
    let client = factory.github(auth).await?;
    let pull = client
        .create_pull_request(
            &owner,
            &repo,
            &NewPullRequest {
                title,
                head,
                base,
                body,
            },
        )
        .await?;
    Ok(json!({
        "message": format!("Created pull request #{}.", pull.number),
        "url": pull.html_url,
    }))
}

pub async fn merge_pull_request(
    factory: &ClientFactory,
    auth: &AuthContext,
    owner: String,
    repo: String,
    pull_number: i64,
    merge_method: Option<String>,
) -> Result<Value> {
    let client = factory.github(auth).await?;
    let method = merge_method.unwrap_or_else(|| "merge".to_string());
    client
        .merge_pull_request(&owner, &repo, pull_number, &method)
        .await?;
    Ok(json!({ "message": format!("Merged pull request #{pull_number}.") }))
}

fn render_issue_list(issues: &[Issue]) -> Value {
    if issues.is_empty() {
        return json!({ "message": "No matching issues found." });
    }
    let rows: Vec<Value> = issues
        .iter()
        .map(|issue| {
            json!({
                "number": issue.number,
                "title": issue.title,
                "state": issue.state,
                "author": issue.user.login,
                "url": issue.html_url,
            })
        })
        .collect();
    Value::Array(rows)
}

fn render_pull_list(pulls: &[PullRequest]) -> Value {
    if pulls.is_empty() {
        return json!({ "message": "No matching pull requests found." });
    }
    let rows: Vec<Value> = pulls
        .iter()
        .map(|pull| {
            json!({
                "number": pull.number,
                "title": pull.title,
                "state": pull.state,
                "author": pull.user.login,
                "url": pull.html_url,
            })
        })
        .collect();
    Value::Array(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::github::Actor;

    #[test]
    fn test_zero_issues_renders_a_message() {
        let value = render_issue_list(&[]);
        assert_eq!(value["message"], "No matching issues found.");
    }

    #[test]
    fn test_issue_rows_are_reshaped() {
        let issues = vec![Issue {
            number: 17,
            title: "Crash on startup".to_string(),
            state: "open".to_string(),
            user: Actor {
                login: "octocat".to_string(),
            },
            html_url: "https://github.com/o/r/issues/17".to_string(),
        }];
        let value = render_issue_list(&issues);
        let rows = value.as_array().unwrap();
        assert_eq!(rows[0]["number"], 17);
        assert_eq!(rows[0]["author"], "octocat");
    }

    #[test]
    fn test_zero_pulls_renders_a_message() {
        let value = render_pull_list(&[]);
        assert_eq!(value["message"], "No matching pull requests found.");
    }
}
