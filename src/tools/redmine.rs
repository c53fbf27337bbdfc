// src/tools/redmine.rs
// Redmine issue tools

use crate::api::redmine::{Issue, IssueFilter, NewIssue};
use crate::auth::{AuthContext, ClientFactory};
use crate::error::Result;
use serde_json::{Value, json};

pub async fn list_issues(
    factory: &ClientFactory,
    auth: &AuthContext,
    assigned_to_me: Option<bool>,
    subject: Option<String>,
) -> Result<Value> {
    let client = factory.redmine(auth).await?;
    let filter = IssueFilter {
        assigned_to_me: assigned_to_me.unwrap_or(false),
        subject,
    };
    let issues = client.list_issues(&filter).await?;
    Ok(render_issue_list(&issues))
}

pub async fn create_issue(
    factory: &ClientFactory,
    auth: &AuthContext,
    project_id: i64,
    subject: String,
    description: Option<String>,
    assigned_to_id: Option<i64>,
) -> Result<Value> {
    let client = factory.redmine(auth).await?;
    let issue = client
        .create_issue(&NewIssue {
            project_id,
            subject,
            description,
            assigned_to_id,
        })
        .await?;
    Ok(json!({
        "message": format!("Created issue #{}.", issue.id),
        "issue": {
            "id": issue.id,
            "subject": issue.subject,
            "project": issue.project.name,
            "status": issue.status.name,
        },
    }))
}

pub async fn add_comment(
    factory: &ClientFactory,
    auth: &AuthContext,
    issue_id: i64,
    notes: String,
) -> Result<Value> {
    let client = factory.redmine(auth).await?;
    client.add_comment(issue_id, &notes).await?;
    Ok(json!({ "message": format!("Added a comment to issue #{issue_id}.") }))
}

fn render_issue_list(issues: &[Issue]) -> Value {
    if issues.is_empty() {
        return json!({ "message": "No matching issues found." });
    }
    let rows: Vec<Value> = issues
        .iter()
        .map(|issue| {
            json!({
                "id": issue.id,
                "project": issue.project.name,
                "tracker": issue.tracker.name,
                "status": issue.status.name,
                "priority": issue.priority.name,
                "subject": issue.subject,
                "assigned_to": issue
                    .assigned_to
                    .as_ref()
                    .map(|a| a.name.as_str())
                    .unwrap_or("unassigned"),
                "updated_on": issue.updated_on,
            })
        })
        .collect();
    json!({ "issues": rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::redmine::NamedRef;

    fn named(id: i64, name: &str) -> NamedRef {
        NamedRef {
            id,
            name: name.to_string(),
        }
    }

    fn issue(id: i64, subject: &str) -> Issue {
        Issue {
            id,
            subject: subject.to_string(),
            description: None,
            project: named(1, "portal"),
            tracker: named(2, "Bug"),
            status: named(3, "New"),
            priority: named(4, "Normal"),
            assigned_to: None,
            updated_on: Some("2024-05-01T09:00:00Z".to_string()),
        }
    }

    #[test]
    fn test_zero_issues_renders_a_message_not_an_empty_list() {
        let value = render_issue_list(&[]);
        assert!(value.get("issues").is_none());
        assert_eq!(value["message"], "No matching issues found.");
    }

    #[test]
    fn test_issue_rows_carry_reshaped_fields() {
        let value = render_issue_list(&[issue(42, "Broken login")]);
        let rows = value["issues"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 42);
        assert_eq!(rows[0]["project"], "portal");
        assert_eq!(rows[0]["assigned_to"], "unassigned");
    }
}
