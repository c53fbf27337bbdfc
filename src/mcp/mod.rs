// src/mcp/mod.rs
// MCP server implementation

pub mod elicitation;
mod handler;

use crate::auth::{AuthContext, ClientFactory};
use crate::git::GitClient;
use crate::tools::{self, respond};
use self::elicitation::ElicitationClient;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    schemars,
    service::{Peer, RoleServer},
    tool, tool_router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// MCP server state
#[derive(Clone)]
pub struct RelayServer {
    pub factory: Arc<ClientFactory>,
    pub git: Arc<GitClient>,
    /// Session id for this connection (assigned on first tool call)
    session: Arc<RwLock<Option<String>>>,
    /// Connected client peer, captured at dispatch time for elicitation
    peer: Arc<RwLock<Option<Peer<RoleServer>>>>,
    tool_router: ToolRouter<Self>,
}

impl RelayServer {
    pub fn new(factory: Arc<ClientFactory>, git: Arc<GitClient>) -> Self {
        Self {
            factory,
            git,
            session: Arc::new(RwLock::new(None)),
            peer: Arc::new(RwLock::new(None)),
            tool_router: Self::tool_router(),
        }
    }

    /// Capture the peer and make sure this connection has a session id.
    /// Called once per inbound tool call at the dispatcher boundary.
    pub(crate) async fn bind_connection(&self, peer: &Peer<RoleServer>) {
        *self.peer.write().await = Some(peer.clone());

        let mut session = self.session.write().await;
        if session.is_none() {
            let id = uuid::Uuid::new_v4().to_string();
            tracing::debug!(session = %id, "assigned session id");
            *session = Some(id);
        }
    }

    /// The capability bundle handed to the authenticated client factory.
    async fn auth_context(&self) -> AuthContext {
        AuthContext::new(
            self.session.read().await.clone(),
            Arc::new(ElicitationClient::new(self.peer.clone())),
        )
    }
}

// Request types for tools with parameters

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RedmineIssuesRequest {
    #[schemars(description = "Only issues assigned to the API key's owner")]
    pub assigned_to_me: Option<bool>,
    #[schemars(description = "Partial subject match")]
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RedmineCreateIssueRequest {
    #[schemars(description = "Project ID the issue is created in")]
    pub project_id: i64,
    #[schemars(description = "Issue subject")]
    pub subject: String,
    #[schemars(description = "Issue description")]
    pub description: Option<String>,
    #[schemars(description = "Assignee user ID")]
    pub assigned_to_id: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RedmineCommentRequest {
    #[schemars(description = "Issue ID to comment on")]
    pub issue_id: i64,
    #[schemars(description = "Comment text")]
    pub notes: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GithubIssuesRequest {
    #[schemars(description = "Repository owner")]
    pub owner: String,
    #[schemars(description = "Repository name")]
    pub repo: String,
    #[schemars(description = "Assignee login")]
    pub assignee: Option<String>,
    #[schemars(description = "Label names, comma-separated")]
    pub labels: Option<String>,
    #[schemars(description = "Issue state: open/closed/all (default open)")]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GithubCreateIssueRequest {
    #[schemars(description = "Repository owner")]
    pub owner: String,
    #[schemars(description = "Repository name")]
    pub repo: String,
    #[schemars(description = "Issue title")]
    pub title: String,
    #[schemars(description = "Issue body")]
    pub body: Option<String>,
    #[schemars(description = "Assignee logins")]
    pub assignees: Option<Vec<String>>,
    #[schemars(description = "Label names")]
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GithubCommentRequest {
    #[schemars(description = "Repository owner")]
    pub owner: String,
    #[schemars(description = "Repository name")]
    pub repo: String,
    #[schemars(description = "Issue number")]
    pub issue_number: i64,
    #[schemars(description = "Comment body")]
    pub body: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GithubPullsRequest {
    #[schemars(description = "Repository owner")]
    pub owner: String,
    #[schemars(description = "Repository name")]
    pub repo: String,
    #[schemars(description = "Pull request state: open/closed/all (default open)")]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GithubCreatePullRequest {
    #[schemars(description = "Repository owner")]
    pub owner: String,
    #[schemars(description = "Repository name")]
    pub repo: String,
    #[schemars(description = "Pull request title")]
    pub title: String,
    #[schemars(description = "Branch to merge from")]
    pub head: String,
    #[schemars(description = "Branch to merge into")]
    pub base: String,
    #[schemars(description = "Pull request body")]
    pub body: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GithubMergePullRequest {
    #[schemars(description = "Repository owner")]
    pub owner: String,
    #[schemars(description = "Repository name")]
    pub repo: String,
    #[schemars(description = "Pull request number")]
    pub pull_number: i64,
    #[schemars(description = "Merge method: merge/squash/rebase (default merge)")]
    pub merge_method: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SlackPostRequest {
    #[schemars(description = "Channel ID (e.g. C01234567) or name (e.g. #general)")]
    pub channel: String,
    #[schemars(description = "Message text to post")]
    pub text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SlackChannelsRequest {
    #[schemars(description = "Max channels to return (default 100)")]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SlackHistoryRequest {
    #[schemars(description = "Channel ID to read history from (e.g. C01234567)")]
    pub channel: String,
    #[schemars(description = "Max messages to return (default 100)")]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GitAddRequest {
    #[schemars(description = "File paths to stage; [\".\"] stages everything")]
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GitCommitRequest {
    #[schemars(description = "Commit message")]
    pub message: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GitRemoteRequest {
    #[schemars(description = "Remote name (default origin)")]
    pub remote: Option<String>,
    #[schemars(description = "Branch name")]
    pub branch: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GitLogRequest {
    #[schemars(description = "Number of commits to show (default 10)")]
    pub count: Option<u32>,
}

#[tool_router]
impl RelayServer {
    // --- Redmine ---

    #[tool(description = "List Redmine issues, optionally filtered by assignee or subject.")]
    async fn redmine_list_issues(
        &self,
        Parameters(req): Parameters<RedmineIssuesRequest>,
    ) -> String {
        let auth = self.auth_context().await;
        respond(
            "issue fetch error",
            tools::redmine::list_issues(&self.factory, &auth, req.assigned_to_me, req.subject)
                .await,
        )
    }

    #[tool(description = "Create a new Redmine issue.")]
    async fn redmine_create_issue(
        &self,
        Parameters(req): Parameters<RedmineCreateIssueRequest>,
    ) -> String {
        let auth = self.auth_context().await;
        respond(
            "issue create error",
            tools::redmine::create_issue(
                &self.factory,
                &auth,
                req.project_id,
                req.subject,
                req.description,
                req.assigned_to_id,
            )
            .await,
        )
    }

    #[tool(description = "Add a comment to an existing Redmine issue.")]
    async fn redmine_add_comment(
        &self,
        Parameters(req): Parameters<RedmineCommentRequest>,
    ) -> String {
        let auth = self.auth_context().await;
        respond(
            "comment error",
            tools::redmine::add_comment(&self.factory, &auth, req.issue_id, req.notes).await,
        )
    }

    // --- GitHub ---

    #[tool(description = "List issues in a GitHub repository.")]
    async fn github_list_issues(
        &self,
        Parameters(req): Parameters<GithubIssuesRequest>,
    ) -> String {
        let auth = self.auth_context().await;
        respond(
            "issue fetch error",
            tools::github::list_issues(
                &self.factory,
                &auth,
                req.owner,
                req.repo,
                req.assignee,
                req.labels,
                req.state,
            )
            .await,
        )
    }

    #[tool(description = "Create a new issue in a GitHub repository.")]
    async fn github_create_issue(
        &self,
        Parameters(req): Parameters<GithubCreateIssueRequest>,
    ) -> String {
        let auth = self.auth_context().await;
        respond(
            "issue create error",
            tools::github::create_issue(
                &self.factory,
                &auth,
                req.owner,
                req.repo,
                req.title,
                req.body,
                req.assignees,
                req.labels,
            )
            .await,
        )
    }

    #[tool(description = "Add a comment to an existing GitHub issue.")]
    async fn github_add_comment(
        &self,
        Parameters(req): Parameters<GithubCommentRequest>,
    ) -> String {
        let auth = self.auth_context().await;
        respond(
            "comment error",
            tools::github::add_comment(
                &self.factory,
                &auth,
                req.owner,
                req.repo,
                req.issue_number,
                req.body,
            )
            .await,
        )
    }

    #[tool(description = "List pull requests in a GitHub repository.")]
    async fn github_list_pull_requests(
        &self,
        Parameters(req): Parameters<GithubPullsRequest>,
    ) -> String {
        let auth = self.auth_context().await;
        respond(
            "pull request fetch error",
            tools::github::list_pull_requests(&self.factory, &auth, req.owner, req.repo, req.state)
                .await,
        )
    }

    #[tool(description = "Create a new pull request in a GitHub repository.")]
    async fn github_create_pull_request(
        &self,
        Parameters(req): Parameters<GithubCreatePullRequest>,
    ) -> String {
        let auth = self.auth_context().await;
        respond(
            "pull request create error",
            tools::github::create_pull_request(
                &self.factory,
                &auth,
                req.owner,
                req.repo,
                req.title,
                req.head,
                req.base,
                req.body,
            )
            .await,
        )
    }

    #[tool(description = "Merge a pull request in a GitHub repository.")]
    async fn github_merge_pull_request(
        &self,
        Parameters(req): Parameters<GithubMergePullRequest>,
    ) -> String {
        let auth = self.auth_context().await;
        respond(
            "pull request merge error",
            tools::github::merge_pull_request(
                &self.factory,
                &auth,
                req.owner,
                req.repo,
                req.pull_number,
                req.merge_method,
            )
            .await,
        )
    }

    // --- Slack ---

    #[tool(description = "Post a message to a Slack channel.")]
    async fn slack_post_message(&self, Parameters(req): Parameters<SlackPostRequest>) -> String {
        let auth = self.auth_context().await;
        respond(
            "message post error",
            tools::slack::post_message(&self.factory, &auth, req.channel, req.text).await,
        )
    }

    #[tool(description = "List Slack channels the bot can see.")]
    async fn slack_list_channels(
        &self,
        Parameters(req): Parameters<SlackChannelsRequest>,
    ) -> String {
        let auth = self.auth_context().await;
        respond(
            "channel list error",
            tools::slack::list_channels(&self.factory, &auth, req.limit).await,
        )
    }

    #[tool(description = "Fetch message history for a Slack channel.")]
    async fn slack_history(&self, Parameters(req): Parameters<SlackHistoryRequest>) -> String {
        let auth = self.auth_context().await;
        respond(
            "history fetch error",
            tools::slack::history(&self.factory, &auth, req.channel, req.limit).await,
        )
    }

    // --- Local git ---

    #[tool(description = "Show working tree changes (git status --porcelain).")]
    async fn git_status(&self) -> String {
        respond("git status error", tools::git::status(&self.git).await)
    }

    #[tool(description = "Stage files (git add).")]
    async fn git_add(&self, Parameters(req): Parameters<GitAddRequest>) -> String {
        respond("git add error", tools::git::add(&self.git, req.files).await)
    }

    #[tool(description = "Commit staged changes (git commit).")]
    async fn git_commit(&self, Parameters(req): Parameters<GitCommitRequest>) -> String {
        respond(
            "git commit error",
            tools::git::commit(&self.git, req.message).await,
        )
    }

    #[tool(description = "Fetch and integrate remote changes (git pull).")]
    async fn git_pull(&self, Parameters(req): Parameters<GitRemoteRequest>) -> String {
        respond(
            "git pull error",
            tools::git::pull(&self.git, req.remote, req.branch).await,
        )
    }

    #[tool(description = "Push local commits to a remote (git push).")]
    async fn git_push(&self, Parameters(req): Parameters<GitRemoteRequest>) -> String {
        respond(
            "git push error",
            tools::git::push(&self.git, req.remote, req.branch).await,
        )
    }

    #[tool(description = "Show recent commit history (git log).")]
    async fn git_log(&self, Parameters(req): Parameters<GitLogRequest>) -> String {
        respond("git log error", tools::git::log(&self.git, req.count).await)
    }
}
