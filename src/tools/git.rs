// src/tools/git.rs
// Local git tools

use crate::error::Result;
use crate::git::GitClient;
use serde_json::{Value, json};

pub async fn status(git: &GitClient) -> Result<Value> {
    let output = git.status().await?;
    Ok(if output.is_empty() {
        json!({ "message": "No changed files." })
    } else {
        json!({ "status": output })
    })
}

pub async fn add(git: &GitClient, files: Vec<String>) -> Result<Value> {
    let output = git.add(&files).await?;
    Ok(json!({ "message": "Files staged.", "output": output }))
}

pub async fn commit(git: &GitClient, message: String) -> Result<Value> {
    let output = git.commit(&message).await?;
    Ok(json!({ "message": "Commit created.", "output": output }))
}

pub async fn pull(git: &GitClient, remote: Option<String>, branch: Option<String>) -> Result<Value> {
    let remote = remote.unwrap_or_else(|| "origin".to_string());
    let output = git.pull(&remote, branch.as_deref()).await?;
    Ok(json!({ "message": "Pull completed.", "output": output }))
}

pub async fn push(git: &GitClient, remote: Option<String>, branch: Option<String>) -> Result<Value> {
    let remote = remote.unwrap_or_else(|| "origin".to_string());
    let output = git.push(&remote, branch.as_deref()).await?;
    Ok(json!({ "message": "Push completed.", "output": output }))
}

pub async fn log(git: &GitClient, count: Option<u32>) -> Result<Value> {
    let output = git.log(count.unwrap_or(10)).await?;
    Ok(json!({ "log": output }))
}
