// src/git.rs
// Local git operations via argument-vector process invocation

use crate::error::{RelayError, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

const LOG_FORMAT: &str = "%h - %s (%cr) <%an>";

/// Wraps the `git` binary. Arguments always travel as a vector, never as a
/// shell string, so file paths, branch names, and commit messages need no
/// escaping.
#[derive(Debug, Default)]
pub struct GitClient {
    workdir: Option<PathBuf>,
}

impl GitClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run against a repository other than the process working directory.
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(workdir.into()),
        }
    }

    pub async fn status(&self) -> Result<String> {
        self.run(status_args()).await
    }

    pub async fn add(&self, files: &[String]) -> Result<String> {
        self.run(add_args(files)).await
    }

    pub async fn commit(&self, message: &str) -> Result<String> {
        self.run(commit_args(message)).await
    }

    pub async fn pull(&self, remote: &str, branch: Option<&str>) -> Result<String> {
        self.run(pull_args(remote, branch)).await
    }

    pub async fn push(&self, remote: &str, branch: Option<&str>) -> Result<String> {
        self.run(push_args(remote, branch)).await
    }

    pub async fn log(&self, count: u32) -> Result<String> {
        self.run(log_args(count)).await
    }

    /// A non-empty stderr with a zero exit is not failure (git writes
    /// progress there); stdout is preferred, stderr returned when stdout is
    /// empty. Only a non-zero exit is an error.
    async fn run(&self, args: Vec<String>) -> Result<String> {
        let mut command = Command::new("git");
        command.args(&args).stdin(Stdio::null());
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }

        let output = command.output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(RelayError::LocalCommandFailed {
                command: format!("git {}", args.join(" ")),
                code: output.status.code(),
                message: if stderr.is_empty() { stdout } else { stderr },
            });
        }

        Ok(if stdout.is_empty() { stderr } else { stdout })
    }
}

fn status_args() -> Vec<String> {
    vec!["status".into(), "--porcelain".into()]
}

fn add_args(files: &[String]) -> Vec<String> {
    let mut args = vec!["add".to_string()];
    args.extend(files.iter().cloned());
    args
}

fn commit_args(message: &str) -> Vec<String> {
    vec!["commit".into(), "-m".into(), message.to_string()]
}

fn pull_args(remote: &str, branch: Option<&str>) -> Vec<String> {
    let mut args = vec!["pull".to_string(), remote.to_string()];
    if let Some(branch) = branch {
        args.push(branch.to_string());
    }
    args
}

fn push_args(remote: &str, branch: Option<&str>) -> Vec<String> {
    let mut args = vec!["push".to_string(), remote.to_string()];
    if let Some(branch) = branch {
        args.push(branch.to_string());
    }
    args
}

fn log_args(count: u32) -> Vec<String> {
    vec![
        "log".into(),
        "-n".into(),
        count.to_string(),
        format!("--pretty=format:{LOG_FORMAT}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_uses_porcelain() {
        assert_eq!(status_args(), vec!["status", "--porcelain"]);
    }

    #[test]
    fn test_add_keeps_each_path_as_one_argument() {
        let args = add_args(&["src/main.rs".to_string(), "path with spaces.txt".to_string()]);
        assert_eq!(args, vec!["add", "src/main.rs", "path with spaces.txt"]);
    }

    #[test]
    fn test_commit_message_with_quotes_stays_one_argument() {
        let args = commit_args(r#"say "hi" to the team"#);
        assert_eq!(args.len(), 3);
        assert_eq!(args[2], r#"say "hi" to the team"#);
    }

    #[test]
    fn test_pull_without_branch() {
        assert_eq!(pull_args("origin", None), vec!["pull", "origin"]);
    }

    #[test]
    fn test_push_with_branch() {
        assert_eq!(
            push_args("origin", Some("feature/x")),
            vec!["push", "origin", "feature/x"]
        );
    }

    #[test]
    fn test_log_format_is_a_single_argument() {
        let args = log_args(10);
        assert_eq!(args[..3], ["log", "-n", "10"]);
        assert_eq!(args[3], "--pretty=format:%h - %s (%cr) <%an>");
    }
}
