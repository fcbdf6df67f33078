//! `git` CLI implementation of [`SourceControl`].
//!
//! Shells out to `git` via `tokio::process::Command`.

use std::path::Path;

use async_trait::async_trait;

use super::log::{LOG_FORMAT, parse_log, parse_name_list};
use super::{GitError, SourceControl};
use crate::models::CommitInfo;

/// Runs the system `git` binary.
#[derive(Debug, Clone, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, dir: Option<&Path>, args: &[&str]) -> Result<String, GitError> {
        let mut cmd = tokio::process::Command::new("git");
        cmd.args(args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        // Never block on a credential prompt inside the server.
        cmd.env("GIT_TERMINAL_PROMPT", "0");

        let output = cmd.output().await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: redact_args(args),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8(output.stdout)?)
    }
}

/// Render arguments for error messages with URL credentials removed.
fn redact_args(args: &[&str]) -> String {
    args.iter()
        .map(|arg| match (arg.find("://"), arg.find('@')) {
            (Some(scheme), Some(at)) if at > scheme => {
                format!("{}://***@{}", &arg[..scheme], &arg[at + 1..])
            }
            _ => (*arg).to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl SourceControl for GitCli {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitError> {
        let dest = dest.to_string_lossy();
        self.run(None, &["clone", url, dest.as_ref()]).await.map(|_| ())
    }

    async fn fetch(&self, repo: &Path, branch: &str) -> Result<(), GitError> {
        self.run(Some(repo), &["fetch", "origin", branch])
            .await
            .map(|_| ())
    }

    async fn pull(&self, repo: &Path) -> Result<(), GitError> {
        self.run(Some(repo), &["fetch", "--all", "--prune"])
            .await
            .map(|_| ())
    }

    async fn checkout_detached(&self, repo: &Path, rev: &str) -> Result<(), GitError> {
        self.run(Some(repo), &["checkout", "--force", "--detach", rev])
            .await
            .map(|_| ())
    }

    async fn diff(&self, repo: &Path, from: &str, to: &str) -> Result<String, GitError> {
        self.run(
            Some(repo),
            &[
                "diff",
                "--full-index",
                "--no-color",
                "--src-prefix=a/",
                "--dst-prefix=b/",
                from,
                to,
            ],
        )
        .await
    }

    async fn changed_paths(
        &self,
        repo: &Path,
        from: &str,
        to: &str,
    ) -> Result<Vec<String>, GitError> {
        let out = self.run(Some(repo), &["diff", "--name-only", from, to]).await?;
        Ok(parse_name_list(&out))
    }

    async fn show_file(&self, repo: &Path, rev: &str, path: &str) -> Result<String, GitError> {
        let spec = format!("{rev}:{path}");
        self.run(Some(repo), &["show", spec.as_str()]).await
    }

    async fn log_for_file(
        &self,
        repo: &Path,
        path: &str,
        limit: usize,
    ) -> Result<Vec<CommitInfo>, GitError> {
        let limit = limit.to_string();
        let out = self
            .run(
                Some(repo),
                &["log", "-n", limit.as_str(), LOG_FORMAT, "--date=short", "--", path],
            )
            .await?;
        Ok(parse_log(&out))
    }

    async fn files_in_commit(&self, repo: &Path, hash: &str) -> Result<Vec<String>, GitError> {
        let out = self
            .run(Some(repo), &["show", "--name-only", "--pretty=format:", hash])
            .await?;
        Ok(parse_name_list(&out))
    }
}
