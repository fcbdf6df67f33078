//! Source control operations behind a trait.
//!
//! The pipeline never shells out directly; it goes through
//! [`SourceControl`], which has one production implementation
//! ([`GitCli`]) and is mocked in tests.

pub mod checkout;
pub mod cli;
pub mod log;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::CommitInfo;

pub use checkout::{RepoLocks, checkout_dir, clone_url, prepare_checkout};
pub use cli::GitCli;

/// Errors from source control operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("git {command} failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("git output is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// The git operations the pipeline relies on.
///
/// Every operation takes the repository working directory explicitly;
/// implementations hold no per-repository state.
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Clone `url` into `dest`.
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitError>;

    /// Fetch one branch from `origin`.
    async fn fetch(&self, repo: &Path, branch: &str) -> Result<(), GitError>;

    /// Fetch all remotes and prune deleted branches.
    async fn pull(&self, repo: &Path) -> Result<(), GitError>;

    /// Detach the working tree onto `rev`, discarding local changes.
    async fn checkout_detached(&self, repo: &Path, rev: &str) -> Result<(), GitError>;

    /// Unified diff between two revisions.
    async fn diff(&self, repo: &Path, from: &str, to: &str) -> Result<String, GitError>;

    /// Paths changed between two revisions.
    async fn changed_paths(&self, repo: &Path, from: &str, to: &str)
    -> Result<Vec<String>, GitError>;

    /// Content of `path` at `rev`.
    async fn show_file(&self, repo: &Path, rev: &str, path: &str) -> Result<String, GitError>;

    /// Most recent commits touching `path`, newest first.
    async fn log_for_file(
        &self,
        repo: &Path,
        path: &str,
        limit: usize,
    ) -> Result<Vec<CommitInfo>, GitError>;

    /// Paths touched by a single commit.
    async fn files_in_commit(&self, repo: &Path, hash: &str) -> Result<Vec<String>, GitError>;
}
