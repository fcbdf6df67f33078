//! Commit history of changed files.

use serde::{Deserialize, Serialize};

/// One commit from `git log`, plus the files it touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub hash: String,
    pub author: String,
    /// Short ISO date (`YYYY-MM-DD`).
    pub date: String,
    pub subject: String,
    /// Empty when the file list could not be read.
    pub files_changed: Vec<String>,
}

/// Recent commits that touched one changed file, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHistory {
    pub path: String,
    pub commits: Vec<CommitInfo>,
}
