//! Shared mocks for integration tests.
//!
//! `FixtureScm` stands in for git: cloning copies `tests/fixtures/payments`
//! into the destination, and every other operation answers from canned
//! data. The remaining mocks record what the pipeline hands them.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use prweave::analyzer::{Analyzer, AnalyzerError};
use prweave::config::Config;
use prweave::git::{GitError, SourceControl};
use prweave::models::{CommitInfo, PullRequestEvent, ReviewComment};
use prweave::publish::{CommentPoster, PublishError};
use prweave::test_status::{TestStatusError, TestStatusProvider};

pub fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn retry_diff() -> String {
    std::fs::read_to_string(fixtures().join("retry.diff")).unwrap()
}

/// Content of `retry/retry.go` before the change.
pub const PRIOR_RETRY_GO: &str = "package retry\n\ntype Policy struct {\n\tAttempts int\n\tDelay    time.Duration\n}\n";

pub fn copy_tree(from: &Path, to: &Path) {
    for entry in walkdir::WalkDir::new(from) {
        let entry = entry.unwrap();
        let rel = entry.path().strip_prefix(from).unwrap();
        let target = to.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).unwrap();
        } else {
            std::fs::copy(entry.path(), &target).unwrap();
        }
    }
}

/// Git stand-in backed by the payments fixture.
pub struct FixtureScm {
    pub diff: String,
    pub fail_clone: bool,
    pub fail_changed_paths: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FixtureScm {
    pub fn new(diff: impl Into<String>) -> Self {
        Self {
            diff: diff.into(),
            fail_clone: false,
            fail_changed_paths: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_clone() -> Self {
        Self {
            fail_clone: true,
            ..Self::new(String::new())
        }
    }

    /// Diffs fine but cannot list the changed files.
    pub fn failing_changed_paths(diff: impl Into<String>) -> Self {
        Self {
            fail_changed_paths: true,
            ..Self::new(diff)
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceControl for FixtureScm {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitError> {
        self.record(format!("clone {url}"));
        if self.fail_clone {
            return Err(GitError::CommandFailed {
                command: "clone".into(),
                status: "exit status: 128".into(),
                stderr: "fatal: repository not found".into(),
            });
        }
        copy_tree(&fixtures().join("payments"), dest);
        Ok(())
    }

    async fn fetch(&self, _repo: &Path, branch: &str) -> Result<(), GitError> {
        self.record(format!("fetch {branch}"));
        Ok(())
    }

    async fn pull(&self, _repo: &Path) -> Result<(), GitError> {
        self.record("pull".to_string());
        Ok(())
    }

    async fn checkout_detached(&self, _repo: &Path, rev: &str) -> Result<(), GitError> {
        self.record(format!("checkout {rev}"));
        Ok(())
    }

    async fn diff(&self, _repo: &Path, from: &str, to: &str) -> Result<String, GitError> {
        self.record(format!("diff {from}..{to}"));
        Ok(self.diff.clone())
    }

    async fn changed_paths(&self, _repo: &Path, _from: &str, _to: &str) -> Result<Vec<String>, GitError> {
        if self.fail_changed_paths {
            return Err(GitError::CommandFailed {
                command: "diff --name-only".into(),
                status: "exit status: 129".into(),
                stderr: "error: unknown option".into(),
            });
        }
        Ok(prweave::diff::changed_paths(&self.diff))
    }

    async fn show_file(&self, _repo: &Path, _rev: &str, path: &str) -> Result<String, GitError> {
        if path == "retry/retry.go" {
            Ok(PRIOR_RETRY_GO.to_string())
        } else {
            Err(GitError::CommandFailed {
                command: "show".into(),
                status: "exit status: 128".into(),
                stderr: format!("fatal: path '{path}' does not exist"),
            })
        }
    }

    async fn log_for_file(&self, _repo: &Path, _path: &str, _limit: usize) -> Result<Vec<CommitInfo>, GitError> {
        Ok(vec![CommitInfo {
            hash: "a4c2f0d".into(),
            author: "Dana Ortiz".into(),
            date: "2024-04-30".into(),
            subject: "Add retry policy".into(),
            files_changed: Vec::new(),
        }])
    }

    async fn files_in_commit(&self, _repo: &Path, _hash: &str) -> Result<Vec<String>, GitError> {
        Ok(vec!["retry/retry.go".into(), "retry/retry_test.go".into()])
    }
}

/// Analyzer returning a fixed reply and keeping the prompts it saw.
pub struct CannedAnalyzer {
    reply: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl CannedAnalyzer {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Analyzer for CannedAnalyzer {
    async fn analyze(&self, prompt: &str) -> Result<String, AnalyzerError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(AnalyzerError::ApiError)
    }
}

/// Poster recording every comment; texts containing "reject" fail.
#[derive(Default)]
pub struct RecordingPoster {
    pub posted: Mutex<Vec<(String, u64, ReviewComment)>>,
}

impl RecordingPoster {
    pub fn comments(&self) -> Vec<ReviewComment> {
        self.posted.lock().unwrap().iter().map(|(_, _, c)| c.clone()).collect()
    }
}

#[async_trait]
impl CommentPoster for RecordingPoster {
    async fn post(&self, full_name: &str, pr_id: u64, comment: &ReviewComment) -> Result<(), PublishError> {
        self.posted
            .lock()
            .unwrap()
            .push((full_name.to_string(), pr_id, comment.clone()));
        if comment.text().contains("reject") {
            return Err(PublishError::Api {
                status: 400,
                body: "rejected".into(),
            });
        }
        Ok(())
    }
}

/// Sheet provider returning fixed rows.
pub struct FixedSheet(pub Vec<Vec<String>>);

#[async_trait]
impl TestStatusProvider for FixedSheet {
    async fn rows(&self, _sheet_id: &str) -> Result<Vec<Vec<String>>, TestStatusError> {
        Ok(self.0.clone())
    }
}

pub fn sheet_rows() -> Vec<Vec<String>> {
    [
        ["TC-1", "Retry on timeout", "Call pay\nDrop network", "Retried", "Retried", "Pass"],
        ["TC-2", "Give up after 3", "Call pay", "Error", "Error", "Fail"],
    ]
    .iter()
    .map(|row| row.iter().map(|c| c.to_string()).collect())
    .collect()
}

/// Config rooted in `dir` (repos and bundles both live under it).
pub fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.workspace.repos_dir = dir.join("repos");
    config.workspace.output_dir = dir.join("diffs");
    config
}

pub fn event_json(reviewers: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "pullrequest": {
            "id": 42,
            "title": "Add jitter to retry policy",
            "description": "QA sheet: https://docs.google.com/spreadsheets/d/1QaSheet_x/edit#gid=0",
            "source": {"branch": {"name": "feature/jitter"}},
            "destination": {"branch": {"name": "main"}},
            "reviewers": reviewers
        },
        "repository": {"full_name": "acme/payments"}
    })
}

pub fn event() -> PullRequestEvent {
    serde_json::from_value(event_json(serde_json::json!([
        {"display_name": "ExoReview", "uuid": "{bot}"}
    ])))
    .unwrap()
}
