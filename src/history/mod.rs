//! Recent commit history of changed files.

use std::path::Path;

use crate::git::SourceControl;
use crate::models::FileHistory;

/// Commits listed per changed file.
pub const DEFAULT_COMMITS_PER_FILE: usize = 5;

/// Collect up to `limit` recent commits for every path, with each
/// commit's file list.
///
/// A path whose log cannot be read is left out; a commit whose file
/// list cannot be read keeps an empty list.
pub async fn collect(
    scm: &dyn SourceControl,
    repo: &Path,
    paths: &[String],
    limit: usize,
) -> Vec<FileHistory> {
    let mut histories = Vec::with_capacity(paths.len());

    for path in paths {
        let mut commits = match scm.log_for_file(repo, path, limit).await {
            Ok(commits) => commits,
            Err(e) => {
                tracing::warn!(file = %path, error = %e, "skipping history for file");
                continue;
            }
        };

        for commit in &mut commits {
            match scm.files_in_commit(repo, &commit.hash).await {
                Ok(files) => commit.files_changed = files,
                Err(e) => {
                    tracing::warn!(commit = %commit.hash, error = %e, "commit file list unavailable");
                }
            }
        }

        histories.push(FileHistory {
            path: path.clone(),
            commits,
        });
    }

    histories
}
