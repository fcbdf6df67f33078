//! File context gathering for changed paths.
//!
//! For every changed path the gatherer collects the working-tree
//! content, the content at the base revision and, when one exists, the
//! conventionally paired test file. A failure on one file is logged and
//! that file is left out; the pass itself never fails.

pub mod files;

use std::path::Path;

use indexmap::IndexMap;

use crate::git::SourceControl;
use crate::models::ChangedFile;
use crate::walk;

pub use files::{is_test_path, paired_test_paths, truncate_lines};

/// Gather context for `paths`, keyed by path in input order.
///
/// `base_ref` is the revision the prior content is read from. Contents
/// longer than `max_file_lines` are truncated (0 keeps everything).
pub async fn gather(
    scm: &dyn SourceControl,
    repo_root: &Path,
    paths: &[String],
    base_ref: &str,
    max_file_lines: usize,
) -> IndexMap<String, ChangedFile> {
    let mut gathered = IndexMap::new();

    for path in paths {
        if path.is_empty() || gathered.contains_key(path) {
            continue;
        }

        let content = match files::read_working_file(repo_root, path).await {
            Ok(content) => content.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(file = %path, error = %e, "skipping unreadable changed file");
                continue;
            }
        };

        let previous_content = match scm.show_file(repo_root, base_ref, path).await {
            Ok(previous) => Some(truncate_lines(&previous, max_file_lines)),
            Err(e) => {
                tracing::debug!(file = %path, error = %e, "no prior content, treating as new");
                None
            }
        };

        let (test_path, test_content) = find_test_file(repo_root, path).await;

        gathered.insert(
            path.clone(),
            ChangedFile {
                path: path.clone(),
                content: truncate_lines(&content, max_file_lines),
                previous_content,
                test_path,
                test_content: test_content.map(|c| truncate_lines(&c, max_file_lines)),
                language: walk::extension(path).to_string(),
            },
        );
    }

    gathered
}

async fn find_test_file(repo_root: &Path, path: &str) -> (Option<String>, Option<String>) {
    for candidate in paired_test_paths(path) {
        match files::read_working_file(repo_root, &candidate).await {
            Ok(Some(content)) => return (Some(candidate), Some(content)),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(file = %candidate, error = %e, "skipping unreadable test file");
            }
        }
    }
    (None, None)
}
