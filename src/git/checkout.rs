//! Working-tree checkouts for reviewed repositories.
//!
//! Each repository is cloned once under the workspace directory and
//! refreshed on later events. Events for the same repository are
//! serialized through [`RepoLocks`] so two runs never race on one
//! working tree.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{GitError, SourceControl};

/// One async mutex per repository full name.
#[derive(Debug, Default)]
pub struct RepoLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl RepoLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding `full_name`, created on first use.
    ///
    /// Entries nobody else holds are dropped on each call, so the map only
    /// keeps repositories with a run in flight.
    pub fn lock_for(&self, full_name: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.retain(|name, lock| name == full_name || Arc::strong_count(lock) > 1);
        map.entry(full_name.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// Checkout directory for a repository: `/` and `.` in the full name become `_`.
pub fn checkout_dir(base: &Path, full_name: &str) -> PathBuf {
    base.join(full_name.replace(['/', '.'], "_"))
}

/// HTTPS clone URL with app-password credentials embedded.
pub fn clone_url(host: &str, username: &str, app_password: &str, full_name: &str) -> String {
    let host = host.trim_end_matches('/');
    match host.split_once("://") {
        Some((scheme, rest)) if !username.is_empty() => {
            format!("{scheme}://{username}:{app_password}@{rest}/{full_name}.git")
        }
        _ => format!("{host}/{full_name}.git"),
    }
}

/// Bring `dir` up to date and detach it onto `origin/<source>`.
///
/// Clones when the directory does not exist yet, otherwise refreshes
/// all remotes. Both branches are fetched so `origin/<destination>` is
/// available as the diff base.
pub async fn prepare_checkout(
    scm: &dyn SourceControl,
    url: &str,
    dir: &Path,
    source: &str,
    destination: &str,
) -> Result<(), GitError> {
    if dir.exists() {
        tracing::info!(dir = %dir.display(), "refreshing existing checkout");
        scm.pull(dir).await?;
    } else {
        tracing::info!(dir = %dir.display(), "cloning repository");
        if let Some(parent) = dir.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        scm.clone_repo(url, dir).await?;
    }

    for branch in [source, destination] {
        scm.fetch(dir, branch).await?;
    }
    scm.checkout_detached(dir, &format!("origin/{source}")).await
}
