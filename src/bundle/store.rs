//! Bundle persistence.
//!
//! Each run writes one text file named after the repository, both
//! branches and the local time. The path returned by [`BundleStore::write`]
//! is the one to read back.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("failed to create bundle directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write bundle {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read bundle {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Replace characters that are unsafe in file names with `_`.
pub fn sanitize(component: &str) -> String {
    component.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|', ' '], "_")
}

/// `<repo>_<source>_to_<target>_<YYYY-mm-dd_HH-MM-SS>.txt`
pub fn file_name(full_name: &str, source: &str, target: &str, at: NaiveDateTime) -> String {
    format!(
        "{}_{}_to_{}_{}.txt",
        sanitize(full_name),
        sanitize(source),
        sanitize(target),
        at.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Directory that bundles are written to.
#[derive(Debug, Clone)]
pub struct BundleStore {
    dir: PathBuf,
}

impl BundleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `content` and return the file's path. Creates the directory
    /// if needed.
    pub async fn write(
        &self,
        full_name: &str,
        source_branch: &str,
        target_branch: &str,
        at: NaiveDateTime,
        content: &str,
    ) -> Result<PathBuf, BundleError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| BundleError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;

        let path = self
            .dir
            .join(file_name(full_name, source_branch, target_branch, at));
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| BundleError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    pub async fn read(&self, path: &Path) -> Result<String, BundleError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| BundleError::Read {
                path: path.to_path_buf(),
                source,
            })
    }
}
