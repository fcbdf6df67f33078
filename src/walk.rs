//! Working-tree traversal shared by the locator and the profiler.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

/// Directories never descended into.
pub const SKIPPED_DIRS: &[&str] = &[".git", "vendor", "node_modules"];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Regular files under `root`, in a stable order (sorted by file name at
/// every level).
///
/// Unreadable entries below the root are skipped. The root itself must
/// be walkable, otherwise the first error is returned.
pub fn files(root: &Path) -> Result<Vec<DirEntry>, walkdir::Error> {
    let mut walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));

    // The root entry decides whether the tree can be walked at all.
    match walker.next() {
        Some(Err(err)) => return Err(err),
        Some(Ok(_)) | None => {}
    }

    Ok(walker
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .collect())
}

/// `path` relative to `root`, with `/` separators.
pub fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Extension of `path` without the dot, empty when there is none.
pub fn extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx + 1..],
        _ => "",
    }
}
