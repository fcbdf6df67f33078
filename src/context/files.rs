//! File reading helpers for the gatherer: test pairing and truncation.

use std::path::Path;

use crate::walk;

/// Extensions whose tests sit next to them as `x.test.<ext>` / `x.spec.<ext>`.
const JS_LIKE: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Whether `path` is itself a test file under the conventions below.
pub fn is_test_path(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.contains("_test.")
        || name.contains(".test.")
        || name.contains(".spec.")
        || (name.starts_with("test_") && name.ends_with(".py"))
}

/// Candidate test files for a source path, in preference order.
///
/// `x.go → x_test.go`, `x.ts → x.test.ts, x.spec.ts` (also js/tsx/jsx),
/// `x.py → test_x.py`. Other languages have no convention.
pub fn paired_test_paths(path: &str) -> Vec<String> {
    if is_test_path(path) {
        return Vec::new();
    }
    let (dir, name) = match path.rsplit_once('/') {
        Some((dir, name)) => (format!("{dir}/"), name),
        None => (String::new(), path),
    };
    let ext = walk::extension(name);
    let stem = name.strip_suffix(&format!(".{ext}")).unwrap_or(name);

    match ext {
        "go" => vec![format!("{dir}{stem}_test.go")],
        "py" => vec![format!("{dir}test_{stem}.py")],
        e if JS_LIKE.contains(&e) => vec![
            format!("{dir}{stem}.test.{e}"),
            format!("{dir}{stem}.spec.{e}"),
        ],
        _ => Vec::new(),
    }
}

/// Read a working-tree file. A missing file is `Ok(None)`.
pub async fn read_working_file(root: &Path, rel: &str) -> std::io::Result<Option<String>> {
    match tokio::fs::read_to_string(root.join(rel)).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Keep the first `max_lines` lines and mark how many were dropped.
///
/// `max_lines == 0` disables truncation.
pub fn truncate_lines(content: &str, max_lines: usize) -> String {
    if max_lines == 0 {
        return content.to_string();
    }
    let total = content.lines().count();
    if total <= max_lines {
        return content.to_string();
    }
    let mut kept: String = content
        .lines()
        .take(max_lines)
        .flat_map(|line| [line, "\n"])
        .collect();
    kept.push_str(&format!("[... {} lines omitted ...]\n", total - max_lines));
    kept
}
