//! Repository language histogram.

use std::collections::HashMap;
use std::path::Path;

use super::ProfileError;
use crate::models::LanguageStat;
use crate::walk;

/// Language name for a lowercase file extension, if it is one we count.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    Some(match ext {
        "go" => "Go",
        "js" | "jsx" | "ts" | "tsx" => "JavaScript/TypeScript",
        "py" => "Python",
        "java" => "Java",
        "rb" => "Ruby",
        "php" => "PHP",
        "cs" => "C#",
        "cpp" | "cc" | "cxx" | "hpp" => "C++",
        "c" | "h" => "C",
        "rs" => "Rust",
        "swift" => "Swift",
        "kt" => "Kotlin",
        "scala" => "Scala",
        _ => return None,
    })
}

/// Count files per language, most common first (ties by name).
pub fn language_stats(root: &Path) -> Result<Vec<LanguageStat>, ProfileError> {
    let entries = walk::files(root).map_err(|source| ProfileError::Walk {
        path: root.to_path_buf(),
        source,
    })?;

    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for entry in &entries {
        let rel = walk::relative(root, entry.path());
        let ext = walk::extension(&rel).to_lowercase();
        if let Some(language) = language_for_extension(&ext) {
            *counts.entry(language).or_default() += 1;
        }
    }

    let mut stats: Vec<LanguageStat> = counts
        .into_iter()
        .map(|(language, count)| LanguageStat {
            language: language.to_string(),
            count,
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.language.cmp(&b.language)));
    Ok(stats)
}

/// `Go (12 files), Python (3 files)`.
pub fn format_language_stats(stats: &[LanguageStat]) -> String {
    stats
        .iter()
        .map(|s| format!("{} ({} files)", s.language, s.count))
        .collect::<Vec<_>>()
        .join(", ")
}
