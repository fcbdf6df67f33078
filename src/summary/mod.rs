//! Change summary: file-type synopsis, changed-file bullets, impact flags
//! and diff line counts.

use std::collections::BTreeMap;

use crate::diff::diff_stats;
use crate::models::{ChangeSummary, ImpactFlags};
use crate::walk;

/// Fallback sentence when no files changed.
pub const EMPTY_SYNOPSIS: &str = "This PR includes changes to configuration or documentation.";

/// Summarize a change set. Pure: reads nothing but its arguments.
pub fn summarize(paths: &[String], diff: &str) -> ChangeSummary {
    ChangeSummary {
        synopsis: synopsis(paths),
        file_bullets: paths.iter().map(|p| format!("- {p}")).collect(),
        impact: impact(paths),
        stats: diff_stats(diff),
    }
}

/// `This PR includes changes to 2 go files, 1 md files and 1 yaml files.`
fn synopsis(paths: &[String]) -> String {
    let mut histogram: BTreeMap<&str, usize> = BTreeMap::new();
    for path in paths {
        let ext = match walk::extension(path) {
            "" => "other",
            ext => ext,
        };
        *histogram.entry(ext).or_default() += 1;
    }
    if histogram.is_empty() {
        return EMPTY_SYNOPSIS.to_string();
    }

    let parts: Vec<String> = histogram
        .iter()
        .map(|(ext, count)| format!("{count} {ext} files"))
        .collect();
    let listed = match parts.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
        _ => parts.join(""),
    };
    format!("This PR includes changes to {listed}.")
}

/// Each path raises at most one flag: tests, then config, then docs, then core.
fn impact(paths: &[String]) -> ImpactFlags {
    let mut flags = ImpactFlags::default();
    for path in paths {
        if path.contains("_test.") {
            flags.tests = true;
        } else if path.contains("config") {
            flags.config = true;
        } else if path.contains("docs") || path.ends_with(".md") {
            flags.docs = true;
        } else if [".go", ".js", ".py"].iter().any(|ext| path.ends_with(ext)) {
            flags.core = true;
        }
    }
    flags
}

/// `### Impact Assessment` block listing the raised flags in fixed order.
pub fn render_impact(flags: &ImpactFlags) -> String {
    let mut out = String::from("### Impact Assessment\n");
    let lines = [
        (flags.core, "- 🔄 Core functionality changes\n"),
        (flags.config, "- ⚙️ Configuration changes\n"),
        (flags.tests, "- ✅ Test coverage changes\n"),
        (flags.docs, "- 📚 Documentation updates\n"),
    ];
    for (raised, line) in lines {
        if raised {
            out.push_str(line);
        }
    }
    out
}
