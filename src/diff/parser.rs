//! Line classifier for unified diffs.
//!
//! Hunk bodies are delimited by the line counts in their `@@` headers, so
//! a content line such as `--- SQL comment` inside a hunk is never taken
//! for a file header. Hunk text itself is not retained; the bundle embeds
//! the raw diff verbatim.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::DiffStats;

static HUNK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -\d+(?:,(\d+))? \+\d+(?:,(\d+))? @@").expect("valid regex")
});

#[derive(Debug, PartialEq, Eq)]
enum DiffLine<'a> {
    /// `diff --git a/x b/y`, carrying the text after the command.
    Section(&'a str),
    /// `--- a/x` outside a hunk.
    OldFile(&'a str),
    /// `+++ b/x` outside a hunk.
    NewFile(&'a str),
    Added,
    Removed,
    Other,
}

/// Walks a diff remembering how many old and new lines the current hunk
/// still owes.
struct Classifier<'a> {
    lines: std::str::Lines<'a>,
    old_left: usize,
    new_left: usize,
}

impl<'a> Classifier<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines(),
            old_left: 0,
            new_left: 0,
        }
    }

    fn in_hunk(&self) -> bool {
        self.old_left > 0 || self.new_left > 0
    }

    fn classify(&mut self, line: &'a str) -> DiffLine<'a> {
        if self.in_hunk() {
            match line.as_bytes().first() {
                Some(b'+') => {
                    self.new_left = self.new_left.saturating_sub(1);
                    return DiffLine::Added;
                }
                Some(b'-') => {
                    self.old_left = self.old_left.saturating_sub(1);
                    return DiffLine::Removed;
                }
                Some(b' ') | None => {
                    self.old_left = self.old_left.saturating_sub(1);
                    self.new_left = self.new_left.saturating_sub(1);
                    return DiffLine::Other;
                }
                Some(b'\\') => return DiffLine::Other,
                // Hunk ended short of its header counts.
                Some(_) => {
                    self.old_left = 0;
                    self.new_left = 0;
                }
            }
        }

        if let Some(rest) = line.strip_prefix("diff --git ") {
            DiffLine::Section(rest)
        } else if let Some(path) = line.strip_prefix("--- ") {
            DiffLine::OldFile(path)
        } else if let Some(path) = line.strip_prefix("+++ ") {
            DiffLine::NewFile(path)
        } else if line.starts_with("@@") {
            let (old, new) = hunk_counts(line);
            self.old_left = old;
            self.new_left = new;
            DiffLine::Other
        } else {
            DiffLine::Other
        }
    }
}

impl<'a> Iterator for Classifier<'a> {
    type Item = DiffLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        Some(self.classify(line))
    }
}

/// Old and new line counts of a hunk header. An omitted count means one;
/// an unreadable header keeps the hunk open until a non-hunk line.
fn hunk_counts(header: &str) -> (usize, usize) {
    let Some(caps) = HUNK_RE.captures(header) else {
        return (usize::MAX, usize::MAX);
    };
    let count = |i: usize| {
        caps.get(i)
            .map_or(Some(1), |m| m.as_str().parse().ok())
            .unwrap_or(usize::MAX)
    };
    (count(1), count(2))
}

/// `a/x` or `b/x` from a `---`/`+++` line. `None` for `/dev/null`.
fn file_path(field: &str) -> Option<&str> {
    let field = field.split('\t').next().unwrap_or(field).trim_end();
    if field == "/dev/null" || field.is_empty() {
        return None;
    }
    Some(
        field
            .strip_prefix("a/")
            .or_else(|| field.strip_prefix("b/"))
            .unwrap_or(field),
    )
}

/// New-side path of a `diff --git` line, used when the section has no
/// `---`/`+++` lines (binary files, pure renames, mode changes).
fn section_path(rest: &str) -> Option<&str> {
    rest.rfind(" b/")
        .map(|at| &rest[at + 3..])
        .filter(|path| !path.is_empty())
}

#[derive(Default)]
struct Section<'a> {
    header: Option<&'a str>,
    old: Option<&'a str>,
    new: Option<&'a str>,
}

impl<'a> Section<'a> {
    /// The new path, or the old one for deletions.
    fn path(&self) -> Option<&'a str> {
        self.new.or(self.old).or(self.header)
    }
}

/// Paths touched by the diff, in diff order and without duplicates.
pub fn changed_paths(input: &str) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    let mut push = |section: Option<Section<'_>>| {
        if let Some(path) = section.as_ref().and_then(Section::path) {
            if !paths.iter().any(|p| p == path) {
                paths.push(path.to_string());
            }
        }
    };

    let mut current: Option<Section<'_>> = None;
    for line in Classifier::new(input) {
        match line {
            DiffLine::Section(rest) => {
                push(current.take());
                current = Some(Section {
                    header: section_path(rest),
                    ..Section::default()
                });
            }
            DiffLine::OldFile(field) => {
                if let Some(section) = current.as_mut() {
                    section.old = file_path(field);
                }
            }
            DiffLine::NewFile(field) => {
                if let Some(section) = current.as_mut() {
                    section.new = file_path(field);
                }
            }
            DiffLine::Added | DiffLine::Removed | DiffLine::Other => {}
        }
    }
    push(current);
    paths
}

/// Count added and removed lines inside hunks.
///
/// Works on raw text so a diff without `diff --git` headers still counts.
pub fn diff_stats(input: &str) -> DiffStats {
    let mut stats = DiffStats::default();
    for line in Classifier::new(input) {
        match line {
            DiffLine::Added => stats.added += 1,
            DiffLine::Removed => stats.removed += 1,
            _ => {}
        }
    }
    stats
}
