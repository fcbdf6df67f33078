//! Changed files and the summary derived from them.

use serde::{Deserialize, Serialize};

/// A file touched by the pull request, with the content around the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Path relative to the repository root.
    pub path: String,
    /// Working-tree content; empty when the file no longer exists.
    pub content: String,
    /// Content at the base revision. `None` means the file is new.
    pub previous_content: Option<String>,
    /// Conventionally paired test file, when one exists.
    pub test_path: Option<String>,
    pub test_content: Option<String>,
    /// Extension without the leading dot (`go`, `py`, ...), empty if none.
    pub language: String,
}

impl ChangedFile {
    pub fn is_new(&self) -> bool {
        self.previous_content.is_none()
    }

    /// A file with prior content but nothing on disk was deleted by the change.
    pub fn is_deleted(&self) -> bool {
        self.previous_content.is_some() && self.content.is_empty()
    }
}

/// Which areas of the codebase a change touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactFlags {
    pub core: bool,
    pub config: bool,
    pub tests: bool,
    pub docs: bool,
}

/// Added/removed line counts over the whole diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

/// Human-readable description of a change set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// One sentence naming the file-type counts.
    pub synopsis: String,
    /// `- path` bullet per changed file, in input order.
    pub file_bullets: Vec<String>,
    pub impact: ImpactFlags,
    pub stats: DiffStats,
}
