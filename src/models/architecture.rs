//! Repository-wide structure gathered by the profiler.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Import edges, HTTP routes and notable files of a working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureSnapshot {
    /// Every import path seen, de-duplicated.
    pub dependencies: IndexSet<String>,
    /// Source file → the import paths it declares.
    pub import_graph: IndexMap<String, Vec<String>>,
    /// Route strings passed to `Handle`/`HandleFunc` registrations.
    pub endpoints: Vec<String>,
    pub config_files: Vec<String>,
    pub schema_files: Vec<String>,
}

/// Number of files of one language in the working tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStat {
    pub language: String,
    pub count: usize,
}
