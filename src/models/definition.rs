//! Declarations located in the inspected repository.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Broad category of a located declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DefinitionKind {
    Type,
    Function,
    Variable,
    Other,
}

/// The full text of one declaration and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionRecord {
    pub kind: DefinitionKind,
    pub name: String,
    /// Path relative to the scanned root.
    pub file: String,
    /// Brace-balanced declaration text, starting at the declaration line.
    pub span: String,
    /// Other extracted identifiers mentioned inside the span.
    pub references: Vec<String>,
}
