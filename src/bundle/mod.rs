//! Review bundle assembly.
//!
//! A bundle is ten titled chunks in a fixed order, preceded by a short
//! guide and joined with [`CHUNK_SEPARATOR`]. Every chunk is always
//! present: missing inputs render a placeholder line instead of being
//! dropped, so consumers can rely on the chunk layout.
//!
//! The assembler only borrows what other stages produced (see
//! [`BundleInputs`]) and never mutates it.

pub mod chunks;
pub mod prompts;
pub mod store;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::constants::{CHUNK_MARKER, CHUNK_SEPARATOR};
use crate::models::{
    ArchitectureSnapshot, ChangeSummary, ChangedFile, DefinitionRecord, FileHistory,
    LanguageStat, PullRequestEvent, TestStatus,
};

pub use store::{BundleError, BundleStore};

/// The ten sections of a bundle, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ChunkKind {
    #[strum(serialize = "PR METADATA")]
    Metadata,
    #[strum(serialize = "PR DESCRIPTION")]
    Description,
    #[strum(serialize = "ARCHITECTURAL CONTEXT")]
    Architecture,
    #[strum(serialize = "COMMIT HISTORY")]
    History,
    #[strum(serialize = "TEST CASES")]
    TestCases,
    #[strum(serialize = "CODE CONTEXT")]
    CodeContext,
    #[strum(serialize = "GIT DIFF")]
    Diff,
    #[strum(serialize = "COMPLETE FILES")]
    CompleteFiles,
    #[strum(serialize = "REVIEW INSTRUCTIONS")]
    Instructions,
    #[strum(serialize = "REVIEW OUTPUT FORMAT")]
    OutputFormat,
}

impl ChunkKind {
    /// `### CHUNK: <NAME>`, the first line of the chunk.
    pub fn marker(self) -> String {
        format!("{CHUNK_MARKER}{self}")
    }

    /// Inverse of `Display`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.to_string() == name.trim())
    }

    /// One-line description used in the bundle guide.
    pub fn summary(self) -> &'static str {
        match self {
            ChunkKind::Metadata => {
                "Basic information about the pull request and repository languages"
            }
            ChunkKind::Description => "Detailed description of changes",
            ChunkKind::Architecture => "System architecture and dependencies",
            ChunkKind::History => "Recent changes to affected files",
            ChunkKind::TestCases => "Test cases and execution status",
            ChunkKind::CodeContext => "Related code definitions and dependencies",
            ChunkKind::Diff => "Actual changes made",
            ChunkKind::CompleteFiles => "Full content of changed files",
            ChunkKind::Instructions => "Guidelines for code review",
            ChunkKind::OutputFormat => "Expected format for review comments",
        }
    }
}

/// One rendered section. `body` starts with the marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub kind: ChunkKind,
    pub body: String,
}

/// Everything the assembler renders, borrowed from the stages that
/// produced it.
#[derive(Debug, Clone, Copy)]
pub struct BundleInputs<'a> {
    pub event: &'a PullRequestEvent,
    /// Web base used for the repository link, e.g. `https://bitbucket.org`.
    pub web_base: &'a str,
    pub generated_at: NaiveDateTime,
    /// `None` when the language histogram could not be computed.
    pub languages: Option<&'a [LanguageStat]>,
    pub changed_paths: &'a [String],
    pub summary: &'a ChangeSummary,
    /// `None` when the tree could not be profiled.
    pub architecture: Option<&'a ArchitectureSnapshot>,
    pub history: &'a [FileHistory],
    pub test_status: &'a TestStatus,
    pub definitions: &'a [DefinitionRecord],
    pub diff: &'a str,
    pub files: &'a IndexMap<String, ChangedFile>,
}

/// An assembled bundle. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    chunks: Vec<Chunk>,
}

impl Bundle {
    /// Render every chunk from `inputs`.
    pub fn assemble(inputs: &BundleInputs<'_>) -> Self {
        let chunks = ChunkKind::iter()
            .map(|kind| Chunk {
                kind,
                body: chunks::render(kind, inputs),
            })
            .collect();
        Self { chunks }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, kind: ChunkKind) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.kind == kind)
    }

    /// Guide followed by the chunks joined with the separator.
    pub fn render(&self) -> String {
        let mut out = guide();
        let bodies: Vec<&str> = self.chunks.iter().map(|c| c.body.as_str()).collect();
        out.push_str(&bodies.join(CHUNK_SEPARATOR));
        out
    }
}

/// Table of contents placed before the first chunk.
fn guide() -> String {
    let mut out = String::from(
        "# Code Review Chunks Guide\nThis file is organized into separate chunks for staged review:\n\n",
    );
    for (i, kind) in ChunkKind::iter().enumerate() {
        out.push_str(&format!("{}. {} - {}\n", i + 1, kind, kind.summary()));
    }
    out.push_str(&format!("\nEach chunk is separated by: {CHUNK_SEPARATOR}\n\n"));
    out
}

/// Split rendered bundle text back into chunks.
///
/// Pieces that do not start with a known marker (the guide) are
/// ignored. Chunks come back in file order.
pub fn split_bundle(text: &str) -> Vec<Chunk> {
    text.split(CHUNK_SEPARATOR)
        .filter_map(|piece| {
            let piece = piece.trim_start_matches(['\n', '\r']);
            let rest = piece.strip_prefix(CHUNK_MARKER)?;
            let name = rest.lines().next().unwrap_or_default();
            let kind = ChunkKind::from_name(name)?;
            Some(Chunk {
                kind,
                body: piece.to_string(),
            })
        })
        .collect()
}
