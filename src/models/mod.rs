//! Shared types used across all modules.
//!
//! This module defines the records the pipeline produces and passes
//! along: webhook events, changed files, definitions, architecture
//! snapshots, summaries, commit history, test status and review
//! comments. Other modules import from here rather than reaching into
//! each other's internals.

pub mod architecture;
pub mod change;
pub mod comment;
pub mod definition;
pub mod event;
pub mod history;
pub mod test_status;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use architecture::{ArchitectureSnapshot, LanguageStat};
pub use change::{ChangeSummary, ChangedFile, DiffStats, ImpactFlags};
pub use comment::ReviewComment;
pub use definition::{DefinitionKind, DefinitionRecord};
pub use event::{PullRequestEvent, ReviewGate};
pub use history::{CommitInfo, FileHistory};
pub use test_status::{TestCase, TestStatus, TestStatusReport};

/// Supported LLM provider backends for the analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    #[default]
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    Gemini,
    Groq,
    /// Any OpenAI-compatible API (Azure deployments behind a proxy, Ollama, local servers).
    #[serde(rename = "openai-compatible")]
    OpenAICompatible,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderName::Anthropic => write!(f, "anthropic"),
            ProviderName::OpenAI => write!(f, "openai"),
            ProviderName::Gemini => write!(f, "gemini"),
            ProviderName::Groq => write!(f, "groq"),
            ProviderName::OpenAICompatible => write!(f, "openai-compatible"),
        }
    }
}

impl std::str::FromStr for ProviderName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(ProviderName::Anthropic),
            "openai" => Ok(ProviderName::OpenAI),
            "gemini" => Ok(ProviderName::Gemini),
            "groq" => Ok(ProviderName::Groq),
            "openai-compatible" => Ok(ProviderName::OpenAICompatible),
            other => Err(format!(
                "unsupported provider: '{other}'. Supported: anthropic, openai, gemini, \
                 groq, openai-compatible"
            )),
        }
    }
}

impl ProviderName {
    /// Provider-specific environment variable holding the API key.
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            ProviderName::Anthropic => "ANTHROPIC_API_KEY",
            ProviderName::OpenAI | ProviderName::OpenAICompatible => "OPENAI_API_KEY",
            ProviderName::Gemini => "GEMINI_API_KEY",
            ProviderName::Groq => "GROQ_API_KEY",
        }
    }
}
