//! The external analysis call: bundle text in, free-form reply out.
//!
//! The reply is handed to the codec untouched; interpreting it is not
//! the analyzer's job.

pub mod rig;

use async_trait::async_trait;
use thiserror::Error;

pub use self::rig::RigAnalyzer;

/// Errors from the analysis call.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("analyzer not configured: {0}")]
    NotConfigured(String),
}

/// Sends a prompt to a model and returns its reply text.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, prompt: &str) -> Result<String, AnalyzerError>;
}
