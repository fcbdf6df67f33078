//! Manual test-case status from a linked spreadsheet.
//!
//! A pull request opts in by linking a Google Sheet in its title or
//! description. The rows `A2:F` of the first sheet are read as
//! `(id, description, steps, expected, actual, status)`.

pub mod sheets;

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

use crate::models::{TestStatus, TestStatusReport};

pub use sheets::SheetsApiProvider;

static SHEET_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://docs\.google\.com/spreadsheets/d/([a-zA-Z0-9_-]+)(/edit[#?]\S*)?")
        .expect("valid regex")
});

static SHEET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([a-zA-Z0-9_-]+)").expect("valid regex"));

/// Errors from the test-status lookup.
#[derive(Error, Debug)]
pub enum TestStatusError {
    #[error("invalid sheet URL: {0}")]
    InvalidUrl(String),

    #[error("test status lookup not configured: {0}")]
    NotConfigured(String),

    #[error("sheets API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("sheets API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("no data found in sheet")]
    Empty,
}

/// Row source for a sheet id.
#[async_trait]
pub trait TestStatusProvider: Send + Sync {
    async fn rows(&self, sheet_id: &str) -> Result<Vec<Vec<String>>, TestStatusError>;
}

/// Used when no sheets credentials are configured: every lookup fails
/// with a message that ends up in the bundle.
#[derive(Debug, Default)]
pub struct UnconfiguredProvider;

#[async_trait]
impl TestStatusProvider for UnconfiguredProvider {
    async fn rows(&self, _sheet_id: &str) -> Result<Vec<Vec<String>>, TestStatusError> {
        Err(TestStatusError::NotConfigured(format!(
            "set {} to read linked test sheets",
            crate::constants::ENV_SHEETS_API_KEY
        )))
    }
}

/// First Google Sheets URL in `text`.
pub fn extract_sheet_url(text: &str) -> Option<&str> {
    SHEET_URL_RE.find(text).map(|m| m.as_str())
}

/// The document id inside a sheet URL.
pub fn sheet_id(url: &str) -> Option<&str> {
    SHEET_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Look up the test status linked from `text` (PR title + description).
///
/// Never fails: a missing link is [`TestStatus::NoSheet`], and lookup
/// errors are logged and carried as [`TestStatus::Failed`].
pub async fn lookup(provider: &dyn TestStatusProvider, text: &str) -> TestStatus {
    let Some(url) = extract_sheet_url(text) else {
        return TestStatus::NoSheet;
    };

    match fetch_report(provider, url).await {
        Ok(report) => {
            tracing::info!(sheet = %report.sheet_id, cases = report.total, "loaded test cases");
            TestStatus::Fetched(report)
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "failed to fetch test cases");
            TestStatus::Failed(e.to_string())
        }
    }
}

async fn fetch_report(
    provider: &dyn TestStatusProvider,
    url: &str,
) -> Result<TestStatusReport, TestStatusError> {
    let id = sheet_id(url).ok_or_else(|| TestStatusError::InvalidUrl(url.to_string()))?;
    let rows = provider.rows(id).await?;
    if rows.is_empty() {
        return Err(TestStatusError::Empty);
    }
    Ok(TestStatusReport::from_rows(url, id, &rows))
}
