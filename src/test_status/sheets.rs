//! Google Sheets `values.get` client.

use async_trait::async_trait;
use serde::Deserialize;

use super::{TestStatusError, TestStatusProvider};

pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_RANGE: &str = "A2:F";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Reads rows with an API key (public or link-shared sheets).
pub struct SheetsApiProvider {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    range: String,
}

impl SheetsApiProvider {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
            range: range.into(),
        }
    }

    fn values_url(&self, sheet_id: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.api_base.trim_end_matches('/'),
            sheet_id,
            self.range
        )
    }
}

/// Cells come back as JSON strings, but numbers and booleans are
/// possible with unformatted render options.
fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl TestStatusProvider for SheetsApiProvider {
    async fn rows(&self, sheet_id: &str) -> Result<Vec<Vec<String>>, TestStatusError> {
        let response = self
            .http
            .get(self.values_url(sheet_id))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TestStatusError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let range: ValueRange = response.json().await?;
        Ok(range
            .values
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect())
    }
}
