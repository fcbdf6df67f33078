//! Manual test-case status attached to a pull request.

use serde::{Deserialize, Serialize};

/// Number of columns a row needs to be read as a test case.
const CASE_COLUMNS: usize = 6;

/// One row of the external test-case sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub description: String,
    pub steps: Vec<String>,
    pub expected: String,
    pub actual: String,
    pub status: String,
}

impl TestCase {
    /// Build a case from a `(id, description, steps, expected, actual, status)` row.
    ///
    /// Rows with fewer columns are rejected. Steps are newline-separated
    /// within their cell.
    pub fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < CASE_COLUMNS {
            return None;
        }
        Some(Self {
            id: row[0].clone(),
            description: row[1].clone(),
            steps: row[2].split('\n').map(str::to_string).collect(),
            expected: row[3].clone(),
            actual: row[4].clone(),
            status: row[5].clone(),
        })
    }
}

/// Test cases read from a sheet plus their pass/fail tally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStatusReport {
    pub sheet_url: String,
    pub sheet_id: String,
    pub cases: Vec<TestCase>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
}

impl TestStatusReport {
    /// Tally rows into a report. Short rows are skipped; any status other
    /// than pass/fail counts as pending.
    pub fn from_rows(sheet_url: &str, sheet_id: &str, rows: &[Vec<String>]) -> Self {
        let mut report = TestStatusReport {
            sheet_url: sheet_url.to_string(),
            sheet_id: sheet_id.to_string(),
            ..Default::default()
        };
        for case in rows.iter().filter_map(|r| TestCase::from_row(r)) {
            report.total += 1;
            match case.status.to_lowercase().as_str() {
                "pass" | "passed" => report.passed += 1,
                "fail" | "failed" => report.failed += 1,
                _ => report.pending += 1,
            }
            report.cases.push(case);
        }
        report
    }

    /// Share of `count` in the total, as a percentage.
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }
}

/// What the test-case lookup produced for one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestStatus {
    /// Neither the title nor the description links a sheet.
    NoSheet,
    Fetched(TestStatusReport),
    /// The sheet was linked but could not be read.
    Failed(String),
}
