//! Rendering of individual chunks.

use std::fmt::Write as _;

use super::prompts::{REVIEW_INSTRUCTIONS, REVIEW_OUTPUT_FORMAT};
use super::{BundleInputs, ChunkKind};
use crate::models::{
    ArchitectureSnapshot, ChangedFile, DefinitionKind, DefinitionRecord, FileHistory, TestStatus,
    TestStatusReport,
};
use crate::profile::format_language_stats;
use crate::summary::render_impact;
use crate::walk;

/// Render one chunk, marker line included.
pub fn render(kind: ChunkKind, inputs: &BundleInputs<'_>) -> String {
    let body = match kind {
        ChunkKind::Metadata => metadata(inputs),
        ChunkKind::Description => description(inputs),
        ChunkKind::Architecture => architecture(inputs.architecture),
        ChunkKind::History => history(inputs.history),
        ChunkKind::TestCases => test_cases(inputs.test_status),
        ChunkKind::CodeContext => code_context(inputs.definitions),
        ChunkKind::Diff => format!("# Changes Made\n```diff\n{}\n```", inputs.diff),
        ChunkKind::CompleteFiles => complete_files(inputs),
        ChunkKind::Instructions => REVIEW_INSTRUCTIONS.to_string(),
        ChunkKind::OutputFormat => REVIEW_OUTPUT_FORMAT.to_string(),
    };
    format!("{}\n{body}", kind.marker())
}

fn metadata(inputs: &BundleInputs<'_>) -> String {
    let pr = &inputs.event.pull_request;
    let full_name = inputs.event.full_name();

    let languages = match inputs.languages {
        Some(stats) if !stats.is_empty() => format_language_stats(stats),
        _ => "Unable to detect repository languages".to_string(),
    };

    let reviewers = if pr.reviewers.is_empty() {
        "No reviewers assigned\n".to_string()
    } else {
        pr.reviewers
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {}\n", i + 1, r.display_name))
            .collect()
    };

    format!(
        "# Pull Request Overview\n\
         - PR ID: {id}\n\
         - Title: {title}\n\
         - Repository: {full_name}\n\
         - Repository URL: {base}/{full_name}\n\
         - Source Branch: {source}\n\
         - Target Branch: {target}\n\
         - Created/Updated At: {at}\n\
         - Repository Languages: {languages}\n\
         \n\
         ## Reviewers\n\
         {reviewers}\n\
         ## Files Changed\n\
         Total files changed: {count}\n",
        id = pr.id,
        title = pr.title,
        base = inputs.web_base.trim_end_matches('/'),
        source = inputs.event.source_branch(),
        target = inputs.event.destination_branch(),
        at = inputs.generated_at.format("%Y-%m-%d %H:%M:%S"),
        count = inputs.changed_paths.len(),
    )
}

fn description(inputs: &BundleInputs<'_>) -> String {
    let summary = inputs.summary;
    let mut out = String::from("# Change Description\n## Description\n");
    out.push_str(&summary.synopsis);
    out.push_str("\n\n");

    let author_text = inputs.event.pull_request.description.trim();
    if !author_text.is_empty() {
        let _ = writeln!(out, "### Author's Description\n{author_text}\n");
    }

    out.push_str("### Changed Files\n");
    for bullet in &summary.file_bullets {
        out.push_str(bullet);
        out.push('\n');
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "### Diff Statistics\n- Lines added: {}\n- Lines removed: {}\n",
        summary.stats.added, summary.stats.removed
    );

    out.push_str(&render_impact(&summary.impact));
    out
}

fn bullet_section(out: &mut String, title: &str, items: impl IntoIterator<Item = impl AsRef<str>>) {
    let _ = writeln!(out, "## {title}");
    for item in items {
        let _ = writeln!(out, "- {}", item.as_ref());
    }
    out.push('\n');
}

fn architecture(snapshot: Option<&ArchitectureSnapshot>) -> String {
    let Some(snapshot) = snapshot else {
        return "Error gathering architectural context".to_string();
    };

    let mut out = String::from("# System Architecture Overview\n\n");
    bullet_section(&mut out, "Package Dependencies", &snapshot.dependencies);
    bullet_section(&mut out, "API Endpoints", &snapshot.endpoints);
    bullet_section(&mut out, "Configuration Files", &snapshot.config_files);
    if !snapshot.schema_files.is_empty() {
        bullet_section(&mut out, "Database Schema Files", &snapshot.schema_files);
    }
    out
}

fn history(histories: &[FileHistory]) -> String {
    if histories.iter().all(|h| h.commits.is_empty()) {
        return "# Recent Changes History\n\nNo commit history available\n".to_string();
    }

    let mut out = String::from("# Recent Changes History\n\n");
    for file in histories.iter().filter(|h| !h.commits.is_empty()) {
        let _ = writeln!(out, "## File: {}\nRecent commits:", file.path);
        for commit in &file.commits {
            let _ = writeln!(out, "* {} ({}) by {}", commit.subject, commit.date, commit.author);
            out.push_str("  Changed files:\n");
            for changed in &commit.files_changed {
                let _ = writeln!(out, "  - {changed}");
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

fn test_cases(status: &TestStatus) -> String {
    match status {
        TestStatus::NoSheet => "# No test cases sheet found in PR description\n".to_string(),
        TestStatus::Failed(reason) => format!("# Error fetching test cases\n{reason}\n"),
        TestStatus::Fetched(report) if report.total == 0 => "# No test cases found\n".to_string(),
        TestStatus::Fetched(report) => test_report(report),
    }
}

fn test_report(report: &TestStatusReport) -> String {
    let mut out = String::from("# Test Case Summary\n\n## Test Statistics\n");
    let _ = writeln!(out, "- Total Test Cases: {}", report.total);
    let _ = writeln!(out, "- Passed: {} ({:.1}%)", report.passed, report.percent(report.passed));
    let _ = writeln!(out, "- Failed: {} ({:.1}%)", report.failed, report.percent(report.failed));
    let _ = writeln!(
        out,
        "- Pending: {} ({:.1}%)\n",
        report.pending,
        report.percent(report.pending)
    );

    out.push_str("## Test Cases\n");
    for case in &report.cases {
        let _ = writeln!(out, "\n### Test Case {}", case.id);
        let _ = writeln!(out, "**Description:** {}\n", case.description);
        out.push_str("**Steps:**\n");
        for (i, step) in case.steps.iter().enumerate() {
            let _ = writeln!(out, "{}. {step}", i + 1);
        }
        let _ = writeln!(out, "\n**Expected Result:** {}", case.expected);
        let _ = writeln!(out, "**Actual Result:** {}", case.actual);
        let _ = writeln!(out, "**Status:** {}", case.status);
    }
    let _ = writeln!(out, "\nTest Cases Sheet: {}", report.sheet_url);
    out
}

fn code_context(definitions: &[DefinitionRecord]) -> String {
    let mut out = String::from("# Related Code Definitions\n");
    if definitions.is_empty() {
        out.push_str("No additional definitions found");
        return out;
    }

    out.push_str("### Related Code Definitions\n");
    let groups = [
        ("Type Definitions", &[DefinitionKind::Type][..]),
        ("Function Definitions", &[DefinitionKind::Function][..]),
        ("Other Definitions", &[DefinitionKind::Variable, DefinitionKind::Other][..]),
    ];
    for (title, kinds) in groups {
        let members: Vec<&DefinitionRecord> = definitions
            .iter()
            .filter(|d| kinds.contains(&d.kind))
            .collect();
        if members.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n#### {title}");
        for def in members {
            let _ = writeln!(
                out,
                "\nFrom `{}`:\n```{}\n{}\n```",
                def.file,
                walk::extension(&def.file),
                def.span
            );
        }
    }
    out
}

fn fenced(out: &mut String, heading: &str, language: &str, content: &str) {
    let _ = writeln!(out, "\n### {heading}\n```{language}");
    out.push_str(content);
    if !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("```\n");
}

fn complete_files(inputs: &BundleInputs<'_>) -> String {
    let mut out = String::from("# Complete File Contents\n");
    if inputs.files.is_empty() {
        out.push_str("No file contents available");
        return out;
    }

    for (path, file) in inputs.files {
        let heading = match file_state(file) {
            Some(state) => format!("{path} ({state})"),
            None => path.clone(),
        };
        fenced(&mut out, &heading, &file.language, &file.content);

        if let (Some(test_path), Some(test_content)) = (&file.test_path, &file.test_content) {
            fenced(
                &mut out,
                &format!("Test File: {test_path}"),
                walk::extension(test_path),
                test_content,
            );
        }
    }
    out
}

fn file_state(file: &ChangedFile) -> Option<&'static str> {
    if file.is_deleted() {
        Some("deleted")
    } else if file.is_new() {
        Some("new file")
    } else {
        None
    }
}
