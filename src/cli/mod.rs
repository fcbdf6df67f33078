//! CLI command definitions and terminal rendering.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use colored::Colorize;

use prweave::models::ReviewComment;

/// Listing of decoded comments for the terminal.
pub fn format_comments(comments: &[ReviewComment], strategy: &str) -> String {
    let mut out = format!(
        "{} {} {}\n",
        comments.len().to_string().bold(),
        if comments.len() == 1 { "comment" } else { "comments" },
        format!("(decoded as {strategy})").dimmed()
    );
    for comment in comments {
        out.push('\n');
        match comment {
            ReviewComment::Inline { path, line, text } => {
                out.push_str(&format!("{}\n", format!("{path}:{line}").cyan().bold()));
                out.push_str(&indent(text));
            }
            ReviewComment::General { text } => {
                out.push_str(&format!("{}\n", "general".yellow().bold()));
                out.push_str(&indent(text));
            }
        }
    }
    out
}

fn indent(text: &str) -> String {
    text.lines().map(|l| format!("  {l}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_inline_and_general_comments() {
        colored::control::set_override(false);
        let out = format_comments(
            &[
                ReviewComment::inline("pay/retry.go", 42, "No backoff.\nAdd jitter."),
                ReviewComment::general("Looks good otherwise."),
            ],
            "fenced-json",
        );
        assert!(out.starts_with("2 comments (decoded as fenced-json)"));
        assert!(out.contains("pay/retry.go:42\n  No backoff.\n  Add jitter.\n"));
        assert!(out.contains("general\n  Looks good otherwise.\n"));
    }

    #[test]
    fn singular_for_one_comment() {
        colored::control::set_override(false);
        let out = format_comments(&[ReviewComment::general("x")], "raw-text");
        assert!(out.starts_with("1 comment (decoded"));
    }
}
