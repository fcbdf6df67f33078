//! Review comments and their wire representation.
//!
//! A comment is either anchored to a file line or general. The wire
//! shape used by the analyzer and by Bitbucket is
//! `{"content": {"raw": ...}, "inline": {"path": ..., "to": ...}}`,
//! where the presence of `inline` (with a non-empty path) is what makes
//! a comment inline.

use serde::{Deserialize, Serialize};

/// A typed review comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CommentPayload", into = "CommentPayload")]
pub enum ReviewComment {
    /// Anchored to `line` of `path` in the new revision.
    Inline { path: String, line: i64, text: String },
    /// Applies to the pull request as a whole.
    General { text: String },
}

impl ReviewComment {
    pub fn inline(path: impl Into<String>, line: i64, text: impl Into<String>) -> Self {
        ReviewComment::Inline {
            path: path.into(),
            line,
            text: text.into(),
        }
    }

    pub fn general(text: impl Into<String>) -> Self {
        ReviewComment::General { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            ReviewComment::Inline { text, .. } | ReviewComment::General { text } => text,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ReviewComment::Inline { .. })
    }
}

/// Wire body of a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentPayload {
    pub content: CommentContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<InlineAnchor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentContent {
    pub raw: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineAnchor {
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
}

impl From<CommentPayload> for ReviewComment {
    fn from(payload: CommentPayload) -> Self {
        let text = payload.content.raw;
        match payload.inline {
            Some(anchor) if !anchor.path.is_empty() => ReviewComment::Inline {
                path: anchor.path,
                line: anchor.to.or(anchor.from).unwrap_or(0),
                text,
            },
            _ => ReviewComment::General { text },
        }
    }
}

impl From<ReviewComment> for CommentPayload {
    fn from(comment: ReviewComment) -> Self {
        match comment {
            ReviewComment::Inline { path, line, text } => CommentPayload {
                content: CommentContent { raw: text },
                inline: Some(InlineAnchor {
                    path,
                    to: Some(line),
                    from: None,
                }),
            },
            ReviewComment::General { text } => CommentPayload {
                content: CommentContent { raw: text },
                inline: None,
            },
        }
    }
}
