//! Posting review comments back to the pull request.

pub mod bitbucket;
pub mod reminder;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ReviewComment;

pub use bitbucket::BitbucketPoster;
pub use reminder::TicketReminder;

/// Errors from posting a comment.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    #[error("comment request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("comment API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Delivers one comment to a pull request.
#[async_trait]
pub trait CommentPoster: Send + Sync {
    async fn post(
        &self,
        full_name: &str,
        pr_id: u64,
        comment: &ReviewComment,
    ) -> Result<(), PublishError>;
}

/// How many comments made it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostReport {
    pub posted: usize,
    pub failed: usize,
}

/// Post comments one at a time, in order. A failed post is logged and
/// counted; the remaining comments are still attempted.
pub async fn post_all(
    poster: &dyn CommentPoster,
    full_name: &str,
    pr_id: u64,
    comments: &[ReviewComment],
) -> PostReport {
    let mut report = PostReport::default();
    for (index, comment) in comments.iter().enumerate() {
        match poster.post(full_name, pr_id, comment).await {
            Ok(()) => report.posted += 1,
            Err(e) => {
                report.failed += 1;
                tracing::warn!(
                    repo = full_name,
                    pr = pr_id,
                    index,
                    inline = comment.is_inline(),
                    error = %e,
                    "failed to post comment"
                );
            }
        }
    }
    tracing::info!(
        repo = full_name,
        pr = pr_id,
        posted = report.posted,
        failed = report.failed,
        "posted review comments"
    );
    report
}
