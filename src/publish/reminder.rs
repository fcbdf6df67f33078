//! Reminder comment for pull requests that name no tracker ticket.

use regex::Regex;

use crate::models::ReviewComment;

pub const REMINDER_TEXT: &str = "⚠️ This PR is not linked to any ticket. Please update the PR \
description to include a ticket reference (for example `PROJ-123`) for better tracking and \
documentation.";

/// Checks a description for a ticket key such as `PROJ-123`.
#[derive(Debug, Clone)]
pub struct TicketReminder {
    pattern: Regex,
}

impl TicketReminder {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn has_ticket(&self, description: &str) -> bool {
        self.pattern.is_match(description)
    }

    /// The reminder comment, or `None` when a ticket is referenced.
    pub fn check(&self, description: &str) -> Option<ReviewComment> {
        (!self.has_ticket(description)).then(|| ReviewComment::general(REMINDER_TEXT))
    }
}
