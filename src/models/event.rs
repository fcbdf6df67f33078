//! Bitbucket pull request webhook payload.
//!
//! Only the fields the pipeline reads are modelled; everything else in
//! the payload is ignored. Missing fields deserialize to their defaults
//! so that sparse test payloads and older webhook versions still parse.

use serde::{Deserialize, Serialize};

use crate::constants::{EVENT_PR_CREATED, EVENT_PR_UPDATED};

/// Subset of a `pullrequest:created` / `pullrequest:updated` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestEvent {
    #[serde(rename = "pullrequest")]
    pub pull_request: PullRequest,
    pub repository: Repository,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub source: Endpoint,
    pub destination: Endpoint,
    pub reviewers: Vec<Reviewer>,
}

/// One side of a pull request (source or destination).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    pub branch: Branch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branch {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reviewer {
    pub display_name: String,
    pub uuid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub full_name: String,
}

/// Outcome of checking whether an event should be reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewGate {
    Review,
    NoReviewers,
    ReviewerAbsent,
}

impl PullRequestEvent {
    pub fn source_branch(&self) -> &str {
        &self.pull_request.source.branch.name
    }

    pub fn destination_branch(&self) -> &str {
        &self.pull_request.destination.branch.name
    }

    pub fn full_name(&self) -> &str {
        &self.repository.full_name
    }

    /// Title and description joined, the text searched for sheet links.
    pub fn title_and_description(&self) -> String {
        format!("{}\n{}", self.pull_request.title, self.pull_request.description)
    }

    /// Whether the configured reviewer identity is assigned to the PR.
    ///
    /// The identity matches either a reviewer's display name or uuid.
    pub fn review_gate(&self, identity: &str) -> ReviewGate {
        let reviewers = &self.pull_request.reviewers;
        if reviewers.is_empty() {
            ReviewGate::NoReviewers
        } else if reviewers
            .iter()
            .any(|r| r.display_name == identity || r.uuid == identity)
        {
            ReviewGate::Review
        } else {
            ReviewGate::ReviewerAbsent
        }
    }
}

/// Returns true for the event keys that trigger a review.
pub fn is_review_event(event_key: &str) -> bool {
    matches!(event_key.trim(), EVENT_PR_CREATED | EVENT_PR_UPDATED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_reviewers(reviewers: serde_json::Value) -> PullRequestEvent {
        serde_json::from_value(serde_json::json!({
            "pullrequest": {
                "id": 42,
                "title": "Add retries",
                "description": "PAY-12",
                "source": {"branch": {"name": "feature/retry"}},
                "destination": {"branch": {"name": "main"}},
                "reviewers": reviewers
            },
            "repository": {"full_name": "acme/payments"}
        }))
        .unwrap()
    }

    #[test]
    fn parses_payload_subset() {
        let event = event_with_reviewers(serde_json::json!([]));
        assert_eq!(event.pull_request.id, 42);
        assert_eq!(event.source_branch(), "feature/retry");
        assert_eq!(event.destination_branch(), "main");
        assert_eq!(event.full_name(), "acme/payments");
    }

    #[test]
    fn gate_without_reviewers() {
        let event = event_with_reviewers(serde_json::json!([]));
        assert_eq!(event.review_gate("ExoReview"), ReviewGate::NoReviewers);
    }

    #[test]
    fn gate_matches_display_name_or_uuid() {
        let by_name = event_with_reviewers(serde_json::json!([
            {"display_name": "Alice", "uuid": "{1}"},
            {"display_name": "ExoReview", "uuid": "{2}"}
        ]));
        assert_eq!(by_name.review_gate("ExoReview"), ReviewGate::Review);

        let by_uuid = event_with_reviewers(serde_json::json!([
            {"display_name": "Bot", "uuid": "ExoReview"}
        ]));
        assert_eq!(by_uuid.review_gate("ExoReview"), ReviewGate::Review);
    }

    #[test]
    fn gate_reports_absent_reviewer() {
        let event = event_with_reviewers(serde_json::json!([
            {"display_name": "Alice", "uuid": "{1}"}
        ]));
        assert_eq!(event.review_gate("ExoReview"), ReviewGate::ReviewerAbsent);
    }

    #[test]
    fn review_event_keys() {
        assert!(is_review_event("pullrequest:created"));
        assert!(is_review_event(" pullrequest:updated "));
        assert!(!is_review_event("pullrequest:fulfilled"));
        assert!(!is_review_event("repo:push"));
    }
}
