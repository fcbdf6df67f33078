//! Webhook gating: which requests reach the pipeline and what they return.
//!
//! The handler is called directly with extracted parts, so no listener
//! is bound.

mod common;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};

use prweave::pipeline::ReviewPipeline;
use prweave::server::{AppState, webhook};
use prweave::test_status::UnconfiguredProvider;

use common::{CannedAnalyzer, FixtureScm, RecordingPoster, config_in, event_json, retry_diff};

struct Fixture {
    _dir: tempfile::TempDir,
    analyzer: Arc<CannedAnalyzer>,
    poster: Arc<RecordingPoster>,
    state: Arc<AppState>,
}

fn fixture(scm: FixtureScm) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = Arc::new(CannedAnalyzer::replying("Ship it."));
    let poster = Arc::new(RecordingPoster::default());
    let pipeline = ReviewPipeline::new(
        config_in(dir.path()),
        Arc::new(scm),
        analyzer.clone(),
        poster.clone(),
        Arc::new(UnconfiguredProvider),
    );
    Fixture {
        _dir: dir,
        analyzer,
        poster,
        state: Arc::new(AppState { pipeline }),
    }
}

fn headers(event_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("X-Event-Key", HeaderValue::from_str(event_key).unwrap());
    headers
}

fn body(value: serde_json::Value) -> Bytes {
    Bytes::from(serde_json::to_vec(&value).unwrap())
}

fn bot_reviewer() -> serde_json::Value {
    serde_json::json!([{"display_name": "ExoReview", "uuid": "{bot}"}])
}

#[tokio::test]
async fn other_event_keys_are_acknowledged_and_ignored() {
    let f = fixture(FixtureScm::new(retry_diff()));
    for key in ["repo:push", "pullrequest:fulfilled", ""] {
        let (status, _) = webhook(
            State(f.state.clone()),
            headers(key),
            body(event_json(bot_reviewer())),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "key {key:?}");
    }
    assert!(f.analyzer.prompts().is_empty());
}

#[tokio::test]
async fn missing_header_is_ignored() {
    let f = fixture(FixtureScm::new(retry_diff()));
    let (status, _) = webhook(
        State(f.state.clone()),
        HeaderMap::new(),
        body(event_json(bot_reviewer())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(f.analyzer.prompts().is_empty());
}

#[tokio::test]
async fn malformed_payload_is_bad_request() {
    let f = fixture(FixtureScm::new(retry_diff()));
    let (status, message) = webhook(
        State(f.state.clone()),
        headers("pullrequest:created"),
        Bytes::from_static(b"{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.contains("invalid payload"));

    let (status, _) = webhook(
        State(f.state.clone()),
        headers("pullrequest:created"),
        Bytes::from_static(br#"{"repository": {"full_name": "acme/payments"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reviewer_gate_skips_without_writing() {
    let f = fixture(FixtureScm::new(retry_diff()));
    let output_dir = f.state.pipeline.config().workspace.output_dir.clone();

    let (status, message) = webhook(
        State(f.state.clone()),
        headers("pullrequest:created"),
        body(event_json(serde_json::json!([]))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "no reviewers assigned");

    let (status, _) = webhook(
        State(f.state.clone()),
        headers("pullrequest:updated"),
        body(event_json(serde_json::json!([
            {"display_name": "Someone Else", "uuid": "{other}"}
        ]))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert!(!output_dir.exists());
    assert!(f.analyzer.prompts().is_empty());
}

#[tokio::test]
async fn reviewer_matches_by_uuid() {
    let f = fixture(FixtureScm::new(retry_diff()));
    let mut payload = event_json(serde_json::json!([
        {"display_name": "Review Bot (renamed)", "uuid": "{bot}"}
    ]));
    payload["pullrequest"]["description"] = serde_json::json!("no sheet");

    // Identity configured as the uuid instead of the display name.
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.reviewer.identity = "{bot}".into();
    let state = Arc::new(AppState {
        pipeline: ReviewPipeline::new(
            config,
            Arc::new(FixtureScm::new(retry_diff())),
            f.analyzer.clone(),
            f.poster.clone(),
            Arc::new(UnconfiguredProvider),
        ),
    });

    let (status, _) = webhook(State(state), headers("pullrequest:created"), body(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(f.analyzer.prompts().len(), 1);
    assert_eq!(f.poster.comments().len(), 1);
}

#[tokio::test]
async fn accepted_event_runs_the_review() {
    let f = fixture(FixtureScm::new(retry_diff()));
    let (status, message) = webhook(
        State(f.state.clone()),
        headers(" pullrequest:created "),
        body(event_json(bot_reviewer())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "posted 1 comments (0 failed)");
    assert_eq!(f.analyzer.prompts().len(), 1);
}

#[tokio::test]
async fn checkout_failure_is_internal_error() {
    let f = fixture(FixtureScm::failing_clone());
    let (status, message) = webhook(
        State(f.state.clone()),
        headers("pullrequest:created"),
        body(event_json(bot_reviewer())),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(message.contains("checkout failed"));
}
