//! End-to-end review runs against mock collaborators.
//!
//! Git, the analyzer, the sheet lookup and comment posting are all
//! mocked; bundle assembly, persistence and decoding run for real over
//! the payments fixture.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;

use prweave::bundle::{ChunkKind, split_bundle};
use prweave::constants::CHUNK_MARKER;
use prweave::models::ReviewComment;
use prweave::pipeline::{Outcome, PipelineError, ReviewPipeline};
use prweave::publish::PostReport;
use prweave::test_status::UnconfiguredProvider;

use common::{
    CannedAnalyzer, FixedSheet, FixtureScm, RecordingPoster, config_in, event, retry_diff,
    sheet_rows,
};

const FENCED_REPLY: &str = r#"Review below.

```json
[
  {"content": {"raw": "Jitter should be randomized, not a constant."}, "inline": {"path": "retry/retry.go", "to": 23}},
  {"content": {"raw": "Please add a test for negative attempts."}}
]
```
"#;

struct Harness {
    _dir: tempfile::TempDir,
    scm: Arc<FixtureScm>,
    analyzer: Arc<CannedAnalyzer>,
    poster: Arc<RecordingPoster>,
    pipeline: ReviewPipeline,
}

fn harness(scm: FixtureScm, analyzer: CannedAnalyzer, reminder: bool) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.reviewer.ticket_reminder = reminder;

    let scm = Arc::new(scm);
    let analyzer = Arc::new(analyzer);
    let poster = Arc::new(RecordingPoster::default());
    let pipeline = ReviewPipeline::new(
        config,
        scm.clone(),
        analyzer.clone(),
        poster.clone(),
        Arc::new(FixedSheet(sheet_rows())),
    );
    Harness {
        _dir: dir,
        scm,
        analyzer,
        poster,
        pipeline,
    }
}

#[tokio::test]
async fn review_run_posts_decoded_comments() {
    let h = harness(
        FixtureScm::new(retry_diff()),
        CannedAnalyzer::replying(FENCED_REPLY),
        false,
    );

    let outcome = h.pipeline.run(&event()).await.unwrap();
    let Outcome::Reviewed {
        bundle,
        strategy,
        report,
    } = outcome
    else {
        panic!("expected a review, got {outcome:?}");
    };

    assert_eq!(strategy, "fenced-json");
    assert_eq!(report, PostReport { posted: 2, failed: 0 });
    assert_eq!(
        h.poster.comments(),
        vec![
            ReviewComment::inline(
                "retry/retry.go",
                23,
                "Jitter should be randomized, not a constant."
            ),
            ReviewComment::general("Please add a test for negative attempts."),
        ]
    );

    let name = bundle.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("acme_payments_feature_jitter_to_main_"), "{name}");
    assert!(name.ends_with(".txt"));

    // The analyzer saw exactly the persisted bundle.
    let on_disk = std::fs::read_to_string(&bundle).unwrap();
    assert_eq!(h.analyzer.prompts(), vec![on_disk]);
}

#[tokio::test]
async fn checkout_sequence_clones_then_detaches_onto_source() {
    let h = harness(
        FixtureScm::new(retry_diff()),
        CannedAnalyzer::replying("[]"),
        false,
    );
    h.pipeline.run(&event()).await.unwrap();

    let calls = h.scm.calls();
    assert!(calls[0].starts_with("clone https://bitbucket.org/acme/payments.git"));
    assert_eq!(
        calls[1..],
        [
            "fetch feature/jitter",
            "fetch main",
            "checkout origin/feature/jitter",
            "diff origin/main..origin/feature/jitter",
        ]
    );

    // A second event reuses the checkout.
    h.pipeline.run(&event()).await.unwrap();
    assert!(h.scm.calls().contains(&"pull".to_string()));
}

#[tokio::test]
async fn bundle_carries_context_from_every_stage() {
    let h = harness(
        FixtureScm::new(retry_diff()),
        CannedAnalyzer::replying("Looks fine."),
        false,
    );
    let Outcome::Reviewed { bundle, .. } = h.pipeline.run(&event()).await.unwrap() else {
        panic!("expected a review");
    };
    let text = std::fs::read_to_string(bundle).unwrap();
    let chunks = split_bundle(&text);

    let body = |kind: ChunkKind| {
        chunks
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.body.clone())
            .unwrap()
    };

    assert_eq!(chunks.len(), 10);
    assert!(body(ChunkKind::Metadata).contains("https://bitbucket.org/acme/payments"));
    assert!(body(ChunkKind::Metadata).contains("Go"));

    let architecture = body(ChunkKind::Architecture);
    assert!(architecture.contains("github.com/acme/payments/retry"));
    assert!(architecture.contains("/payments"));
    assert!(architecture.contains("/health"));
    assert!(architecture.contains("config.yaml"));
    assert!(architecture.contains("db/schema.sql"));

    let history = body(ChunkKind::History);
    assert!(history.contains("Add retry policy (2024-04-30) by Dana Ortiz"));
    assert!(history.contains("  - retry/retry_test.go"));

    let tests = body(ChunkKind::TestCases);
    assert!(tests.contains("- Total Test Cases: 2"));
    assert!(tests.contains("- Passed: 1 (50.0%)"));

    let definitions = body(ChunkKind::CodeContext);
    assert!(definitions.contains("type Policy struct"));

    let files = body(ChunkKind::CompleteFiles);
    assert!(files.contains("retry/retry.go"));
    assert!(files.contains("Test File: retry/retry_test.go"));

    assert!(body(ChunkKind::Diff).contains("+\tJitter   time.Duration"));
    assert!(text.lines().filter(|l| l.starts_with(CHUNK_MARKER)).count() >= 10);
}

#[tokio::test]
async fn empty_diff_is_a_no_op() {
    let h = harness(
        FixtureScm::new("  \n"),
        CannedAnalyzer::replying("unused"),
        false,
    );
    let outcome = h.pipeline.run(&event()).await.unwrap();
    assert_eq!(outcome, Outcome::NoChanges);
    assert!(h.analyzer.prompts().is_empty());
    assert!(h.poster.comments().is_empty());
    assert!(!h.pipeline.config().workspace.output_dir.exists());
}

#[tokio::test]
async fn changed_file_listing_failure_falls_back_to_the_diff() {
    let h = harness(
        FixtureScm::failing_changed_paths(retry_diff()),
        CannedAnalyzer::replying("[]"),
        false,
    );
    let Outcome::Reviewed { bundle, .. } = h.pipeline.run(&event()).await.unwrap() else {
        panic!("expected a review");
    };
    let text = std::fs::read_to_string(bundle).unwrap();
    let chunks = split_bundle(&text);
    let body = |kind: ChunkKind| {
        chunks
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.body.clone())
            .unwrap_or_default()
    };
    assert!(body(ChunkKind::Metadata).contains("Total files changed: 1"));
    assert!(body(ChunkKind::CompleteFiles).contains("retry/retry.go"));
    assert_eq!(h.analyzer.prompts().len(), 1);
}

#[tokio::test]
async fn checkout_failure_fails_the_run() {
    let h = harness(
        FixtureScm::failing_clone(),
        CannedAnalyzer::replying("unused"),
        false,
    );
    let err = h.pipeline.run(&event()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Checkout(_)), "{err}");
    assert!(h.analyzer.prompts().is_empty());
}

#[tokio::test]
async fn analyzer_failure_fails_after_bundle_is_written() {
    let h = harness(
        FixtureScm::new(retry_diff()),
        CannedAnalyzer::failing("rate limited"),
        false,
    );
    let err = h.pipeline.run(&event()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Analyzer(_)));
    assert!(err.to_string().contains("rate limited"));

    let written: Vec<_> = std::fs::read_dir(&h.pipeline.config().workspace.output_dir)
        .unwrap()
        .collect();
    assert_eq!(written.len(), 1);
    assert!(h.poster.comments().is_empty());
}

#[tokio::test]
async fn failed_posts_are_counted_and_the_rest_still_posted() {
    let reply = r#"[
        {"content": {"raw": "reject me"}, "inline": {"path": "retry/retry.go", "to": 5}},
        {"content": {"raw": "second"}}
    ]"#;
    let h = harness(
        FixtureScm::new(retry_diff()),
        CannedAnalyzer::replying(reply),
        false,
    );
    let Outcome::Reviewed {
        strategy, report, ..
    } = h.pipeline.run(&event()).await.unwrap()
    else {
        panic!("expected a review");
    };
    assert_eq!(strategy, "json");
    assert_eq!(report, PostReport { posted: 1, failed: 1 });
    assert_eq!(h.poster.comments().len(), 2);
}

#[tokio::test]
async fn ticket_reminder_is_appended_when_enabled() {
    let h = harness(
        FixtureScm::new(retry_diff()),
        CannedAnalyzer::replying("[]"),
        true,
    );
    h.pipeline.run(&event()).await.unwrap();
    let comments = h.poster.comments();
    assert_eq!(comments.len(), 1);
    assert!(comments[0].text().contains("not linked to any ticket"));
}

#[tokio::test]
async fn sheet_lookup_failure_still_produces_a_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = ReviewPipeline::new(
        config_in(dir.path()),
        Arc::new(FixtureScm::new(retry_diff())),
        Arc::new(CannedAnalyzer::replying("ok")),
        Arc::new(RecordingPoster::default()),
        Arc::new(UnconfiguredProvider),
    );
    let Outcome::Reviewed { bundle, .. } = pipeline.run(&event()).await.unwrap() else {
        panic!("expected a review");
    };
    let text = std::fs::read_to_string(bundle).unwrap();
    assert!(text.contains("# Error fetching test cases"));
}
