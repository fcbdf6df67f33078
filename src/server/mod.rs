//! Webhook endpoint.
//!
//! `POST /webhook` accepts Bitbucket pull-request events. The run is
//! processed before responding, so the status code reflects its result:
//!
//! | Situation                                   | Status |
//! |---------------------------------------------|--------|
//! | event key other than created/updated        | 200    |
//! | body is not a valid event payload           | 400    |
//! | no reviewers, or configured reviewer absent | 200    |
//! | review completed or nothing to diff         | 200    |
//! | checkout, bundle or analysis failure        | 500    |

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use tokio::signal;

use crate::constants::EVENT_KEY_HEADER;
use crate::models::event::is_review_event;
use crate::models::{PullRequestEvent, ReviewGate};
use crate::pipeline::{Outcome, ReviewPipeline};

/// Shared state behind the router.
pub struct AppState {
    pub pipeline: ReviewPipeline,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .with_state(state)
}

/// POST /webhook
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let event_key = headers
        .get(EVENT_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !is_review_event(event_key) {
        tracing::debug!(event_key, "ignoring event");
        return (StatusCode::OK, format!("ignored event '{event_key}'"));
    }

    let event: PullRequestEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "malformed webhook payload");
            return (StatusCode::BAD_REQUEST, format!("invalid payload: {e}"));
        }
    };

    let identity = &state.pipeline.config().reviewer.identity;
    match event.review_gate(identity) {
        ReviewGate::Review => {}
        ReviewGate::NoReviewers => {
            tracing::info!(pr = event.pull_request.id, "no reviewers assigned, skipping");
            return (StatusCode::OK, "no reviewers assigned".to_string());
        }
        ReviewGate::ReviewerAbsent => {
            tracing::info!(pr = event.pull_request.id, identity = %identity, "reviewer not assigned, skipping");
            return (StatusCode::OK, format!("{identity} is not a reviewer"));
        }
    }

    match state.pipeline.run(&event).await {
        Ok(Outcome::NoChanges) => (StatusCode::OK, "no changes to review".to_string()),
        Ok(Outcome::Reviewed { report, .. }) => (
            StatusCode::OK,
            format!("posted {} comments ({} failed)", report.posted, report.failed),
        ),
        Err(e) => {
            tracing::error!(repo = event.full_name(), pr = event.pull_request.id, error = %e, "review failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Bind `addr` and serve until Ctrl+C.
pub async fn serve(addr: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening for webhooks");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
