//! One review run per accepted pull-request event.
//!
//! The run is strictly sequential. The test-status lookup only needs the
//! event, so it runs before the repository's lock is taken; checkout,
//! diff, context gathering, assembly and the bundle write happen under
//! the lock; analysis, decoding and posting happen after it is released. Partial
//! data never fails a run. Only checkout or diff failures, bundle
//! persistence failures and a failed analysis call do.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;

use crate::analyzer::{Analyzer, AnalyzerError};
use crate::bundle::{Bundle, BundleError, BundleInputs, BundleStore};
use crate::codec::Codec;
use crate::config::Config;
use crate::git::{GitError, RepoLocks, SourceControl, checkout_dir, clone_url, prepare_checkout};
use crate::models::{ArchitectureSnapshot, LanguageStat, PullRequestEvent, TestStatus};
use crate::publish::{CommentPoster, PostReport, TicketReminder, post_all};
use crate::test_status::TestStatusProvider;
use crate::{context, diff, extract, history, profile, summary, test_status};

/// Errors that fail a run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("checkout failed: {0}")]
    Checkout(#[source] GitError),

    #[error("diff failed: {0}")]
    Diff(#[source] GitError),

    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Source and destination do not differ; nothing was written.
    NoChanges,
    Reviewed {
        bundle: PathBuf,
        strategy: &'static str,
        report: PostReport,
    },
}

/// Knobs for bundle assembly that do not come from the event.
#[derive(Debug, Clone, Copy)]
pub struct BundleSettings<'a> {
    pub web_base: &'a str,
    pub source_extensions: &'a [String],
    pub max_file_lines: usize,
    pub history_commits: usize,
}

impl<'a> BundleSettings<'a> {
    pub fn from_config(config: &'a Config) -> Self {
        Self {
            web_base: &config.bitbucket.web_base,
            source_extensions: &config.workspace.source_extensions,
            max_file_lines: config.workspace.max_file_lines,
            history_commits: config.workspace.history_commits,
        }
    }
}

/// A checked-out change: where it lives and how it differs from its base.
#[derive(Debug, Clone, Copy)]
pub struct Change<'a> {
    pub repo_root: &'a Path,
    /// Revision prior file content is read from.
    pub base_ref: &'a str,
    pub diff: &'a str,
    pub paths: &'a [String],
}

/// Run every context stage over a checked-out change and assemble the bundle.
///
/// Never fails: stages that cannot produce data leave placeholders.
pub async fn build_bundle(
    scm: &dyn SourceControl,
    tests: &dyn TestStatusProvider,
    event: &PullRequestEvent,
    change: Change<'_>,
    settings: BundleSettings<'_>,
    generated_at: NaiveDateTime,
) -> Bundle {
    let status = test_status::lookup(tests, &event.title_and_description()).await;
    assemble_checked_out(scm, event, change, settings, &status, generated_at).await
}

async fn assemble_checked_out(
    scm: &dyn SourceControl,
    event: &PullRequestEvent,
    change: Change<'_>,
    settings: BundleSettings<'_>,
    test_status: &TestStatus,
    generated_at: NaiveDateTime,
) -> Bundle {
    let root = change.repo_root.to_path_buf();

    let identifiers = extract::extract_identifiers(change.diff);
    tracing::info!(count = identifiers.len(), "extracted identifiers from diff");

    let definitions = {
        let root = root.clone();
        let extensions = settings.source_extensions.to_vec();
        tokio::task::spawn_blocking(move || extract::locate_all(&root, &identifiers, &extensions))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "definition search task failed");
                Vec::new()
            })
    };

    let files = context::gather(
        scm,
        change.repo_root,
        change.paths,
        change.base_ref,
        settings.max_file_lines,
    )
    .await;

    let (architecture, languages) = {
        let root = root.clone();
        let extensions = settings.source_extensions.to_vec();
        tokio::task::spawn_blocking(move || survey(&root, &extensions))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "profiling task failed");
                (None, None)
            })
    };

    let summary = summary::summarize(change.paths, change.diff);
    let history = history::collect(scm, change.repo_root, change.paths, settings.history_commits).await;

    let inputs = BundleInputs {
        event,
        web_base: settings.web_base,
        generated_at,
        languages: languages.as_deref(),
        changed_paths: change.paths,
        summary: &summary,
        architecture: architecture.as_ref(),
        history: &history,
        test_status,
        definitions: &definitions,
        diff: change.diff,
        files: &files,
    };
    Bundle::assemble(&inputs)
}

/// Architecture snapshot and language histogram; either may be missing.
fn survey(
    root: &Path,
    extensions: &[String],
) -> (Option<ArchitectureSnapshot>, Option<Vec<LanguageStat>>) {
    let architecture = profile::profile(root, extensions)
        .inspect_err(|e| tracing::warn!(error = %e, "failed to profile architecture"))
        .ok();
    let languages = profile::language_stats(root)
        .inspect_err(|e| tracing::warn!(error = %e, "failed to compute language stats"))
        .ok();
    (architecture, languages)
}

/// The webhook-driven review flow and its collaborators.
pub struct ReviewPipeline {
    config: Config,
    scm: Arc<dyn SourceControl>,
    analyzer: Arc<dyn Analyzer>,
    poster: Arc<dyn CommentPoster>,
    tests: Arc<dyn TestStatusProvider>,
    reminder: Option<TicketReminder>,
    locks: RepoLocks,
    store: BundleStore,
    codec: Codec,
}

impl ReviewPipeline {
    pub fn new(
        config: Config,
        scm: Arc<dyn SourceControl>,
        analyzer: Arc<dyn Analyzer>,
        poster: Arc<dyn CommentPoster>,
        tests: Arc<dyn TestStatusProvider>,
    ) -> Self {
        let reminder = if config.reviewer.ticket_reminder {
            TicketReminder::new(&config.reviewer.ticket_pattern)
                .inspect_err(|e| tracing::warn!(error = %e, "invalid ticket pattern, reminder disabled"))
                .ok()
        } else {
            None
        };
        let store = BundleStore::new(&config.workspace.output_dir);
        Self {
            config,
            scm,
            analyzer,
            poster,
            tests,
            reminder,
            locks: RepoLocks::new(),
            store,
            codec: Codec::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Review one accepted event end to end.
    pub async fn run(&self, event: &PullRequestEvent) -> Result<Outcome, PipelineError> {
        let full_name = event.full_name();
        let pr_id = event.pull_request.id;
        tracing::info!(
            repo = full_name,
            pr = pr_id,
            source = event.source_branch(),
            destination = event.destination_branch(),
            "starting review"
        );

        let Some(bundle_path) = self.write_bundle(event).await? else {
            tracing::info!(repo = full_name, pr = pr_id, "no differences, nothing to review");
            return Ok(Outcome::NoChanges);
        };

        let text = self.store.read(&bundle_path).await?;
        let reply = self.analyzer.analyze(&text).await?;
        let decoded = self.codec.decode(&reply);
        tracing::info!(
            strategy = decoded.strategy,
            comments = decoded.comments.len(),
            "decoded analyzer reply"
        );

        let mut comments = decoded.comments;
        if let Some(reminder) = &self.reminder {
            comments.extend(reminder.check(&event.pull_request.description));
        }

        let report = post_all(self.poster.as_ref(), full_name, pr_id, &comments).await;
        Ok(Outcome::Reviewed {
            bundle: bundle_path,
            strategy: decoded.strategy,
            report,
        })
    }

    /// Checkout, diff, assemble and write under the repository lock.
    /// `None` when the branches do not differ.
    async fn write_bundle(&self, event: &PullRequestEvent) -> Result<Option<PathBuf>, PipelineError> {
        let full_name = event.full_name();
        let source = event.source_branch();
        let destination = event.destination_branch();

        let status = test_status::lookup(self.tests.as_ref(), &event.title_and_description()).await;

        let lock = self.locks.lock_for(full_name);
        let _guard = lock.lock().await;

        let dir = checkout_dir(&self.config.workspace.repos_dir, full_name);
        let (username, app_password) = self.config.bitbucket.credentials().unwrap_or(("", ""));
        let url = clone_url(&self.config.bitbucket.web_base, username, app_password, full_name);
        prepare_checkout(self.scm.as_ref(), &url, &dir, source, destination)
            .await
            .map_err(PipelineError::Checkout)?;

        let base_ref = format!("origin/{destination}");
        let head_ref = format!("origin/{source}");
        let diff = self
            .scm
            .diff(&dir, &base_ref, &head_ref)
            .await
            .map_err(PipelineError::Diff)?;
        if diff.trim().is_empty() {
            return Ok(None);
        }
        let paths = match self.scm.changed_paths(&dir, &base_ref, &head_ref).await {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list changed files, reading them from the diff");
                diff::changed_paths(&diff)
            }
        };

        let generated_at = Local::now().naive_local();
        let change = Change {
            repo_root: &dir,
            base_ref: &base_ref,
            diff: &diff,
            paths: &paths,
        };
        let bundle = assemble_checked_out(
            self.scm.as_ref(),
            event,
            change,
            BundleSettings::from_config(&self.config),
            &status,
            generated_at,
        )
        .await;

        let path = self
            .store
            .write(full_name, source, destination, generated_at, &bundle.render())
            .await?;
        tracing::info!(path = %path.display(), "wrote review bundle");
        Ok(Some(path))
    }
}
