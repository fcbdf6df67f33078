//! prweave — pull request review bundles for automated reviewers.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use prweave::analyzer::RigAnalyzer;
use prweave::bundle::BundleStore;
use prweave::codec::{self, Codec};
use prweave::config::Config;
use prweave::constants;
use prweave::diff;
use prweave::env::Env;
use prweave::git::{GitCli, SourceControl};
use prweave::models::event::{Branch, Endpoint, PullRequest, Repository};
use prweave::models::PullRequestEvent;
use prweave::pipeline::{BundleSettings, Change, ReviewPipeline, build_bundle};
use prweave::publish::BitbucketPoster;
use prweave::server::{self, AppState};
use prweave::test_status::{SheetsApiProvider, TestStatusProvider, UnconfiguredProvider};

use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::args::{BundleArgs, Cli, Command, DecodeArgs, ServeArgs};

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Log to stderr, `info` unless `RUST_LOG` says otherwise.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Serve(args) => run_serve(args, load_config(config_path)?).await,
        Command::Bundle(args) => run_bundle(args, load_config(config_path)?).await,
        Command::Decode(args) => run_decode(args),
        Command::Version => run_version(),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let cwd = std::env::current_dir().ok();
    Config::load(cwd.as_deref(), explicit, &Env::real()).context("failed to load configuration")
}

fn test_status_provider(config: &Config) -> Arc<dyn TestStatusProvider> {
    match &config.test_status.api_key {
        Some(key) => Arc::new(SheetsApiProvider::new(
            &config.test_status.api_base,
            key,
            &config.test_status.range,
        )),
        None => Arc::new(UnconfiguredProvider),
    }
}

/// Start the webhook server.
async fn run_serve(args: ServeArgs, mut config: Config) -> Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    tracing::debug!(?config, "loaded configuration");

    let analyzer = RigAnalyzer::new(config.analyzer.clone()).context("analyzer setup failed")?;
    let poster = BitbucketPoster::from_config(&config.bitbucket).context("comment poster setup failed")?;
    let tests = test_status_provider(&config);
    let bind = config.server.bind.clone();

    let pipeline = ReviewPipeline::new(
        config,
        Arc::new(GitCli::new()),
        Arc::new(analyzer),
        Arc::new(poster),
        tests,
    );
    let state = Arc::new(AppState { pipeline });

    server::serve(&bind, state)
        .await
        .with_context(|| format!("server on {bind} failed"))
}

/// Build and write a bundle for a local checkout.
async fn run_bundle(args: BundleArgs, config: Config) -> Result<()> {
    let scm = GitCli::new();
    let repo = args.repo.as_path();

    let event = match &args.event {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read event {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse event {}", path.display()))?
        }
        None => local_event(&args.name, &args.head, &args.base),
    };

    let (diff_text, paths) = match &args.diff_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read diff {}", path.display()))?;
            let paths = diff::changed_paths(&text);
            (text, paths)
        }
        None => {
            let text = scm
                .diff(repo, &args.base, &args.head)
                .await
                .context("failed to diff revisions")?;
            let paths = scm
                .changed_paths(repo, &args.base, &args.head)
                .await
                .context("failed to list changed files")?;
            (text, paths)
        }
    };

    if diff_text.trim().is_empty() {
        println!("No differences between {} and {}.", args.base, args.head);
        return Ok(());
    }

    let tests = test_status_provider(&config);
    let generated_at = chrono::Local::now().naive_local();
    let change = Change {
        repo_root: repo,
        base_ref: &args.base,
        diff: &diff_text,
        paths: &paths,
    };
    let bundle = build_bundle(
        &scm,
        tests.as_ref(),
        &event,
        change,
        BundleSettings::from_config(&config),
        generated_at,
    )
    .await;

    let store = BundleStore::new(args.output.unwrap_or(config.workspace.output_dir));
    let path = store
        .write(
            event.full_name(),
            event.source_branch(),
            event.destination_branch(),
            generated_at,
            &bundle.render(),
        )
        .await?;
    println!("{}", path.display());
    Ok(())
}

/// Event stand-in when bundling without a webhook payload.
fn local_event(full_name: &str, source: &str, destination: &str) -> PullRequestEvent {
    let endpoint = |name: &str| Endpoint {
        branch: Branch {
            name: name.to_string(),
        },
    };
    PullRequestEvent {
        pull_request: PullRequest {
            title: format!("Local changes {destination}..{source}"),
            source: endpoint(source),
            destination: endpoint(destination),
            ..Default::default()
        },
        repository: Repository {
            full_name: full_name.to_string(),
        },
    }
}

/// Decode an analyzer reply and print the comments.
fn run_decode(args: DecodeArgs) -> Result<()> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?,
    };

    let decoded = Codec::default().decode(&text);
    if args.json {
        println!("{}", codec::encode(&decoded.comments)?);
    } else {
        print!("{}", cli::format_comments(&decoded.comments, decoded.strategy));
    }
    Ok(())
}

/// Print detailed version and build information.
fn run_version() -> Result<()> {
    use colored::Colorize;

    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    println!("{}     {}", "target:".dimmed(), constants::TARGET);
    Ok(())
}
