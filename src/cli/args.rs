//! Clap argument types.

use clap::Parser;
use std::path::PathBuf;

/// Pull request review bundles for automated reviewers.
#[derive(Parser, Debug)]
#[command(name = "prweave", version = prweave::constants::VERSION)]
pub struct Cli {
    /// Config file to use instead of `.prweave.toml` in the working directory.
    #[arg(long, global = true, env = "PRWEAVE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Run the webhook server.
    Serve(ServeArgs),

    /// Build a review bundle from a local checkout without the webhook.
    Bundle(BundleArgs),

    /// Decode a saved analyzer reply into review comments.
    Decode(DecodeArgs),

    /// Print version and build information.
    Version,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides config and PRWEAVE_BIND).
    #[arg(long)]
    pub bind: Option<String>,
}

/// Arguments for the `bundle` subcommand.
#[derive(Parser, Debug)]
pub struct BundleArgs {
    /// Path to the repository working tree.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Base revision (the pull request destination).
    #[arg(long, default_value = "origin/main")]
    pub base: String,

    /// Head revision (the pull request source).
    #[arg(long, default_value = "HEAD")]
    pub head: String,

    /// Pre-computed unified diff file instead of diffing base..head.
    #[arg(long)]
    pub diff_file: Option<PathBuf>,

    /// Webhook payload JSON to take PR metadata from.
    #[arg(long)]
    pub event: Option<PathBuf>,

    /// Repository full name used when no event is given.
    #[arg(long, default_value = "local/repository")]
    pub name: String,

    /// Output directory (overrides config).
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `decode` subcommand.
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Reply file to decode (reads stdin when omitted).
    pub file: Option<PathBuf>,

    /// Print the normalized comments as JSON instead of a listing.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
