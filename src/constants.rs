//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and wire-format tokens so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "prweave";

/// Crate version, baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compilation target triple (set by `build.rs`).
pub const TARGET: &str = env!("TARGET");

/// Local config filename (e.g. `.prweave.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".prweave.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "prweave";

/// Separator placed between bundle chunks.
///
/// Downstream consumers split the bundle on this exact string, so it
/// must never change once bundles are in circulation.
pub const CHUNK_SEPARATOR: &str = "\n<<<<<<<<<<<< CHUNK SEPARATOR >>>>>>>>>>>\n";

/// Prefix of the first line of every chunk.
pub const CHUNK_MARKER: &str = "### CHUNK: ";

/// Webhook header carrying the event type.
pub const EVENT_KEY_HEADER: &str = "X-Event-Key";

/// Event keys that trigger a review.
pub const EVENT_PR_CREATED: &str = "pullrequest:created";
pub const EVENT_PR_UPDATED: &str = "pullrequest:updated";

/// Reviewer identity that opts a pull request into automated review.
pub const DEFAULT_REVIEWER_IDENTITY: &str = "ExoReview";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_BIND: &str = "PRWEAVE_BIND";
pub const ENV_REVIEWER: &str = "PRWEAVE_REVIEWER";
pub const ENV_REPOS_DIR: &str = "PRWEAVE_REPOS_DIR";
pub const ENV_OUTPUT_DIR: &str = "PRWEAVE_OUTPUT_DIR";
pub const ENV_BITBUCKET_USERNAME: &str = "PRWEAVE_BITBUCKET_USERNAME";
pub const ENV_BITBUCKET_APP_PASSWORD: &str = "PRWEAVE_BITBUCKET_APP_PASSWORD";
pub const ENV_PROVIDER: &str = "PRWEAVE_PROVIDER";
pub const ENV_MODEL: &str = "PRWEAVE_MODEL";
pub const ENV_API_KEY: &str = "PRWEAVE_API_KEY";
pub const ENV_BASE_URL: &str = "PRWEAVE_BASE_URL";
pub const ENV_SHEETS_API_KEY: &str = "PRWEAVE_SHEETS_API_KEY";
