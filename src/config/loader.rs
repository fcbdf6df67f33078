//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags (applied by the caller)
//! 2. Environment variables
//! 3. `.prweave.toml` in the working directory, or an explicit `--config` file
//! 4. `~/.config/prweave/config.toml` (global defaults)
//! 5. Built-in defaults
//!
//! File layers are merged as TOML tables before deserializing, so a key
//! set in a lower layer survives unless a higher layer sets the same key.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    DEFAULT_REVIEWER_IDENTITY, ENV_API_KEY, ENV_BASE_URL, ENV_BIND, ENV_BITBUCKET_APP_PASSWORD,
    ENV_BITBUCKET_USERNAME, ENV_MODEL, ENV_OUTPUT_DIR, ENV_PROVIDER, ENV_REPOS_DIR, ENV_REVIEWER,
    ENV_SHEETS_API_KEY,
};
use crate::env::Env;
use crate::models::ProviderName;

const REDACTED: &str = "[REDACTED]";

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid merged configuration: {0}")]
    Invalid(#[source] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub workspace: WorkspaceConfig,
    pub bitbucket: BitbucketConfig,
    pub reviewer: ReviewerConfig,
    pub analyzer: AnalyzerConfig,
    pub test_status: TestStatusConfig,
}

/// Webhook listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Where checkouts and bundles live, and how much context goes into a bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub repos_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Lines kept per file in the complete-files chunk; 0 keeps everything.
    pub max_file_lines: usize,
    /// Extensions searched for definitions and profiled as source.
    pub source_extensions: Vec<String>,
    pub history_commits: usize,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            repos_dir: PathBuf::from("./repos"),
            output_dir: PathBuf::from("./diffs"),
            max_file_lines: 1000,
            source_extensions: crate::extract::DEFAULT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            history_commits: crate::history::DEFAULT_COMMITS_PER_FILE,
        }
    }
}

/// Bitbucket Cloud endpoints and credentials.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BitbucketConfig {
    pub api_base: String,
    /// Web and clone base, e.g. `https://bitbucket.org`.
    pub web_base: String,
    pub username: Option<String>,
    pub app_password: Option<String>,
}

impl std::fmt::Debug for BitbucketConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitbucketConfig")
            .field("api_base", &self.api_base)
            .field("web_base", &self.web_base)
            .field("username", &self.username)
            .field("app_password", &self.app_password.as_ref().map(|_| REDACTED))
            .finish()
    }
}

impl Default for BitbucketConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.bitbucket.org/2.0".to_string(),
            web_base: "https://bitbucket.org".to_string(),
            username: None,
            app_password: None,
        }
    }
}

impl BitbucketConfig {
    /// Username and app password, when both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.username.as_deref()?, self.app_password.as_deref()?))
    }
}

/// Which pull requests are reviewed and what extra comments are posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewerConfig {
    /// Display name or uuid that must be among the PR's reviewers.
    pub identity: String,
    /// Post a general comment when the description names no ticket key.
    pub ticket_reminder: bool,
    pub ticket_pattern: String,
}

impl Default for ReviewerConfig {
    fn default() -> Self {
        Self {
            identity: DEFAULT_REVIEWER_IDENTITY.to_string(),
            ticket_reminder: false,
            ticket_pattern: r"[A-Z][A-Z0-9]+-\d+".to_string(),
        }
    }
}

/// LLM provider used for analysis.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub provider: ProviderName,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub temperature: f64,
    pub max_tokens: u64,
}

impl std::fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            provider: ProviderName::Anthropic,
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: None,
            api_key: None,
            temperature: 0.7,
            max_tokens: 8192,
        }
    }
}

/// Linked test-sheet lookup.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestStatusConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub range: String,
}

impl std::fmt::Debug for TestStatusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestStatusConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("range", &self.range)
            .finish()
    }
}

impl Default for TestStatusConfig {
    fn default() -> Self {
        Self {
            api_base: crate::test_status::sheets::DEFAULT_SHEETS_API_BASE.to_string(),
            api_key: None,
            range: crate::test_status::sheets::DEFAULT_RANGE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// `explicit` replaces the working-directory `.prweave.toml` lookup
    /// and must exist.
    pub fn load(workdir: Option<&Path>, explicit: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let global = Self::global_config_path();
        let local = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => workdir
                .map(|root| root.join(crate::constants::CONFIG_FILENAME))
                .filter(|p| p.exists()),
        };
        Self::load_layers(global.as_deref(), local.as_deref(), env)
    }

    fn load_layers(
        global: Option<&Path>,
        local: Option<&Path>,
        env: &Env,
    ) -> Result<Self, ConfigError> {
        let mut merged = toml::Table::new();

        if let Some(path) = global.filter(|p| p.exists()) {
            merge_tables(&mut merged, Self::read_table(path)?);
        }
        if let Some(path) = local {
            merge_tables(&mut merged, Self::read_table(path)?);
        }

        let mut config: Config = toml::Value::Table(merged)
            .try_into()
            .map_err(ConfigError::Invalid)?;
        config.apply_env_vars(env);
        Ok(config)
    }

    fn read(path: &Path) -> Result<String, ConfigError> {
        std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
        let content = Self::read(path)?;
        content.parse::<toml::Table>().map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::constants::CONFIG_DIR).join("config.toml"))
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(val) = env.non_empty(ENV_BIND) {
            self.server.bind = val;
        }
        if let Some(val) = env.non_empty(ENV_REPOS_DIR) {
            self.workspace.repos_dir = PathBuf::from(val);
        }
        if let Some(val) = env.non_empty(ENV_OUTPUT_DIR) {
            self.workspace.output_dir = PathBuf::from(val);
        }
        if let Some(val) = env.non_empty(ENV_REVIEWER) {
            self.reviewer.identity = val;
        }
        if let Some(val) = env.non_empty(ENV_BITBUCKET_USERNAME) {
            self.bitbucket.username = Some(val);
        }
        if let Some(val) = env.non_empty(ENV_BITBUCKET_APP_PASSWORD) {
            self.bitbucket.app_password = Some(val);
        }
        if let Some(val) = env.non_empty(ENV_SHEETS_API_KEY) {
            self.test_status.api_key = Some(val);
        }

        if let Some(val) = env.non_empty(ENV_PROVIDER) {
            match val.parse::<ProviderName>() {
                Ok(name) => self.analyzer.provider = name,
                Err(e) => tracing::warn!(variable = ENV_PROVIDER, "ignoring invalid value: {e}"),
            }
        }
        if let Some(val) = env.non_empty(ENV_MODEL) {
            self.analyzer.model = val;
        }
        if let Some(val) = env.non_empty(ENV_BASE_URL) {
            self.analyzer.base_url = Some(val);
        }

        // Provider-specific API key resolution
        let api_key = env
            .non_empty(ENV_API_KEY)
            .or_else(|| env.non_empty(self.analyzer.provider.api_key_env_var()));
        if api_key.is_some() {
            self.analyzer.api_key = api_key;
        }
    }
}

/// Recursively merge `overlay` into `base`. Nested tables merge key by
/// key; any other value in `overlay` replaces the one in `base`.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
