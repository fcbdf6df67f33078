//! Configuration loading and layering.
//!
//! Handles global and `.prweave.toml` loading, environment variable
//! resolution, and merging with proper priority ordering.

pub mod loader;

pub use loader::{
    AnalyzerConfig, BitbucketConfig, Config, ConfigError, ReviewerConfig, ServerConfig,
    TestStatusConfig, WorkspaceConfig,
};
