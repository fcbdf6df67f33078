//! prweave — pull request review bundles for automated reviewers (library crate).
//!
//! Re-exports public modules for integration tests and the binary.

pub mod analyzer;
pub mod bundle;
pub mod codec;
pub mod config;
pub mod constants;
pub mod context;
pub mod diff;
pub mod env;
pub mod extract;
pub mod git;
pub mod history;
pub mod models;
pub mod pipeline;
pub mod profile;
pub mod publish;
pub mod server;
pub mod summary;
pub mod test_status;
pub mod walk;
