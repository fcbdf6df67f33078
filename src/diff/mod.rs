//! Unified diff reading: changed paths and line counts.

pub mod parser;

pub use parser::{changed_paths, diff_stats};
