//! Identifier extraction from diffs and definition lookup in the tree.
//!
//! Extraction is purely textual: four regular expressions pull candidate
//! type, function, method-receiver and variable names out of the diff.
//! The [`locator`] then finds each name's declaration among the source
//! files of the checkout.

pub mod locator;

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

pub use locator::{DEFAULT_EXTENSIONS, find_in_content, locate, locate_all};

static TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"type\s+(\w+)\s+struct").expect("valid regex"));

static FUNC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"func\s+(\w+)\s*\(").expect("valid regex"));

/// Captures the receiver type of a method, not the method name.
static METHOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"func\s+\(\w+\s+\*?(\w+)\)\s+\w+\(").expect("valid regex"));

static VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var\s+(\w+)\s+\w+").expect("valid regex"));

/// Candidate identifiers mentioned anywhere in `diff`.
///
/// Added, removed and context lines are all scanned. The set is ordered
/// only so that downstream rendering is deterministic.
pub fn extract_identifiers(diff: &str) -> BTreeSet<String> {
    [&*TYPE_RE, &*FUNC_RE, &*METHOD_RE, &*VAR_RE]
        .into_iter()
        .flat_map(|re| re.captures_iter(diff))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
