//! Textual parsing of Go import declarations and route registrations.

use std::sync::LazyLock;

use regex::Regex;

/// `import "x"`, `import alias "x"`, `import _ "x"`, `import . "x"`.
static SINGLE_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^import\s+(?:[\w.]+\s+)?(?:"([^"]+)"|`([^`]+)`)"#).expect("valid regex")
});

/// One spec line inside an `import ( ... )` block.
static BLOCK_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:[\w.]+\s+)?(?:"([^"]+)"|`([^`]+)`)"#).expect("valid regex")
});

/// `x.HandleFunc("/path", ...)` / `x.Handle(`/path`, ...)`.
static ROUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.(?:HandleFunc|Handle)\(\s*(?:"((?:[^"\\]|\\.)*)"|`([^`]*)`)"#)
        .expect("valid regex")
});

/// An `import (` block that never closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnterminatedImportBlock;

fn first_capture(caps: &regex::Captures<'_>) -> Option<String> {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Import paths declared by a Go source file, in declaration order.
///
/// Scanning stops at the first top-level `func`, since imports must
/// precede declarations.
pub fn parse_imports(source: &str) -> Result<Vec<String>, UnterminatedImportBlock> {
    let mut imports = Vec::new();
    let mut in_block = false;

    for raw in source.lines() {
        let line = raw.trim();

        if in_block {
            if line.starts_with(')') {
                in_block = false;
            } else if let Some(caps) = BLOCK_IMPORT_RE.captures(line) {
                imports.extend(first_capture(&caps));
            }
            continue;
        }

        if raw.starts_with("func ") {
            break;
        }
        if let Some(rest) = line.strip_prefix("import") {
            if rest.trim_start().starts_with('(') {
                let inner = rest.trim_start()[1..].trim();
                // `import ("fmt")` on one line.
                if let Some(inner) = inner.strip_suffix(')') {
                    if let Some(caps) = BLOCK_IMPORT_RE.captures(inner.trim()) {
                        imports.extend(first_capture(&caps));
                    }
                } else {
                    in_block = true;
                }
            } else if let Some(caps) = SINGLE_IMPORT_RE.captures(line) {
                imports.extend(first_capture(&caps));
            }
        }
    }

    if in_block {
        Err(UnterminatedImportBlock)
    } else {
        Ok(imports)
    }
}

/// Route literals passed to `Handle` / `HandleFunc` registrations.
pub fn parse_routes(source: &str) -> Vec<String> {
    ROUTE_RE
        .captures_iter(source)
        .filter_map(|caps| first_capture(&caps))
        .collect()
}
