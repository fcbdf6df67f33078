//! Locate the declaration of an identifier in the source tree.
//!
//! Matching is line-oriented. Once a declaration line is found, the
//! following lines are appended until the net `{`/`}` count returns to
//! zero. A declaration whose braces never balance before end of file is
//! discarded and the scan moves on.
//!
//! Files are visited in name-sorted order and the first match wins, so
//! an identifier declared in several files resolves to the
//! alphabetically first one.

use std::collections::BTreeSet;
use std::path::Path;

use crate::models::{DefinitionKind, DefinitionRecord};
use crate::walk;

/// Source extensions searched when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["go"];

/// Find the first declaration of `identifier` under `root`.
pub fn locate(root: &Path, identifier: &str, extensions: &[String]) -> Option<DefinitionRecord> {
    source_files(root, extensions).into_iter().find_map(|(file, content)| {
        find_in_content(&content, identifier).map(|(kind, span)| DefinitionRecord {
            kind,
            name: identifier.to_string(),
            file,
            span,
            references: Vec::new(),
        })
    })
}

/// Locate every identifier, reading each source file once.
///
/// Identifiers without a declaration are skipped. `references` lists the
/// other identifiers of the set that the span mentions.
pub fn locate_all(
    root: &Path,
    identifiers: &BTreeSet<String>,
    extensions: &[String],
) -> Vec<DefinitionRecord> {
    if identifiers.is_empty() {
        return Vec::new();
    }
    let files = source_files(root, extensions);

    identifiers
        .iter()
        .filter_map(|identifier| {
            let found = files.iter().find_map(|(file, content)| {
                find_in_content(content, identifier).map(|hit| (file, hit))
            });
            if found.is_none() {
                tracing::debug!(identifier, "no definition found");
            }
            let (file, (kind, span)) = found?;
            let references = identifiers
                .iter()
                .filter(|other| *other != identifier && mentions(&span, other))
                .cloned()
                .collect();
            Some(DefinitionRecord {
                kind,
                name: identifier.clone(),
                file: file.clone(),
                span,
                references,
            })
        })
        .collect()
}

/// Scan one file's content for the declaration of `identifier`.
///
/// Returns the kind and the brace-balanced span.
pub fn find_in_content(content: &str, identifier: &str) -> Option<(DefinitionKind, String)> {
    let lines: Vec<&str> = content.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        if !line.contains(identifier) {
            continue;
        }
        let Some(kind) = classify(line, identifier) else {
            continue;
        };
        if kind == DefinitionKind::Function && !line.contains('{') {
            // Forward declaration or signature split over lines.
            continue;
        }
        if let Some(span) = balanced_span(&lines, i) {
            return Some((kind, span));
        }
    }
    None
}

fn classify(line: &str, identifier: &str) -> Option<DefinitionKind> {
    if line.contains(&format!("type {identifier} struct"))
        || line.contains(&format!("type {identifier} interface"))
    {
        return Some(DefinitionKind::Type);
    }

    let trimmed = line.trim_start();
    if trimmed.starts_with("func") {
        let named = line.contains(&format!(" {identifier}("));
        let receiver = trimmed.starts_with("func (")
            && (line.contains(&format!("*{identifier})")) || line.contains(&format!(" {identifier})")));
        if named || receiver {
            return Some(DefinitionKind::Function);
        }
    }

    if line.contains(&format!("var {identifier} ")) {
        return Some(DefinitionKind::Variable);
    }
    None
}

/// Lines from `start` until braces balance. `None` if they never do.
fn balanced_span(lines: &[&str], start: usize) -> Option<String> {
    let mut depth = brace_delta(lines[start]);
    let mut end = start;
    while depth > 0 && end + 1 < lines.len() {
        end += 1;
        depth += brace_delta(lines[end]);
    }
    (depth == 0).then(|| lines[start..=end].join("\n"))
}

fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// Whole-word occurrence of `name` in `text`.
fn mentions(text: &str, name: &str) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    text.match_indices(name).any(|(idx, _)| {
        let before = text[..idx].chars().next_back();
        let after = text[idx + name.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

/// `(relative path, content)` of every readable source file under `root`.
fn source_files(root: &Path, extensions: &[String]) -> Vec<(String, String)> {
    let entries = match walk::files(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "cannot walk tree for definitions");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| {
            let rel = walk::relative(root, entry.path());
            if !extensions.iter().any(|ext| ext == walk::extension(&rel)) {
                return None;
            }
            match std::fs::read_to_string(entry.path()) {
                Ok(content) => Some((rel, content)),
                Err(e) => {
                    tracing::debug!(file = %rel, error = %e, "skipping unreadable source file");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER_GO: &str = "\
package server

type Server struct {
\taddr string
\topts Options
}

func NewServer(addr string) *Server {
\treturn &Server{addr: addr}
}

func (s *Server) Start() error {
\tif s.addr == \"\" {
\t\treturn nil
\t}
\treturn nil
}

var DefaultAddr = \":8080\"
";

    fn exts() -> Vec<String> {
        vec!["go".to_string()]
    }

    #[test]
    fn finds_struct_span() {
        let (kind, span) = find_in_content(SERVER_GO, "Server").unwrap();
        assert_eq!(kind, DefinitionKind::Type);
        assert_eq!(span, "type Server struct {\n\taddr string\n\topts Options\n}");
    }

    #[test]
    fn finds_function_with_nested_braces() {
        let (kind, span) = find_in_content(SERVER_GO, "Start").unwrap();
        assert_eq!(kind, DefinitionKind::Function);
        assert!(span.starts_with("func (s *Server) Start() error {"));
        assert!(span.ends_with("\treturn nil\n}"));
        assert_eq!(brace_delta(&span), 0);
    }

    #[test]
    fn finds_variable_on_one_line() {
        let (kind, span) = find_in_content(SERVER_GO, "DefaultAddr").unwrap();
        assert_eq!(kind, DefinitionKind::Variable);
        assert_eq!(span, "var DefaultAddr = \":8080\"");
    }

    #[test]
    fn receiver_matches_value_receivers() {
        let src = "func (c Client) Do() {\n}\n";
        let (kind, _) = find_in_content(src, "Client").unwrap();
        assert_eq!(kind, DefinitionKind::Function);
    }

    #[test]
    fn unbalanced_declaration_is_discarded() {
        let src = "type Broken struct {\n\tx int\n";
        assert!(find_in_content(src, "Broken").is_none());
    }

    #[test]
    fn unbalanced_match_does_not_stop_the_scan() {
        let src = "func Run() {\n\tif x {\n}\n";
        // Net depth never reaches zero, so nothing is returned.
        assert!(find_in_content(src, "Run").is_none());

        let src = "func Run() { // }}\nfunc Run() {\n}\n";
        let (_, span) = find_in_content(src, "Run").unwrap();
        assert_eq!(span, "func Run() {\n}");
    }

    #[test]
    fn signature_without_brace_is_skipped() {
        let src = "func Split(a,\n\tb int) {\n}\nfunc Split() {\n}\n";
        let (_, span) = find_in_content(src, "Split").unwrap();
        assert_eq!(span, "func Split() {\n}");
    }

    #[test]
    fn locate_is_idempotent_and_first_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("b")).unwrap();
        std::fs::write(dir.path().join("a.go"), "type Dup struct {\n\tA int\n}\n").unwrap();
        std::fs::write(dir.path().join("b/dup.go"), "type Dup struct {\n\tB int\n}\n").unwrap();

        let first = locate(dir.path(), "Dup", &exts()).unwrap();
        let second = locate(dir.path(), "Dup", &exts()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.file, "a.go");
        assert!(first.span.contains("A int"));
    }

    #[test]
    fn locate_ignores_other_extensions_and_vendor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("vendor")).unwrap();
        std::fs::write(dir.path().join("vendor/x.go"), "type V struct {\n}\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "type V struct {\n}\n").unwrap();
        assert!(locate(dir.path(), "V", &exts()).is_none());
    }

    #[test]
    fn locate_all_fills_references() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("server.go"), SERVER_GO).unwrap();
        let ids: BTreeSet<String> = ["Server", "NewServer", "Missing"]
            .into_iter()
            .map(String::from)
            .collect();

        let records = locate_all(dir.path(), &ids, &exts());
        assert_eq!(records.len(), 2);

        let ctor = records.iter().find(|r| r.name == "NewServer").unwrap();
        assert_eq!(ctor.file, "server.go");
        assert_eq!(ctor.references, vec!["Server".to_string()]);

        let ty = records.iter().find(|r| r.name == "Server").unwrap();
        assert!(ty.references.is_empty(), "NewServer is not a whole word in the struct");
    }
}
