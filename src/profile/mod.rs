//! Architecture profiling of a checkout.
//!
//! Walks the working tree once, classifying each file as source, schema
//! or config, and collects import edges and HTTP route registrations
//! from the source files. Analysis is textual; a file whose imports
//! cannot be parsed is skipped.

pub mod imports;
pub mod languages;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::ArchitectureSnapshot;
use crate::walk;

pub use languages::{format_language_stats, language_for_extension, language_stats};

/// Extensions treated as config regardless of path.
const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "json", "toml"];

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("cannot walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// How a file participates in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileClass {
    Source,
    Schema,
    Config,
}

fn classify(rel: &str, source_extensions: &[String]) -> Option<FileClass> {
    let ext = walk::extension(rel);
    if source_extensions.iter().any(|e| e == ext) {
        Some(FileClass::Source)
    } else if ext == "sql" {
        Some(FileClass::Schema)
    } else if rel.contains("config") || CONFIG_EXTENSIONS.contains(&ext) {
        Some(FileClass::Config)
    } else {
        None
    }
}

/// Build the architecture snapshot of `root`.
///
/// Fails only when `root` itself cannot be walked.
pub fn profile(root: &Path, source_extensions: &[String]) -> Result<ArchitectureSnapshot, ProfileError> {
    let entries = walk::files(root).map_err(|source| ProfileError::Walk {
        path: root.to_path_buf(),
        source,
    })?;

    let mut snapshot = ArchitectureSnapshot::default();

    for entry in entries {
        let rel = walk::relative(root, entry.path());
        match classify(&rel, source_extensions) {
            Some(FileClass::Source) => {
                let Ok(source) = std::fs::read_to_string(entry.path()) else {
                    continue;
                };
                let Ok(file_imports) = imports::parse_imports(&source) else {
                    tracing::debug!(file = %rel, "skipping file with unterminated import block");
                    continue;
                };
                snapshot.dependencies.extend(file_imports.iter().cloned());
                snapshot.import_graph.insert(rel, file_imports);
                snapshot.endpoints.extend(imports::parse_routes(&source));
            }
            Some(FileClass::Schema) => snapshot.schema_files.push(rel),
            Some(FileClass::Config) => snapshot.config_files.push(rel),
            None => {}
        }
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go() -> Vec<String> {
        vec!["go".to_string()]
    }

    #[test]
    fn classification_first_match_wins() {
        assert_eq!(classify("config/loader.go", &go()), Some(FileClass::Source));
        assert_eq!(classify("db/config.sql", &go()), Some(FileClass::Schema));
        assert_eq!(classify("deploy/app.yml", &go()), Some(FileClass::Config));
        assert_eq!(classify("configs/README", &go()), Some(FileClass::Config));
        assert_eq!(classify("README.md", &go()), None);
    }

    #[test]
    fn profiles_a_small_service() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("db")).unwrap();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::write(
            root.join("main.go"),
            "package main\n\nimport (\n\t\"fmt\"\n\t\"net/http\"\n)\n\nfunc main() {\n\thttp.HandleFunc(\"/health\", h)\n}\n",
        )
        .unwrap();
        std::fs::write(root.join("util.go"), "package main\n\nimport \"fmt\"\n").unwrap();
        std::fs::write(root.join("broken.go"), "package main\nimport (\n\t\"os\"\n").unwrap();
        std::fs::write(root.join("db/schema.sql"), "create table t();").unwrap();
        std::fs::write(root.join("app.yaml"), "port: 1").unwrap();
        std::fs::write(root.join(".git/config"), "[core]").unwrap();

        let snapshot = profile(root, &go()).unwrap();
        assert_eq!(
            snapshot.dependencies.iter().collect::<Vec<_>>(),
            vec!["fmt", "net/http"]
        );
        assert_eq!(snapshot.import_graph["util.go"], vec!["fmt"]);
        assert!(!snapshot.import_graph.contains_key("broken.go"));
        assert_eq!(snapshot.endpoints, vec!["/health"]);
        assert_eq!(snapshot.schema_files, vec!["db/schema.sql"]);
        assert_eq!(snapshot.config_files, vec!["app.yaml"]);
    }

    #[test]
    fn unwalkable_root_is_an_error() {
        assert!(profile(Path::new("/no/such/root"), &go()).is_err());
    }
}
