//! Parsing of `git log` and `git show --name-only` output.

use crate::models::CommitInfo;

/// Pretty format passed to `git log`; fields are split on `|`.
pub const LOG_FORMAT: &str = "--pretty=format:%H|%an|%ad|%s";

/// Parse `%H|%an|%ad|%s` lines into commits.
///
/// The subject is the remainder after the third `|`, so subjects that
/// contain the separator survive intact. Lines with fewer than four
/// fields are skipped. `files_changed` is left empty.
pub fn parse_log(output: &str) -> Vec<CommitInfo> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut parts = line.splitn(4, '|');
            let hash = parts.next()?;
            let author = parts.next()?;
            let date = parts.next()?;
            let subject = parts.next()?;
            Some(CommitInfo {
                hash: hash.to_string(),
                author: author.to_string(),
                date: date.to_string(),
                subject: subject.to_string(),
                files_changed: Vec::new(),
            })
        })
        .collect()
}

/// Parse a newline-separated path list, dropping blank lines.
pub fn parse_name_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_log_lines() {
        let out = "abc123|Ada|2024-05-01|Fix retry loop\n\
                   def456|Linus|2024-04-28|Merge a|b fix\n";
        let commits = parse_log(out);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "abc123");
        assert_eq!(commits[0].author, "Ada");
        assert_eq!(commits[0].date, "2024-05-01");
        assert_eq!(commits[0].subject, "Fix retry loop");
        assert_eq!(commits[1].subject, "Merge a|b fix");
    }

    #[test]
    fn skips_malformed_lines() {
        let commits = parse_log("garbage\n\nabc|x|2024-01-01|ok");
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].subject, "ok");
    }

    #[test]
    fn name_list_drops_blanks() {
        assert_eq!(parse_name_list("\na.go\n\nb/c.go\n"), vec!["a.go", "b/c.go"]);
    }
}
