//! Append-only side-channel log for visualization failures.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};

/// Appends one timestamped `Error:` line to the log at `path`, creating the
/// file when needed.
pub fn append(path: &Path, message: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(
        file,
        "[{}] Error: {message}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.log");

        append(&path, "first failure").unwrap();
        append(&path, "second failure").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] Error: first failure"));
        assert!(lines[1].ends_with("] Error: second failure"));
    }
}
