//! Translation export log.
//!
//! Every finished translation is appended to a per-day plain-text file,
//! `translations_YYYYMMDD.txt`, as a tab-separated `original\ttranslated`
//! line. The files live under the application data directory and can be
//! opened with any text viewer.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;

/// Appends translations to dated log files under `dir`.
#[derive(Debug, Clone)]
pub struct TranslationLog {
    dir: PathBuf,
}

impl TranslationLog {
    const FILE_PREFIX: &'static str = "translations_";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Append one `original\ttranslated` line to today's log file, creating
    /// the directory and file as needed. Returns the path written to.
    pub fn append(&self, original: &str, translated: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let file_name = format!(
            "{}{}.txt",
            Self::FILE_PREFIX,
            Local::now().format("%Y%m%d")
        );
        let path = self.dir.join(file_name);

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{original}\t{translated}")?;

        log::debug!("export: appended translation to {}", path.display());
        Ok(path)
    }

    /// Path of the most recent log file, if any exist.
    pub fn latest(&self) -> Option<PathBuf> {
        let entries = fs::read_dir(&self.dir).ok()?;
        entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(Self::FILE_PREFIX))
            })
            // Dated file names sort chronologically.
            .max()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn append_writes_tab_separated_line() {
        let dir = tempdir().expect("temp dir");
        let log = TranslationLog::new(dir.path());

        let path = log.append("你好", "hello").expect("append");
        let content = fs::read_to_string(&path).expect("read");

        assert_eq!(content, "你好\thello\n");
        assert!(path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("translations_"));
    }

    #[test]
    fn append_accumulates_lines_in_one_file() {
        let dir = tempdir().expect("temp dir");
        let log = TranslationLog::new(dir.path());

        let first = log.append("一", "one").expect("append");
        let second = log.append("二", "two").expect("append");
        assert_eq!(first, second);

        let content = fs::read_to_string(&first).expect("read");
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn latest_returns_newest_dated_file() {
        let dir = tempdir().expect("temp dir");
        fs::write(dir.path().join("translations_20250101.txt"), "a\tb\n").unwrap();
        fs::write(dir.path().join("translations_20250301.txt"), "c\td\n").unwrap();
        fs::write(dir.path().join("unrelated.txt"), "x\n").unwrap();

        let log = TranslationLog::new(dir.path());
        let latest = log.latest().expect("latest");
        assert!(latest.ends_with("translations_20250301.txt"));
    }

    #[test]
    fn latest_is_none_for_missing_or_empty_dir() {
        let dir = tempdir().expect("temp dir");
        let log = TranslationLog::new(dir.path().join("nope"));
        assert!(log.latest().is_none());

        let empty = TranslationLog::new(dir.path());
        assert!(empty.latest().is_none());
    }
}
