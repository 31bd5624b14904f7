use std::path::PathBuf;

use chrono::NaiveDate;

/// One commit from the log, with the files it touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEntry {
    pub hash: String,
    pub short_hash: String,
    pub date: NaiveDate,
    /// Full commit message, subject line included.
    pub message: String,
    /// Paths changed by this commit, relative to the repository root.
    pub changed_files: Vec<PathBuf>,
}

/// A release tag resolved in the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub target: String,
}
