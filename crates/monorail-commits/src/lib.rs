mod parse;

use chrono::NaiveDate;

pub use parse::{parse_commit, parse_commits};

/// One unparsed entry from the commit-log provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub hash: String,
    pub short_hash: String,
    pub date: NaiveDate,
    /// Full commit message, subject line included.
    pub message: String,
}
