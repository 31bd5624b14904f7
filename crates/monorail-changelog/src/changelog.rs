use std::io::Write as _;
use std::path::Path;

use crate::error::{ChangelogError, Result};

/// Canonical preamble of every generated changelog document.
pub const CHANGELOG_HEADER: &str = "# Change Log

All notable changes to this project will be documented in this file.
See [Conventional Commits](https://conventionalcommits.org) for commit guidelines.
";

/// One package's changelog document.
///
/// The document is a single canonical header followed by release sections,
/// newest first. Merging prepends the new section below the header and
/// above all prior content; the header is never duplicated.
#[derive(Debug, Clone, Default)]
pub struct Changelog {
    content: String,
}

impl Changelog {
    /// Reads the document at `path`, or starts an empty one when the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::Read` for any I/O failure other than the
    /// file being absent.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self { content }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ChangelogError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Merges a freshly rendered release section into the document.
    ///
    /// The existing body keeps every prior release entry; only a leading
    /// copy of the canonical header is stripped before re-assembly.
    pub fn prepend_section(&mut self, section: &str) {
        let historical = self
            .content
            .strip_prefix(CHANGELOG_HEADER)
            .unwrap_or(&self.content)
            .trim_start_matches('\n');

        let mut merged =
            String::with_capacity(CHANGELOG_HEADER.len() + section.len() + historical.len() + 4);
        merged.push_str(CHANGELOG_HEADER);
        merged.push('\n');
        merged.push_str(section);
        if !historical.is_empty() {
            if !merged.ends_with('\n') {
                merged.push('\n');
            }
            merged.push('\n');
            merged.push_str(historical);
        }

        self.content = merged;
    }

    /// Writes the document as a whole-file replacement.
    ///
    /// The content goes to a temporary file in the target directory first
    /// and is renamed into place, so a failed write never leaves a
    /// truncated changelog behind.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::Write` if the file cannot be written.
    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        let write_err = |source: std::io::Error| ChangelogError::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(self.content.as_bytes()).map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}
