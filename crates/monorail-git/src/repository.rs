use std::path::{Path, PathBuf};

use chrono::DateTime;

use crate::error::{GitError, Result};
use crate::types::{CommitEntry, TagInfo};

pub struct Repository {
    inner: git2::Repository,
    root: PathBuf,
}

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::NotARepository`] if the path is not inside a
    /// git repository.
    pub fn open(path: &Path) -> Result<Self> {
        let inner = git2::Repository::discover(path).map_err(|_| GitError::NotARepository {
            path: path.to_path_buf(),
        })?;

        let root = inner.workdir().ok_or_else(|| GitError::NotARepository {
            path: path.to_path_buf(),
        })?;

        // Use dunce to get a path without the \\?\ prefix on Windows
        let root = dunce::simplified(root).to_path_buf();

        Ok(Self { inner, root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Finds the most recent tag starting with `prefix`, by committer
    /// date of the tagged commit. Returns `None` when no release has been
    /// tagged yet.
    ///
    /// # Errors
    ///
    /// Returns an error when tag enumeration fails.
    pub fn last_release_tag(&self, prefix: &str) -> Result<Option<TagInfo>> {
        let names = self.inner.tag_names(None)?;

        let mut best: Option<(i64, TagInfo)> = None;
        for name in names.iter().flatten() {
            if !name.starts_with(prefix) {
                continue;
            }
            let refname = format!("refs/tags/{name}");
            let Ok(reference) = self.inner.find_reference(&refname) else {
                continue;
            };
            let Ok(commit) = reference.peel_to_commit() else {
                continue;
            };
            let when = commit.time().seconds();
            if best.as_ref().is_none_or(|(t, _)| when > *t) {
                best = Some((
                    when,
                    TagInfo {
                        name: name.to_string(),
                        target: commit.id().to_string(),
                    },
                ));
            }
        }

        Ok(best.map(|(_, tag)| tag))
    }

    /// Walks the log from HEAD back to (but excluding) `since`, newest
    /// first, collecting each commit's changed files.
    ///
    /// With `since = None` the whole history is returned. An empty range
    /// (HEAD is the tagged commit) yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] when `since` does not resolve,
    /// and [`GitError::Git`] for underlying walk or diff failures.
    pub fn commits_since(&self, since: Option<&str>) -> Result<Vec<CommitEntry>> {
        if self.inner.head().is_err() {
            // Unborn branch: no commits yet.
            return Ok(Vec::new());
        }

        let mut walk = self.inner.revwalk()?;
        walk.push_head()?;
        walk.set_sorting(git2::Sort::TIME)?;

        if let Some(refspec) = since {
            let object = self
                .inner
                .revparse_single(refspec)
                .map_err(|_| GitError::RefNotFound {
                    refspec: refspec.to_string(),
                })?;
            walk.hide(object.peel_to_commit()?.id())?;
        }

        let mut entries = Vec::new();
        for oid in walk {
            let oid = oid?;
            let commit = self.inner.find_commit(oid)?;
            entries.push(self.entry_for(&commit)?);
        }

        Ok(entries)
    }

    fn entry_for(&self, commit: &git2::Commit<'_>) -> Result<CommitEntry> {
        let hash = commit.id().to_string();
        let short_hash = commit
            .as_object()
            .short_id()?
            .as_str()
            .unwrap_or(&hash[..7.min(hash.len())])
            .to_string();

        let date = DateTime::from_timestamp(commit.time().seconds(), 0)
            .map(|dt| dt.date_naive())
            .unwrap_or_default();

        let message = commit.message().unwrap_or_default().to_string();
        let changed_files = self.changed_files(commit)?;

        Ok(CommitEntry {
            hash,
            short_hash,
            date,
            message,
            changed_files,
        })
    }

    fn changed_files(&self, commit: &git2::Commit<'_>) -> Result<Vec<PathBuf>> {
        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };

        let diff = self
            .inner
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            if let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }
}
