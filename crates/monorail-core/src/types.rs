use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Conventional-commit type. Closed set; anything unrecognized parses to
/// [`CommitType::Unknown`] rather than being dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Perf,
    Revert,
    Chore,
    Docs,
    Style,
    Refactor,
    Test,
    Build,
    Ci,
    Unknown,
}

impl CommitType {
    /// Maps a raw type keyword to its variant, falling back to `Unknown`.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "feat" => Self::Feat,
            "fix" => Self::Fix,
            "perf" => Self::Perf,
            "revert" => Self::Revert,
            "chore" => Self::Chore,
            "docs" => Self::Docs,
            "style" => Self::Style,
            "refactor" => Self::Refactor,
            "test" => Self::Test,
            "build" => Self::Build,
            "ci" => Self::Ci,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Perf => "perf",
            Self::Revert => "revert",
            Self::Chore => "chore",
            Self::Docs => "docs",
            Self::Style => "style",
            Self::Refactor => "refactor",
            Self::Test => "test",
            Self::Build => "build",
            Self::Ci => "ci",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// One commit since the last release boundary, already parsed.
///
/// Records are created once and never mutated. `affected_packages` is
/// injected by the changed-file mapper, not derived from the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub short_hash: String,
    pub date: NaiveDate,
    /// Raw first line of the commit message.
    pub subject: String,
    pub kind: CommitType,
    pub scope: Option<String>,
    pub is_breaking: bool,
    pub breaking_body: Option<String>,
    pub affected_packages: BTreeSet<String>,
}

impl CommitRecord {
    #[must_use]
    pub fn affects(&self, package: &str) -> bool {
        self.affected_packages.contains(package)
    }
}

/// Release magnitude resolved from a package's commits.
///
/// The ordering is the semver precedence order, so `max()` over a set of
/// levels yields the winning bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    None,
    Patch,
    Minor,
    Major,
}

impl BumpLevel {
    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        };
        write!(f, "{s}")
    }
}

/// Bump keyword accepted on the command line positional.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpKeyword {
    Patch,
    Minor,
    Major,
    Premajor,
    Preminor,
    Prepatch,
    Prerelease,
}

impl From<BumpLevel> for Option<BumpKeyword> {
    fn from(level: BumpLevel) -> Self {
        match level {
            BumpLevel::None => None,
            BumpLevel::Patch => Some(BumpKeyword::Patch),
            BumpLevel::Minor => Some(BumpKeyword::Minor),
            BumpLevel::Major => Some(BumpKeyword::Major),
        }
    }
}

impl fmt::Display for BumpKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Premajor => "premajor",
            Self::Preminor => "preminor",
            Self::Prepatch => "prepatch",
            Self::Prerelease => "prerelease",
        };
        write!(f, "{s}")
    }
}

/// Repo-wide versioning mode, read once per planning pass.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum VersioningMode {
    /// All packages share one version number.
    #[default]
    Fixed,
    /// Each package's version evolves on its own cadence.
    Independent,
}

/// Minimum bump applied to a package whose dependency bumped, even when it
/// has no commits of its own.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DependencyEscalation {
    #[default]
    Patch,
    Minor,
}

impl From<DependencyEscalation> for BumpLevel {
    fn from(escalation: DependencyEscalation) -> Self {
        match escalation {
            DependencyEscalation::Patch => Self::Patch,
            DependencyEscalation::Minor => Self::Minor,
        }
    }
}

/// One discoverable package in the monorepo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version: Version,
    pub private: bool,
    /// Names of other packages in this repo that this package depends on.
    pub dependencies: Vec<String>,
    pub path: PathBuf,
}

impl PackageInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, version: Version, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            version,
            private: false,
            dependencies: Vec::new(),
            path,
        }
    }
}

/// Outcome of the planning pass for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasedPackage {
    pub name: String,
    pub old_version: Version,
    pub new_version: Version,
    pub bump: BumpLevel,
    /// True when the package had no commits of its own and was escalated
    /// because a dependency bumped.
    pub forced_by_dependency: bool,
    /// Private packages version-bump but are excluded from publish.
    pub private: bool,
}
