use std::fmt;

use semver::Version;

use monorail_core::BumpKeyword;

use crate::error::Result;

/// One entry in the version-selection menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionChoice {
    /// A concrete bump with its precomputed resulting version.
    Bump {
        keyword: BumpKeyword,
        preview: Version,
    },
    /// Prompt for a prerelease identifier and derive the version from it.
    CustomPrerelease,
    /// Prompt for a free-form version string.
    CustomVersion,
}

impl fmt::Display for VersionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bump { keyword, preview } => write!(f, "{keyword} ({preview})"),
            Self::CustomPrerelease => write!(f, "custom prerelease"),
            Self::CustomVersion => write!(f, "custom version"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelection {
    Selected(VersionChoice),
    Cancelled,
}

/// Contract for a free-text prompt: `filter` maps raw input to a candidate
/// version string, `validate` must accept the filtered value before the
/// planner takes it. Providers re-prompt while `validate` rejects.
pub struct TextContract<'a> {
    pub filter: &'a dyn Fn(&str) -> String,
    pub validate: &'a dyn Fn(&str) -> Result<()>,
}

/// Result of a free-text prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    /// The filtered, validated value.
    Provided(String),
    Cancelled,
}

/// Human I/O boundary for the version planner.
///
/// Prompts are strictly sequential: the planner never issues the next
/// prompt before the previous one resolved, because the terminal is a
/// shared resource and earlier answers influence later defaults.
pub trait PromptProvider: Send + Sync {
    /// Presents the choice menu and blocks until a selection returns.
    ///
    /// # Errors
    ///
    /// Returns an error when the prompt itself cannot be displayed or
    /// read; a human declining is `VersionSelection::Cancelled`, not an
    /// error.
    fn select_version(&self, message: &str, choices: &[VersionChoice]) -> Result<VersionSelection>;

    /// Prompts for free text under the given contract, re-prompting while
    /// validation rejects the filtered input.
    ///
    /// # Errors
    ///
    /// Returns an error when the prompt itself cannot be displayed or
    /// read.
    fn input_text(&self, message: &str, contract: &TextContract<'_>) -> Result<TextInput>;
}
