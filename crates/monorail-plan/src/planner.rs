use semver::Version;
use tracing::{debug, info};

use monorail_core::{BumpKeyword, PackageInfo, ReleasedPackage};
use monorail_version::{apply_build_metadata, increment, parse_greater};

use crate::error::{PlanError, Result};
use crate::prompt::{PromptProvider, TextContract, TextInput, VersionChoice, VersionSelection};
use crate::resolver::BumpDecision;

/// An explicit version request from the command line. Its presence
/// short-circuits all prompting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplicitVersion {
    Keyword(BumpKeyword),
    Exact(Version),
}

/// Inputs that shape one planning pass, beyond the bump decisions.
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    pub explicit: Option<ExplicitVersion>,
    pub prerelease_id: Option<String>,
    pub build_metadata: Option<String>,
}

const MENU_KEYWORDS: [BumpKeyword; 6] = [
    BumpKeyword::Patch,
    BumpKeyword::Minor,
    BumpKeyword::Major,
    BumpKeyword::Prepatch,
    BumpKeyword::Preminor,
    BumpKeyword::Premajor,
];

/// Decides the next version for every package in the release set.
///
/// Packages are handled strictly sequentially; at most one prompt is
/// outstanding at any time. A cancelled prompt unwinds without touching
/// the package it was issued for (earlier packages keep their already
/// assigned versions).
pub struct VersionPlanner<'a> {
    prompt: Option<&'a dyn PromptProvider>,
}

impl<'a> VersionPlanner<'a> {
    /// A planner that accepts every suggestion without prompting.
    #[must_use]
    pub fn non_interactive() -> Self {
        Self { prompt: None }
    }

    #[must_use]
    pub fn with_prompt(prompt: &'a dyn PromptProvider) -> Self {
        Self { prompt: Some(prompt) }
    }

    /// Assigns the next version to every package in the release set and
    /// returns the old/new tuples for downstream consumers.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnknownPackage`] when a decision names a
    /// package that is not in the set, [`PlanError::Cancelled`] when a
    /// prompt is declined, and version errors for invalid arithmetic
    /// inputs.
    pub fn plan(
        &self,
        packages: &mut [PackageInfo],
        decisions: &[BumpDecision],
        request: &PlanRequest,
    ) -> Result<Vec<ReleasedPackage>> {
        let mut released = Vec::with_capacity(decisions.len());

        for decision in decisions {
            let package = packages
                .iter_mut()
                .find(|p| p.name == decision.name)
                .ok_or_else(|| PlanError::UnknownPackage {
                    name: decision.name.clone(),
                })?;

            let current = package.version.clone();
            let chosen = self.choose_version(package, decision, request)?;
            let new_version = finalize(&chosen, request.build_metadata.as_deref())?;

            info!(
                package = %package.name,
                old = %current,
                new = %new_version,
                "version planned"
            );

            package.version = new_version.clone();
            released.push(ReleasedPackage {
                name: package.name.clone(),
                old_version: current,
                new_version,
                bump: decision.level,
                forced_by_dependency: decision.forced,
                private: package.private,
            });
        }

        Ok(released)
    }

    fn choose_version(
        &self,
        package: &PackageInfo,
        decision: &BumpDecision,
        request: &PlanRequest,
    ) -> Result<Version> {
        let current = &package.version;
        let preid = request.prerelease_id.as_deref();

        // Explicit version/bump arguments short-circuit all prompting.
        match &request.explicit {
            Some(ExplicitVersion::Exact(version)) => return Ok(version.clone()),
            Some(ExplicitVersion::Keyword(keyword)) => {
                return Ok(increment(current, *keyword, preid)?);
            }
            None => {}
        }

        let suggested_keyword =
            Option::<BumpKeyword>::from(decision.level).unwrap_or(BumpKeyword::Patch);
        let suggestion = increment(current, suggested_keyword, preid)?;

        let Some(prompt) = self.prompt else {
            return Ok(suggestion);
        };

        debug!(package = %package.name, suggestion = %suggestion, "prompting for version");

        let mut choices = Vec::with_capacity(MENU_KEYWORDS.len() + 2);
        for keyword in MENU_KEYWORDS {
            choices.push(VersionChoice::Bump {
                keyword,
                preview: increment(current, keyword, preid)?,
            });
        }
        choices.push(VersionChoice::CustomPrerelease);
        choices.push(VersionChoice::CustomVersion);

        let message = format!(
            "Select a new version for {} (currently {current})",
            package.name
        );

        match prompt.select_version(&message, &choices)? {
            VersionSelection::Selected(VersionChoice::Bump { keyword, .. }) => {
                Ok(increment(current, keyword, preid)?)
            }
            VersionSelection::Selected(VersionChoice::CustomPrerelease) => {
                self.prompt_prerelease(prompt, current, request)
            }
            VersionSelection::Selected(VersionChoice::CustomVersion) => {
                self.prompt_custom(prompt, current, request)
            }
            VersionSelection::Cancelled => Err(PlanError::Cancelled),
        }
    }

    fn prompt_prerelease(
        &self,
        prompt: &dyn PromptProvider,
        current: &Version,
        request: &PlanRequest,
    ) -> Result<Version> {
        let metadata = request.build_metadata.as_deref();
        let filter = |input: &str| -> String {
            let id = input.trim();
            match increment(current, BumpKeyword::Prerelease, Some(id)) {
                Ok(version) => apply_build_metadata(&version.to_string(), metadata),
                // Leave the raw input for validate to reject, so the
                // provider re-prompts instead of aborting.
                Err(_) => input.to_string(),
            }
        };
        let validate = |candidate: &str| -> Result<()> {
            Version::parse(candidate)
                .map(|_| ())
                .map_err(|source| {
                    PlanError::Version(monorail_version::VersionError::InvalidVersion {
                        input: candidate.to_string(),
                        source,
                    })
                })
        };

        let contract = TextContract {
            filter: &filter,
            validate: &validate,
        };
        match prompt.input_text("Enter a prerelease identifier", &contract)? {
            TextInput::Provided(value) => parse_final(&value),
            TextInput::Cancelled => Err(PlanError::Cancelled),
        }
    }

    fn prompt_custom(
        &self,
        prompt: &dyn PromptProvider,
        current: &Version,
        request: &PlanRequest,
    ) -> Result<Version> {
        let metadata = request.build_metadata.as_deref();
        let filter =
            |input: &str| -> String { apply_build_metadata(input.trim(), metadata) };
        let validate = |candidate: &str| -> Result<()> {
            parse_greater(candidate, current)
                .map(|_| ())
                .map_err(PlanError::Version)
        };

        let contract = TextContract {
            filter: &filter,
            validate: &validate,
        };
        match prompt.input_text("Enter a custom version", &contract)? {
            TextInput::Provided(value) => parse_final(&value),
            TextInput::Cancelled => Err(PlanError::Cancelled),
        }
    }
}

fn finalize(chosen: &Version, metadata: Option<&str>) -> Result<Version> {
    if metadata.is_none() {
        return Ok(chosen.clone());
    }
    // Reapplying over a custom value that already carries the metadata is
    // idempotent; only the portion after '+' is replaced.
    parse_final(&apply_build_metadata(&chosen.to_string(), metadata))
}

fn parse_final(value: &str) -> Result<Version> {
    Version::parse(value).map_err(|source| {
        PlanError::Version(monorail_version::VersionError::InvalidVersion {
            input: value.to_string(),
            source,
        })
    })
}
