use semver::{BuildMetadata, Prerelease, Version};

use monorail_core::BumpKeyword;

use crate::error::{Result, VersionError};

const DEFAULT_PRERELEASE_ID: &str = "alpha";

/// Computes the next version for `current` under the given bump keyword.
///
/// Follows the release-tool conventions for prerelease versions: a plain
/// `patch`/`minor`/`major` bump on a prerelease graduates it (so
/// `1.1.0-alpha.0` + `minor` is `1.1.0`), `prerelease` on a stable version
/// behaves like `prepatch`, and `prerelease` on a prerelease increments
/// its trailing counter. Build metadata is never carried over; the
/// augmenter reapplies it.
///
/// # Errors
///
/// Returns [`VersionError::InvalidPrereleaseId`] when `prerelease_id` is
/// not a valid identifier.
pub fn increment(
    current: &Version,
    bump: BumpKeyword,
    prerelease_id: Option<&str>,
) -> Result<Version> {
    let id = prerelease_id.unwrap_or(DEFAULT_PRERELEASE_ID);

    let next = match bump {
        BumpKeyword::Major => {
            if !current.pre.is_empty() && current.minor == 0 && current.patch == 0 {
                bare(current.major, 0, 0)
            } else {
                bare(current.major + 1, 0, 0)
            }
        }
        BumpKeyword::Minor => {
            if !current.pre.is_empty() && current.patch == 0 {
                bare(current.major, current.minor, 0)
            } else {
                bare(current.major, current.minor + 1, 0)
            }
        }
        BumpKeyword::Patch => {
            if current.pre.is_empty() {
                bare(current.major, current.minor, current.patch + 1)
            } else {
                bare(current.major, current.minor, current.patch)
            }
        }
        BumpKeyword::Premajor => with_pre(current.major + 1, 0, 0, &first_prerelease(id)?)?,
        BumpKeyword::Preminor => {
            with_pre(current.major, current.minor + 1, 0, &first_prerelease(id)?)?
        }
        BumpKeyword::Prepatch => with_pre(
            current.major,
            current.minor,
            current.patch + 1,
            &first_prerelease(id)?,
        )?,
        BumpKeyword::Prerelease => {
            if current.pre.is_empty() {
                with_pre(
                    current.major,
                    current.minor,
                    current.patch + 1,
                    &first_prerelease(id)?,
                )?
            } else {
                with_pre(
                    current.major,
                    current.minor,
                    current.patch,
                    &next_prerelease(current.pre.as_str(), prerelease_id)?,
                )?
            }
        }
    };

    Ok(next)
}

/// Parses a candidate version string supplied by a human.
///
/// # Errors
///
/// Returns [`VersionError::InvalidVersion`] when the string does not
/// parse, and [`VersionError::NotGreater`] when it does not sort after
/// `current` (build metadata is ignored for the comparison, per semver
/// precedence).
pub fn parse_greater(candidate: &str, current: &Version) -> Result<Version> {
    let parsed = Version::parse(candidate).map_err(|source| VersionError::InvalidVersion {
        input: candidate.to_string(),
        source,
    })?;

    let mut comparable = parsed.clone();
    comparable.build = BuildMetadata::EMPTY;
    let mut current_comparable = current.clone();
    current_comparable.build = BuildMetadata::EMPTY;

    if comparable <= current_comparable {
        return Err(VersionError::NotGreater {
            candidate: candidate.to_string(),
            current: current.to_string(),
        });
    }

    Ok(parsed)
}

fn bare(major: u64, minor: u64, patch: u64) -> Version {
    Version::new(major, minor, patch)
}

fn with_pre(major: u64, minor: u64, patch: u64, pre: &str) -> Result<Version> {
    let mut version = Version::new(major, minor, patch);
    version.pre = Prerelease::new(pre).map_err(|source| VersionError::InvalidPrereleaseId {
        id: pre.to_string(),
        source,
    })?;
    Ok(version)
}

fn first_prerelease(id: &str) -> Result<String> {
    // Validate the bare identifier before composing `id.0`.
    Prerelease::new(id).map_err(|source| VersionError::InvalidPrereleaseId {
        id: id.to_string(),
        source,
    })?;
    Ok(format!("{id}.0"))
}

fn next_prerelease(current_pre: &str, requested_id: Option<&str>) -> Result<String> {
    let parts: Vec<&str> = current_pre.split('.').collect();

    if let Some(id) = requested_id {
        // A different identifier restarts the counter.
        if parts.first() != Some(&id) {
            return first_prerelease(id);
        }
    }

    match parts.last().and_then(|p| p.parse::<u64>().ok()) {
        Some(counter) => {
            let mut next = parts[..parts.len() - 1].join(".");
            if !next.is_empty() {
                next.push('.');
            }
            next.push_str(&(counter + 1).to_string());
            Ok(next)
        }
        None => Ok(format!("{current_pre}.0")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).expect("valid version")
    }

    #[test]
    fn standard_bumps() {
        assert_eq!(increment(&v("1.0.0"), BumpKeyword::Patch, None).expect("ok"), v("1.0.1"));
        assert_eq!(increment(&v("1.0.0"), BumpKeyword::Minor, None).expect("ok"), v("1.1.0"));
        assert_eq!(increment(&v("1.2.3"), BumpKeyword::Major, None).expect("ok"), v("2.0.0"));
    }

    #[test]
    fn minor_resets_patch() {
        assert_eq!(increment(&v("1.2.3"), BumpKeyword::Minor, None).expect("ok"), v("1.3.0"));
    }

    #[test]
    fn prerelease_on_stable_acts_as_prepatch() {
        assert_eq!(
            increment(&v("1.0.0"), BumpKeyword::Prerelease, Some("alpha")).expect("ok"),
            v("1.0.1-alpha.0")
        );
    }

    #[test]
    fn prerelease_increments_counter() {
        assert_eq!(
            increment(&v("1.0.1-alpha.0"), BumpKeyword::Prerelease, Some("alpha")).expect("ok"),
            v("1.0.1-alpha.1")
        );
    }

    #[test]
    fn prerelease_with_new_id_restarts_counter() {
        assert_eq!(
            increment(&v("1.0.1-alpha.3"), BumpKeyword::Prerelease, Some("rc")).expect("ok"),
            v("1.0.1-rc.0")
        );
    }

    #[test]
    fn prerelease_without_counter_gains_one() {
        assert_eq!(
            increment(&v("1.0.1-alpha"), BumpKeyword::Prerelease, None).expect("ok"),
            v("1.0.1-alpha.0")
        );
    }

    #[test]
    fn pre_keywords_advance_then_tag() {
        assert_eq!(
            increment(&v("1.0.0"), BumpKeyword::Prepatch, Some("rc")).expect("ok"),
            v("1.0.1-rc.0")
        );
        assert_eq!(
            increment(&v("1.0.0"), BumpKeyword::Preminor, Some("alpha")).expect("ok"),
            v("1.1.0-alpha.0")
        );
        assert_eq!(
            increment(&v("1.0.0"), BumpKeyword::Premajor, Some("alpha")).expect("ok"),
            v("2.0.0-alpha.0")
        );
    }

    #[test]
    fn default_prerelease_id_is_alpha() {
        assert_eq!(
            increment(&v("1.0.0"), BumpKeyword::Prerelease, None).expect("ok"),
            v("1.0.1-alpha.0")
        );
    }

    #[test]
    fn stable_bump_graduates_a_prerelease() {
        assert_eq!(
            increment(&v("1.1.0-alpha.2"), BumpKeyword::Minor, None).expect("ok"),
            v("1.1.0")
        );
        assert_eq!(
            increment(&v("2.0.0-rc.1"), BumpKeyword::Major, None).expect("ok"),
            v("2.0.0")
        );
        assert_eq!(
            increment(&v("1.0.1-alpha.0"), BumpKeyword::Patch, None).expect("ok"),
            v("1.0.1")
        );
    }

    #[test]
    fn major_bump_on_mid_cycle_prerelease_advances() {
        // 1.2.0-alpha.0 is not a major prerelease, so major still advances.
        assert_eq!(
            increment(&v("1.2.0-alpha.0"), BumpKeyword::Major, None).expect("ok"),
            v("2.0.0")
        );
    }

    #[test]
    fn invalid_prerelease_id_is_rejected() {
        let err = increment(&v("1.0.0"), BumpKeyword::Prerelease, Some("not valid!"))
            .expect_err("invalid id");
        assert!(matches!(err, VersionError::InvalidPrereleaseId { .. }));
    }

    #[test]
    fn parse_greater_accepts_larger_versions() {
        let parsed = parse_greater("2.0.0", &v("1.0.0")).expect("greater");
        assert_eq!(parsed, v("2.0.0"));
    }

    #[test]
    fn parse_greater_rejects_equal_and_smaller() {
        assert!(matches!(
            parse_greater("1.0.0", &v("1.0.0")),
            Err(VersionError::NotGreater { .. })
        ));
        assert!(matches!(
            parse_greater("0.9.0", &v("1.0.0")),
            Err(VersionError::NotGreater { .. })
        ));
    }

    #[test]
    fn parse_greater_rejects_garbage() {
        assert!(matches!(
            parse_greater("not-a-version", &v("1.0.0")),
            Err(VersionError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn parse_greater_ignores_build_metadata_in_comparison() {
        // 1.0.1+meta > 1.0.0 even though build metadata has no precedence.
        let parsed = parse_greater("1.0.1+exp.sha.5114f85", &v("1.0.0")).expect("greater");
        assert_eq!(parsed.build.as_str(), "exp.sha.5114f85");
    }
}
