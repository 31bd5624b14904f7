/// Replaces the build-metadata suffix of a version string.
///
/// Strips everything from the first `+` and appends `+<metadata>` when
/// provided. The prerelease portion is never touched. Pure; called once
/// per package version right before the value is persisted or prompted.
#[must_use]
pub fn apply_build_metadata(version: &str, metadata: Option<&str>) -> String {
    let base = version.split('+').next().unwrap_or(version);

    match metadata {
        Some(meta) => format!("{base}+{meta}"),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_metadata_to_plain_version() {
        assert_eq!(
            apply_build_metadata("1.0.1", Some("20130313144700")),
            "1.0.1+20130313144700"
        );
    }

    #[test]
    fn replaces_existing_metadata() {
        assert_eq!(
            apply_build_metadata("1.2.3-alpha.0+OLD", Some("NEW")),
            "1.2.3-alpha.0+NEW"
        );
    }

    #[test]
    fn prerelease_portion_is_untouched() {
        assert_eq!(
            apply_build_metadata("1.0.1-rc.0", Some("exp.sha.5114f85")),
            "1.0.1-rc.0+exp.sha.5114f85"
        );
    }

    #[test]
    fn none_strips_existing_metadata() {
        assert_eq!(apply_build_metadata("1.0.1+001", None), "1.0.1");
    }

    #[test]
    fn none_on_plain_version_is_identity() {
        assert_eq!(apply_build_metadata("1.0.1", None), "1.0.1");
    }
}
