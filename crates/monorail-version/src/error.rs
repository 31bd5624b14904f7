use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("'{input}' is not a valid semver version")]
    InvalidVersion {
        input: String,
        #[source]
        source: semver::Error,
    },

    #[error("'{id}' is not a valid prerelease identifier")]
    InvalidPrereleaseId {
        id: String,
        #[source]
        source: semver::Error,
    },

    #[error("version {candidate} must be greater than current version {current}")]
    NotGreater { candidate: String, current: String },
}

pub type Result<T> = std::result::Result<T, VersionError>;
