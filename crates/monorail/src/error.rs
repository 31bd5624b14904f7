use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("--{flag} was replaced by positional [bump]; check your CLI usage")]
    ReplacedFlag { flag: &'static str },

    #[error("'{input}' is neither a bump keyword nor a valid semver version")]
    InvalidBumpArgument { input: String },

    #[error("interactive version selection requires a terminal; pass --yes or an explicit [bump]")]
    NotATty,

    #[error("failed to read config '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write config '{path}'")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config for '{path}'")]
    ConfigSerialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("invalid version '{version}' for package '{package}' in config")]
    ConfigVersion {
        package: String,
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error(transparent)]
    Git(#[from] monorail_git::GitError),

    #[error(transparent)]
    Graph(#[from] monorail_graph::GraphError),

    #[error(transparent)]
    Plan(#[from] monorail_plan::PlanError),

    #[error("failed to update {} changelog(s): {}", failures.len(), failures.join(", "))]
    ChangelogWrites { failures: Vec<String> },

    #[error("failed to resolve current directory")]
    CurrentDir(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
