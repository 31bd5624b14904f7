mod version;

use std::path::Path;

use clap::Subcommand;

use crate::error::Result;

pub(crate) use version::VersionArgs;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Bump package versions from conventional commits and update changelogs
    Version(VersionArgs),
}

impl Commands {
    pub(crate) fn execute(self, start_path: &Path) -> Result<()> {
        match self {
            Self::Version(args) => version::run(args, start_path),
        }
    }
}
