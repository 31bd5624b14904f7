use std::path::{Path, PathBuf};

use semver::Version;
use serde::{Deserialize, Serialize};

use monorail_core::{DependencyEscalation, PackageInfo, VersioningMode};

use crate::error::{CliError, Result};

pub const CONFIG_FILE: &str = "monorail.toml";

const DEFAULT_URL_TEMPLATE: &str = "commit/{hash}";

/// Repo-level configuration, `monorail.toml` at the repository root.
///
/// Package discovery itself is out of scope here; the config lists the
/// packages explicitly and doubles as the version store that planning
/// results are written back to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub mode: VersioningMode,
    #[serde(default)]
    pub escalation: DependencyEscalation,
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
    /// URL template for commit links; `{hash}` is substituted.
    #[serde(default = "default_url_template")]
    pub commit_url_template: String,
    #[serde(default, rename = "package")]
    pub packages: Vec<PackageEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageEntry {
    pub name: String,
    pub path: PathBuf,
    pub version: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

impl Config {
    /// # Errors
    ///
    /// Returns `ConfigRead`/`ConfigParse` when the file is unreadable or
    /// malformed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        let raw = std::fs::read_to_string(&path).map_err(|source| CliError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| CliError::ConfigParse { path, source })
    }

    /// # Errors
    ///
    /// Returns `ConfigSerialize`/`ConfigWrite` on failure.
    pub fn store(&self, root: &Path) -> Result<()> {
        let path = root.join(CONFIG_FILE);
        let raw = toml::to_string_pretty(self).map_err(|source| CliError::ConfigSerialize {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, raw).map_err(|source| CliError::ConfigWrite { path, source })
    }

    /// Materializes the package set for planning.
    ///
    /// # Errors
    ///
    /// Returns `ConfigVersion` when a package's version string is not
    /// valid semver.
    pub fn packages(&self) -> Result<Vec<PackageInfo>> {
        self.packages
            .iter()
            .map(|entry| {
                let version =
                    Version::parse(&entry.version).map_err(|source| CliError::ConfigVersion {
                        package: entry.name.clone(),
                        version: entry.version.clone(),
                        source,
                    })?;
                Ok(PackageInfo {
                    name: entry.name.clone(),
                    version,
                    private: entry.private,
                    dependencies: entry.dependencies.clone(),
                    path: entry.path.clone(),
                })
            })
            .collect()
    }

    /// Writes planned versions back onto the config entries.
    pub fn apply_versions(&mut self, packages: &[PackageInfo]) {
        for entry in &mut self.packages {
            if let Some(package) = packages.iter().find(|p| p.name == entry.name) {
                entry.version = package.version.to_string();
            }
        }
    }
}
