use std::collections::BTreeSet;
use std::path::Path;

use monorail_core::PackageInfo;

/// Maps a commit's changed files to the packages they belong to.
///
/// A file belongs to the package whose path is its longest matching
/// prefix, so nested package layouts attribute to the innermost package.
/// Files outside every package (root configs, CI) map to no package.
#[must_use]
pub fn affected_packages(changed_files: &[impl AsRef<Path>], packages: &[PackageInfo]) -> BTreeSet<String> {
    let mut affected = BTreeSet::new();

    for file in changed_files {
        let file = file.as_ref();
        let best = packages
            .iter()
            .filter(|pkg| file.starts_with(&pkg.path))
            .max_by_key(|pkg| pkg.path.components().count());
        if let Some(pkg) = best {
            affected.insert(pkg.name.clone());
        }
    }

    affected
}
