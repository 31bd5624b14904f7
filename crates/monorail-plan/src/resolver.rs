use indexmap::IndexMap;
use tracing::debug;

use monorail_core::{
    BumpLevel, CommitRecord, CommitType, DependencyEscalation, PackageInfo, VersioningMode,
};
use monorail_graph::PackageGraph;

use crate::error::Result;

/// Resolver configuration, fixed for one planning pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverConfig {
    pub mode: VersioningMode,
    pub escalation: DependencyEscalation,
}

/// The bump resolved for one package, before version arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpDecision {
    pub name: String,
    pub level: BumpLevel,
    /// True when the package had no qualifying commits of its own and was
    /// pulled into the release set by the versioning mode or a dependency.
    pub forced: bool,
}

/// Computes the minimal bump level a package's own commits call for.
///
/// Any breaking commit wins major; otherwise a feat wins minor; otherwise
/// a fix or perf commit wins patch. The strictly highest level wins
/// regardless of commit order.
#[must_use]
pub fn local_bump(package: &str, commits: &[CommitRecord]) -> BumpLevel {
    commits
        .iter()
        .filter(|commit| commit.affects(package))
        .map(|commit| {
            if commit.is_breaking {
                BumpLevel::Major
            } else {
                match commit.kind {
                    CommitType::Feat => BumpLevel::Minor,
                    CommitType::Fix | CommitType::Perf => BumpLevel::Patch,
                    _ => BumpLevel::None,
                }
            }
        })
        .max()
        .unwrap_or(BumpLevel::None)
}

/// Resolves per-package bump decisions for the whole release set.
///
/// Cycles in the dependency graph abort resolution before any decision is
/// produced. Packages whose resolved level is `None` are excluded from the
/// returned set.
///
/// # Errors
///
/// Returns [`PlanError::Graph`](crate::PlanError::Graph) when the
/// dependency graph is cyclic.
pub fn resolve_bumps(
    packages: &[PackageInfo],
    graph: &PackageGraph,
    commits: &[CommitRecord],
    config: ResolverConfig,
) -> Result<Vec<BumpDecision>> {
    // Topological order doubles as the cycle check; a cyclic graph is a
    // configuration error, never an arbitrary traversal order.
    let topo = graph.topo_order()?;

    let mut local: IndexMap<&str, BumpLevel> = packages
        .iter()
        .map(|pkg| (pkg.name.as_str(), local_bump(&pkg.name, commits)))
        .collect();

    match config.mode {
        VersioningMode::Fixed => {
            let global = local.values().copied().max().unwrap_or(BumpLevel::None);
            if global.is_none() {
                return Ok(Vec::new());
            }
            debug!(level = %global, "fixed mode: applying repo-wide bump");

            Ok(packages
                .iter()
                .map(|pkg| BumpDecision {
                    name: pkg.name.clone(),
                    level: global,
                    forced: local[pkg.name.as_str()].is_none(),
                })
                .collect())
        }
        VersioningMode::Independent => {
            let escalation_floor = BumpLevel::from(config.escalation);
            let mut forced: IndexMap<&str, bool> =
                local.keys().map(|&name| (name, false)).collect();

            // One propagation pass, dependencies before dependents, so a
            // bump anywhere below a package is visible when it is visited.
            for name in &topo {
                let name = name.as_str();
                let dependency_bumped = graph
                    .dependencies_of(name)
                    .iter()
                    .any(|dep| local.get(*dep).is_some_and(|level| !level.is_none()));

                if dependency_bumped {
                    let current = local[name];
                    if current < escalation_floor {
                        debug!(
                            package = name,
                            floor = %escalation_floor,
                            "escalating for dependency bump"
                        );
                        if current.is_none() {
                            forced[name] = true;
                        }
                        local[name] = escalation_floor;
                    }
                }
            }

            Ok(packages
                .iter()
                .filter(|pkg| !local[pkg.name.as_str()].is_none())
                .map(|pkg| BumpDecision {
                    name: pkg.name.clone(),
                    level: local[pkg.name.as_str()],
                    forced: forced[pkg.name.as_str()],
                })
                .collect())
        }
    }
}
