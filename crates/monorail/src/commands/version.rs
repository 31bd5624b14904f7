use std::io::IsTerminal;
use std::path::Path;

use clap::Args;
use semver::Version;
use tracing::{debug, info};

use monorail_changelog::{Changelog, render_section};
use monorail_commits::{RawCommit, parse_commits};
use monorail_core::{
    BumpKeyword, CommitRecord, CommitType, DependencyEscalation, PackageInfo, ReleasedPackage,
    VersioningMode,
};
use monorail_git::Repository;
use monorail_graph::PackageGraph;
use monorail_plan::{
    ExplicitVersion, PlanRequest, ResolverConfig, VersionPlanner, resolve_bumps,
};

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::mapper::affected_packages;
use crate::prompt::TerminalPromptProvider;

#[derive(Args)]
pub(crate) struct VersionArgs {
    /// Bump keyword (patch, minor, major, prepatch, preminor, premajor,
    /// prerelease) or an exact semver version; skips the version prompt
    bump: Option<String>,

    /// Prerelease identifier for pre* bumps (e.g. alpha, rc)
    #[arg(long)]
    preid: Option<String>,

    /// Build metadata appended to every new version
    #[arg(long)]
    build_metadata: Option<String>,

    /// Override the configured versioning mode
    #[arg(long, value_enum)]
    mode: Option<VersioningMode>,

    /// Override the configured dependency escalation level
    #[arg(long, value_enum)]
    escalation: Option<DependencyEscalation>,

    /// Override the configured release tag prefix
    #[arg(long)]
    tag_prefix: Option<String>,

    /// Accept every suggested bump without prompting
    #[arg(long, short = 'y')]
    yes: bool,

    #[arg(long, hide = true)]
    repo_version: Option<String>,

    #[arg(long, hide = true)]
    cd_version: Option<String>,
}

pub(crate) fn run(args: VersionArgs, start_path: &Path) -> Result<()> {
    if args.repo_version.is_some() {
        return Err(CliError::ReplacedFlag {
            flag: "repo-version",
        });
    }
    if args.cd_version.is_some() {
        return Err(CliError::ReplacedFlag { flag: "cd-version" });
    }

    let explicit = args.bump.as_deref().map(parse_bump_argument).transpose()?;

    let repo = Repository::open(start_path)?;
    let root = repo.root().to_path_buf();

    let mut config = Config::load(&root)?;
    let mode = args.mode.unwrap_or(config.mode);
    let escalation = args.escalation.unwrap_or(config.escalation);
    let tag_prefix = args.tag_prefix.as_ref().unwrap_or(&config.tag_prefix);

    let mut packages = config.packages()?;
    let graph = PackageGraph::build(&packages)?;

    let since = repo.last_release_tag(tag_prefix)?;
    match &since {
        Some(tag) => debug!(tag = %tag.name, "collecting commits since last release"),
        None => debug!("no release tag found, collecting full history"),
    }

    let entries = repo.commits_since(since.as_ref().map(|t| t.name.as_str()))?;
    let commits: Vec<CommitRecord> = parse_commits(entries.into_iter().map(|entry| {
        let affected = affected_packages(&entry.changed_files, &packages);
        (
            RawCommit {
                hash: entry.hash,
                short_hash: entry.short_hash,
                date: entry.date,
                message: entry.message,
            },
            affected,
        )
    }))
    .collect();

    info!(commits = commits.len(), "parsed commits since last release");

    let decisions = resolve_bumps(&packages, &graph, &commits, ResolverConfig { mode, escalation })?;
    if decisions.is_empty() {
        println!("No packages to release.");
        return Ok(());
    }

    let request = PlanRequest {
        explicit,
        prerelease_id: args.preid,
        build_metadata: args.build_metadata,
    };

    let prompt = TerminalPromptProvider;
    let planner = if args.yes || request.explicit.is_some() {
        VersionPlanner::non_interactive()
    } else if is_interactive() {
        VersionPlanner::with_prompt(&prompt)
    } else {
        return Err(CliError::NotATty);
    };

    let released = planner.plan(&mut packages, &decisions, &request)?;

    config.apply_versions(&packages);
    config.store(&root)?;

    update_changelogs(&root, &packages, &released, &commits, &config.commit_url_template)?;

    print_report(&released);
    Ok(())
}

fn is_interactive() -> bool {
    std::env::var("MONORAIL_FORCE_TTY").is_ok() || std::io::stdin().is_terminal()
}

fn parse_bump_argument(input: &str) -> Result<ExplicitVersion> {
    if let Ok(keyword) = <BumpKeyword as clap::ValueEnum>::from_str(input, true) {
        return Ok(ExplicitVersion::Keyword(keyword));
    }
    match Version::parse(input) {
        Ok(version) => Ok(ExplicitVersion::Exact(version)),
        Err(_) => Err(CliError::InvalidBumpArgument {
            input: input.to_string(),
        }),
    }
}

/// Rewrites every released package's changelog. A failed write is
/// reported and the remaining packages are still processed.
fn update_changelogs(
    root: &Path,
    packages: &[PackageInfo],
    released: &[ReleasedPackage],
    commits: &[CommitRecord],
    url_template: &str,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let mut failures = Vec::new();

    for release in released {
        let Some(package) = packages.iter().find(|p| p.name == release.name) else {
            continue;
        };

        // Only commits that produce a changelog entry count; a release
        // carried by chores alone gets the version-bump-only note.
        let own_commits: Vec<CommitRecord> = commits
            .iter()
            .filter(|c| c.affects(&release.name) && displayable(c))
            .cloned()
            .collect();

        let section = render_section(
            &release.name,
            &release.new_version,
            today,
            &own_commits,
            url_template,
        );

        let path = root.join(&package.path).join("CHANGELOG.md");
        let result = Changelog::load(&path).and_then(|mut changelog| {
            changelog.prepend_section(&section);
            changelog.write_atomic(&path)
        });

        if let Err(e) = result {
            debug!(package = %release.name, error = %e, "changelog update failed");
            failures.push(format!("{}: {e}", release.name));
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::ChangelogWrites { failures })
    }
}

fn displayable(commit: &CommitRecord) -> bool {
    commit.is_breaking
        || matches!(
            commit.kind,
            CommitType::Feat | CommitType::Fix | CommitType::Perf | CommitType::Revert
        )
}

fn print_report(released: &[ReleasedPackage]) {
    println!("\nChanges:");
    for release in released {
        let private = if release.private { " (private)" } else { "" };
        println!(
            " - {}: {} => {}{private}",
            release.name, release.old_version, release.new_version
        );
    }
}
