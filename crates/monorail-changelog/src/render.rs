use std::fmt::Write;

use chrono::NaiveDate;
use semver::Version;

use monorail_core::{CommitRecord, CommitType};

/// Placeholder substituted with the full commit hash in the URL template.
pub const HASH_PLACEHOLDER: &str = "{hash}";

const SECTION_ORDER: [(&str, CommitType); 3] = [
    ("Features", CommitType::Feat),
    ("Bug Fixes", CommitType::Fix),
    ("Performance Improvements", CommitType::Perf),
];

/// Renders the changelog section for one package release.
///
/// Commits are grouped by type in a fixed section order, entries sorted by
/// scope then subject within each group. Breaking commits additionally
/// emit their captured body under BREAKING CHANGES. A release with no
/// attributable commits renders the version-bump-only note instead of
/// empty groups.
#[must_use]
pub fn render_section(
    package: &str,
    version: &Version,
    date: NaiveDate,
    commits: &[CommitRecord],
    url_template: &str,
) -> String {
    let mut output = format!("## {version} ({date})\n");

    if commits.is_empty() {
        let _ = write!(output, "\n**Note:** Version bump only for package {package}\n");
        return output;
    }

    for (title, kind) in SECTION_ORDER {
        let mut group: Vec<&CommitRecord> = commits.iter().filter(|c| c.kind == kind).collect();
        if group.is_empty() {
            continue;
        }
        group.sort_by(|a, b| (&a.scope, &a.subject).cmp(&(&b.scope, &b.subject)));

        let _ = write!(output, "\n\n### {title}\n");
        for commit in group {
            output.push('\n');
            output.push_str(&render_entry(commit, url_template));
        }
    }

    let mut breaking: Vec<&CommitRecord> = commits.iter().filter(|c| c.is_breaking).collect();
    if !breaking.is_empty() {
        breaking.sort_by(|a, b| (&a.scope, &a.subject).cmp(&(&b.scope, &b.subject)));

        output.push_str("\n\n### BREAKING CHANGES\n");
        for commit in breaking {
            output.push_str("\n* ");
            if let Some(scope) = &commit.scope {
                let _ = write!(output, "**{scope}:** ");
            }
            output.push_str(commit.breaking_body.as_deref().unwrap_or(&commit.subject));
        }
    }

    let mut reverts: Vec<&CommitRecord> = commits
        .iter()
        .filter(|c| c.kind == CommitType::Revert)
        .collect();
    if !reverts.is_empty() {
        reverts.sort_by(|a, b| (&a.scope, &a.subject).cmp(&(&b.scope, &b.subject)));

        output.push_str("\n\n### Reverts\n");
        for commit in reverts {
            output.push('\n');
            output.push_str(&render_entry(commit, url_template));
        }
    }

    output.push('\n');
    output
}

fn render_entry(commit: &CommitRecord, url_template: &str) -> String {
    let url = url_template.replace(HASH_PLACEHOLDER, &commit.hash);
    let mut entry = String::from("* ");
    if let Some(scope) = &commit.scope {
        let _ = write!(entry, "**{scope}:** ");
    }
    let _ = write!(entry, "{} ([{}]({url}))", commit.subject, commit.short_hash);
    entry
}
