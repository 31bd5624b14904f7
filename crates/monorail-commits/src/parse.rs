use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use monorail_core::{CommitRecord, CommitType};

use crate::RawCommit;

/// Trailer that marks a breaking change. Case-sensitive, per the
/// conventional-commits convention.
const BREAKING_TRAILER: &str = "BREAKING CHANGE:";

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[a-zA-Z]+)(?:\((?P<scope>[^()]*)\))?(?P<bang>!)?: (?P<subject>.+)$")
        .expect("header pattern is valid")
});

/// Parses one raw log entry into a [`CommitRecord`].
///
/// Parsing is total: a first line that does not match
/// `<type>(<scope>)?: <subject>` yields [`CommitType::Unknown`] with the
/// whole first line as subject. `affected` is the set of package names
/// touched by the commit's file changes, mapped by the caller.
#[must_use]
pub fn parse_commit(raw: &RawCommit, affected: BTreeSet<String>) -> CommitRecord {
    let mut lines = raw.message.lines();
    let first_line = lines.next().unwrap_or_default();

    let (kind, scope, subject, bang) = match HEADER_RE.captures(first_line) {
        Some(caps) => {
            let kind = CommitType::from_keyword(&caps["type"]);
            let scope = caps
                .name("scope")
                .map(|m| m.as_str().to_string())
                .filter(|s| !s.is_empty());
            let subject = caps["subject"].to_string();
            (kind, scope, subject, caps.name("bang").is_some())
        }
        None => (
            CommitType::Unknown,
            None,
            first_line.to_string(),
            false,
        ),
    };

    let breaking_body = extract_breaking_body(&raw.message);
    let is_breaking = bang || breaking_body.is_some();

    CommitRecord {
        hash: raw.hash.clone(),
        short_hash: raw.short_hash.clone(),
        date: raw.date,
        subject,
        kind,
        scope,
        is_breaking,
        breaking_body,
        affected_packages: affected,
    }
}

/// Parses a sequence of raw entries, preserving their order.
///
/// The sequence is lazy; nothing is parsed until the iterator is driven.
pub fn parse_commits<I>(commits: I) -> impl Iterator<Item = CommitRecord>
where
    I: IntoIterator<Item = (RawCommit, BTreeSet<String>)>,
{
    commits
        .into_iter()
        .map(|(raw, affected)| parse_commit(&raw, affected))
}

fn extract_breaking_body(message: &str) -> Option<String> {
    let mut lines = message.lines();
    // The trailer lives in the body, never in the subject line.
    lines.next();

    let mut collected: Option<Vec<String>> = None;
    for line in lines {
        match &mut collected {
            Some(body) => body.push(line.to_string()),
            None => {
                if let Some(rest) = line.strip_prefix(BREAKING_TRAILER) {
                    let mut body = Vec::new();
                    let rest = rest.trim_start();
                    if !rest.is_empty() {
                        body.push(rest.to_string());
                    }
                    collected = Some(body);
                }
            }
        }
    }

    collected.map(|body| body.join("\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(message: &str) -> RawCommit {
        RawCommit {
            hash: "a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0".to_string(),
            short_hash: "a1b2c3d".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date"),
            message: message.to_string(),
        }
    }

    fn affected(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_type_scope_and_subject() {
        let record = parse_commit(&raw("feat(package-1): Add foo"), affected(&["package-1"]));

        assert_eq!(record.kind, CommitType::Feat);
        assert_eq!(record.scope.as_deref(), Some("package-1"));
        assert_eq!(record.subject, "Add foo");
        assert!(!record.is_breaking);
        assert!(record.affects("package-1"));
    }

    #[test]
    fn parses_type_without_scope() {
        let record = parse_commit(&raw("fix: correct rounding"), BTreeSet::new());

        assert_eq!(record.kind, CommitType::Fix);
        assert_eq!(record.scope, None);
        assert_eq!(record.subject, "correct rounding");
    }

    #[test]
    fn unparseable_subject_is_kept_whole() {
        let record = parse_commit(&raw("hotfix for the thing"), BTreeSet::new());

        assert_eq!(record.kind, CommitType::Unknown);
        assert_eq!(record.scope, None);
        assert_eq!(record.subject, "hotfix for the thing");
        assert!(!record.is_breaking);
    }

    #[test]
    fn unrecognized_type_keyword_is_unknown_but_scoped() {
        let record = parse_commit(&raw("wip(core): half done"), BTreeSet::new());

        assert_eq!(record.kind, CommitType::Unknown);
        assert_eq!(record.scope.as_deref(), Some("core"));
        assert_eq!(record.subject, "half done");
    }

    #[test]
    fn empty_scope_parens_yield_no_scope() {
        let record = parse_commit(&raw("feat(): something"), BTreeSet::new());

        assert_eq!(record.kind, CommitType::Feat);
        assert_eq!(record.scope, None);
    }

    #[test]
    fn breaking_change_trailer_sets_flag_and_body() {
        let record = parse_commit(
            &raw("feat(package-3): Add baz feature\n\nBREAKING CHANGE: yup"),
            affected(&["package-3"]),
        );

        assert!(record.is_breaking);
        assert_eq!(record.breaking_body.as_deref(), Some("yup"));
    }

    #[test]
    fn breaking_change_body_spans_following_lines() {
        let record = parse_commit(
            &raw("feat: rework api\n\nBREAKING CHANGE: the old entry point\nis gone, use the new one"),
            BTreeSet::new(),
        );

        assert_eq!(
            record.breaking_body.as_deref(),
            Some("the old entry point\nis gone, use the new one")
        );
    }

    #[test]
    fn breaking_trailer_is_case_sensitive() {
        let record = parse_commit(&raw("feat: x\n\nbreaking change: nope"), BTreeSet::new());

        assert!(!record.is_breaking);
        assert_eq!(record.breaking_body, None);
    }

    #[test]
    fn breaking_trailer_in_subject_line_is_ignored() {
        let record = parse_commit(&raw("BREAKING CHANGE: not a trailer"), BTreeSet::new());

        assert_eq!(record.kind, CommitType::Unknown);
        assert!(!record.is_breaking);
    }

    #[test]
    fn bang_marker_sets_breaking_without_body() {
        let record = parse_commit(&raw("feat(core)!: drop legacy config"), BTreeSet::new());

        assert!(record.is_breaking);
        assert_eq!(record.breaking_body, None);
        assert_eq!(record.scope.as_deref(), Some("core"));
    }

    #[test]
    fn parsing_is_idempotent() {
        let entry = raw("fix(pkg): stop the bleeding\n\nBREAKING CHANGE: sorry");
        let first = parse_commit(&entry, affected(&["pkg"]));
        let second = parse_commit(&entry, affected(&["pkg"]));

        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_empty_sequence() {
        let records: Vec<_> = parse_commits(Vec::new()).collect();
        assert!(records.is_empty());
    }

    #[test]
    fn sequence_order_is_preserved() {
        let commits = vec![
            (raw("feat: first"), BTreeSet::new()),
            (raw("fix: second"), BTreeSet::new()),
            (raw("chore: third"), BTreeSet::new()),
        ];

        let subjects: Vec<_> = parse_commits(commits).map(|r| r.subject).collect();
        assert_eq!(subjects, ["first", "second", "third"]);
    }

    #[test]
    fn empty_message_yields_unknown_record() {
        let record = parse_commit(&raw(""), BTreeSet::new());

        assert_eq!(record.kind, CommitType::Unknown);
        assert_eq!(record.subject, "");
    }
}
