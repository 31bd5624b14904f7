use std::fs;
use std::path::Path;

use predicates::str::contains;
use tempfile::TempDir;

fn init_repo() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let repo = git2::Repository::init(dir.path()).expect("init repo");

    let mut config = repo.config().expect("repo config");
    config.set_str("user.name", "Test").expect("set name");
    config
        .set_str("user.email", "test@example.com")
        .expect("set email");

    dir
}

fn write_config(dir: &TempDir, content: &str) {
    fs::write(dir.path().join("monorail.toml"), content).expect("write monorail.toml");
}

fn commit_file(dir: &TempDir, relative: &str, content: &str, message: &str) {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, content).expect("write file");

    let repo = git2::Repository::open(dir.path()).expect("open repo");
    let mut index = repo.index().expect("index");
    index.add_path(Path::new(relative)).expect("stage file");
    index.write().expect("write index");
    let tree_id = index.write_tree().expect("write tree");
    let tree = repo.find_tree(tree_id).expect("find tree");
    let sig = git2::Signature::now("Test", "test@example.com").expect("signature");
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit");
}

fn tag_head(dir: &TempDir, name: &str) {
    let repo = git2::Repository::open(dir.path()).expect("open repo");
    let head = repo.head().expect("head").peel_to_commit().expect("commit");
    repo.tag_lightweight(name, head.as_object(), false)
        .expect("tag");
}

const SINGLE_PACKAGE: &str = r#"
[[package]]
name = "pkg-a"
path = "packages/pkg-a"
version = "1.0.0"
"#;

macro_rules! monorail_cmd {
    () => {
        assert_cmd::cargo::cargo_bin_cmd!("monorail")
    };
}

#[test]
fn repo_version_flag_was_replaced() {
    let dir = TempDir::new().expect("create temp dir");

    monorail_cmd!()
        .args(["version", "--repo-version", "2.0.0"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(contains("--repo-version was replaced by positional [bump]"));
}

#[test]
fn cd_version_flag_was_replaced() {
    let dir = TempDir::new().expect("create temp dir");

    monorail_cmd!()
        .args(["version", "--cd-version", "minor"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(contains("--cd-version was replaced by positional [bump]"));
}

#[test]
fn garbage_bump_argument_is_rejected() {
    let dir = TempDir::new().expect("create temp dir");

    monorail_cmd!()
        .args(["version", "not-a-bump"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(contains("neither a bump keyword nor a valid semver version"));
}

#[test]
fn outside_a_git_repository_fails() {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("monorail.toml"), SINGLE_PACKAGE).expect("write config");

    monorail_cmd!()
        .args(["version", "--yes"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(contains("repository"));
}

#[test]
fn chore_only_history_is_a_noop() {
    let repo = init_repo();
    write_config(&repo, SINGLE_PACKAGE);
    commit_file(&repo, "monorail.toml", SINGLE_PACKAGE, "chore: init");
    commit_file(&repo, "packages/pkg-a/src/lib.rs", "", "chore: tidy up");

    monorail_cmd!()
        .args(["version", "--yes"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(contains("No packages to release."));

    let config = fs::read_to_string(repo.path().join("monorail.toml")).expect("read config");
    assert!(config.contains("1.0.0"));
    assert!(!repo.path().join("packages/pkg-a/CHANGELOG.md").exists());
}

#[test]
fn feat_commit_bumps_minor_and_writes_changelog() {
    let repo = init_repo();
    write_config(&repo, SINGLE_PACKAGE);
    commit_file(&repo, "monorail.toml", SINGLE_PACKAGE, "chore: init");
    commit_file(
        &repo,
        "packages/pkg-a/src/lib.rs",
        "content",
        "feat(pkg-a): add shiny thing",
    );

    monorail_cmd!()
        .args(["version", "--yes"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(contains("Changes:"))
        .stdout(contains(" - pkg-a: 1.0.0 => 1.1.0"));

    let config = fs::read_to_string(repo.path().join("monorail.toml")).expect("read config");
    assert!(config.contains("\"1.1.0\""));

    let changelog = fs::read_to_string(repo.path().join("packages/pkg-a/CHANGELOG.md"))
        .expect("changelog written");
    assert!(changelog.starts_with("# Change Log"));
    assert!(changelog.contains("### Features"));
    assert!(changelog.contains("**pkg-a:** add shiny thing"));
}

#[test]
fn explicit_exact_version_skips_prompting() {
    let repo = init_repo();
    write_config(&repo, SINGLE_PACKAGE);
    commit_file(&repo, "monorail.toml", SINGLE_PACKAGE, "chore: init");
    commit_file(
        &repo,
        "packages/pkg-a/src/lib.rs",
        "content",
        "fix(pkg-a): squash the bug",
    );

    monorail_cmd!()
        .args(["version", "2.0.0"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(contains(" - pkg-a: 1.0.0 => 2.0.0"));
}

#[test]
fn prompting_without_a_terminal_fails_with_guidance() {
    let repo = init_repo();
    write_config(&repo, SINGLE_PACKAGE);
    commit_file(&repo, "monorail.toml", SINGLE_PACKAGE, "chore: init");
    commit_file(
        &repo,
        "packages/pkg-a/src/lib.rs",
        "content",
        "feat(pkg-a): add shiny thing",
    );

    monorail_cmd!()
        .arg("version")
        .current_dir(repo.path())
        .assert()
        .failure()
        .stderr(contains("requires a terminal"));
}

#[test]
fn commits_behind_the_release_tag_are_ignored() {
    let repo = init_repo();
    write_config(&repo, SINGLE_PACKAGE);
    commit_file(&repo, "monorail.toml", SINGLE_PACKAGE, "chore: init");
    commit_file(
        &repo,
        "packages/pkg-a/src/lib.rs",
        "content",
        "feat(pkg-a): released already",
    );
    tag_head(&repo, "v1.0.0");
    commit_file(&repo, "packages/pkg-a/README.md", "docs", "docs(pkg-a): explain");

    monorail_cmd!()
        .args(["version", "--yes"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(contains("No packages to release."));
}

#[test]
fn private_packages_are_marked_in_the_report() {
    let repo = init_repo();
    let config = r#"
[[package]]
name = "pkg-a"
path = "packages/pkg-a"
version = "1.0.0"

[[package]]
name = "internal"
path = "packages/internal"
version = "0.3.0"
private = true
"#;
    write_config(&repo, config);
    commit_file(&repo, "monorail.toml", config, "chore: init");
    commit_file(&repo, "packages/internal/src/lib.rs", "", "chore(internal): scaffold");
    commit_file(
        &repo,
        "packages/pkg-a/src/lib.rs",
        "content",
        "feat(pkg-a): add shiny thing",
    );

    monorail_cmd!()
        .args(["version", "--yes"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(contains(" - pkg-a: 1.0.0 => 1.1.0"))
        .stdout(contains(" - internal: 0.3.0 => 0.4.0 (private)"));

    let changelog = fs::read_to_string(repo.path().join("packages/internal/CHANGELOG.md"))
        .expect("changelog written");
    assert!(changelog.contains("**Note:** Version bump only for package internal"));
}
