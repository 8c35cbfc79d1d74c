//! `GitCli` against real repositories. Every test returns early when `git`
//! is not installed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use mkshare_git::{CommitMode, GitCli, GitError, VersionControl};
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "`git {args:?}` failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// Builds `<root>/work` with one committed makefile on `master` and a bare
/// `<root>/upstream.git` cloned from it. Returns (work, bare).
fn upstream(root: &Path) -> (PathBuf, PathBuf) {
    let work = root.join("work");
    fs::create_dir_all(work.join("makefiles")).unwrap();
    git(&work, &["init", "-q"]);
    git(&work, &["symbolic-ref", "HEAD", "refs/heads/master"]);
    configure_identity(&work);
    fs::write(work.join("makefiles").join("Common.mk"), "all:\n").unwrap();
    git(&work, &["add", "."]);
    git(&work, &["commit", "-q", "-m", "init"]);

    let bare = root.join("upstream.git");
    git(root, &["clone", "-q", "--bare", "work", "upstream.git"]);
    (work, bare)
}

fn cli() -> GitCli {
    let _ = env_logger::builder().is_test(true).try_init();
    GitCli::new(Duration::from_secs(30)).quiet(true)
}

#[test]
fn clone_checkout_and_refresh_follow_upstream() {
    if !git_available() {
        return;
    }
    let root = TempDir::new().unwrap();
    let (work, bare) = upstream(root.path());
    let mirror = root.path().join("cache").join("upstream.git");
    fs::create_dir_all(mirror.parent().unwrap()).unwrap();

    let git_cli = cli();
    git_cli
        .clone_repo(bare.to_str().unwrap(), &mirror, "master")
        .expect("clone");
    git_cli.force_checkout(&mirror, "master").expect("checkout");
    assert!(mirror.join("makefiles").join("Common.mk").is_file());

    fs::write(work.join("makefiles").join("Rust.mk"), "build:\n").unwrap();
    git(&work, &["add", "."]);
    git(&work, &["commit", "-q", "-m", "add rust"]);
    git(&work, &["push", "-q", bare.to_str().unwrap(), "master"]);

    git_cli
        .force_rebase_pull(&mirror, "master")
        .expect("refresh");
    assert!(mirror.join("makefiles").join("Rust.mk").is_file());
}

#[test]
fn stage_commit_push_reaches_upstream() {
    if !git_available() {
        return;
    }
    let root = TempDir::new().unwrap();
    let (_work, bare) = upstream(root.path());
    let mirror = root.path().join("mirror");

    let git_cli = cli();
    git_cli
        .clone_repo(bare.to_str().unwrap(), &mirror, "master")
        .expect("clone");
    configure_identity(&mirror);

    fs::write(mirror.join("makefiles").join("New.mk"), "new:\n").unwrap();
    git_cli
        .stage(&mirror, &[PathBuf::from("makefiles/New.mk")])
        .expect("stage");
    git_cli
        .commit(&mirror, &CommitMode::Message("add New.mk".into()))
        .expect("commit");
    git_cli.push(&mirror, "master").expect("push");

    let listing = Command::new("git")
        .args(["ls-tree", "-r", "--name-only", "master"])
        .current_dir(&bare)
        .output()
        .unwrap();
    let names = String::from_utf8_lossy(&listing.stdout);
    assert!(names.contains("makefiles/New.mk"), "upstream tree: {names}");
}

#[test]
fn reset_and_clean_restores_committed_subdir() {
    if !git_available() {
        return;
    }
    let root = TempDir::new().unwrap();
    let (_work, bare) = upstream(root.path());
    let mirror = root.path().join("mirror");

    let git_cli = cli();
    git_cli
        .clone_repo(bare.to_str().unwrap(), &mirror, "master")
        .expect("clone");

    let common = mirror.join("makefiles").join("Common.mk");
    let stray = mirror.join("makefiles").join("Stray.mk");
    fs::write(&common, "edited:\n").unwrap();
    fs::write(&stray, "stray:\n").unwrap();
    git_cli
        .stage(&mirror, &[PathBuf::from("makefiles")])
        .expect("stage");

    git_cli
        .reset_and_clean(&mirror, Path::new("makefiles"))
        .expect("reset");

    assert_eq!(fs::read_to_string(&common).unwrap(), "all:\n");
    assert!(!stray.exists(), "untracked file should be cleaned");
}

#[test]
fn clone_of_missing_remote_fails() {
    if !git_available() {
        return;
    }
    let root = TempDir::new().unwrap();
    let missing = root.path().join("nope.git");
    let err = cli()
        .clone_repo(
            missing.to_str().unwrap(),
            &root.path().join("mirror"),
            "master",
        )
        .unwrap_err();
    assert!(matches!(err, GitError::Failed { .. }), "got: {err}");
}

#[test]
fn discard_last_commit_then_reset_restores_pre_publish_tree() {
    if !git_available() {
        return;
    }
    let root = TempDir::new().unwrap();
    let (_work, bare) = upstream(root.path());
    let mirror = root.path().join("mirror");

    let git_cli = cli();
    git_cli
        .clone_repo(bare.to_str().unwrap(), &mirror, "master")
        .expect("clone");
    configure_identity(&mirror);

    let added = mirror.join("makefiles").join("Added.mk");
    fs::write(&added, "added:\n").unwrap();
    git_cli
        .stage(&mirror, &[PathBuf::from("makefiles")])
        .expect("stage");
    git_cli
        .commit(&mirror, &CommitMode::Message("local only".into()))
        .expect("commit");

    git_cli.discard_last_commit(&mirror).expect("discard");
    git_cli
        .reset_and_clean(&mirror, Path::new("makefiles"))
        .expect("reset");

    assert!(!added.exists(), "file from the discarded commit must be gone");
    let log = Command::new("git")
        .args(["rev-list", "--count", "HEAD"])
        .current_dir(&mirror)
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&log.stdout).trim(), "1");
}
