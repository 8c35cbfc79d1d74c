//! Install, pull and list pipelines against the fake transport.

mod common;

use std::fs;

use common::Project;
use mkshare_sync::{Session, SyncError};
use mkshare_test_utils::{fixtures, FakeTransport, Level, RecordingReporter, Step};

const T: i64 = 1_600_000_000;

// ---------------------------------------------------------------------------
// 1. Install
// ---------------------------------------------------------------------------

#[test]
fn install_copies_artifacts_and_writes_root_makefile() {
    let p = Project::new();
    fixtures::write_artifact(&p.upstream_files(), "Rust.mk", "rust:\n", T);
    fixtures::write_artifact(&p.upstream_files(), "Common.mk", "common:\n", T + 1);

    let fake = FakeTransport::new();
    let reporter = RecordingReporter::new();
    let settings = p.settings();
    let report = Session::new(&settings, &fake, &reporter)
        .install()
        .expect("install");

    assert_eq!(report.summary.installed, 2);
    assert_eq!(fs::read_to_string(p.include.join("Rust.mk")).unwrap(), "rust:\n");
    assert_eq!(fixtures::mtime(&p.include.join("Common.mk")), fixtures::at(T + 1));

    let root = fs::read_to_string(&p.makefile).unwrap();
    let expected = format!(
        "include {}\ninclude {}\n\nSRC ?= src\n",
        p.include.join("Common.mk").display(),
        p.include.join("Rust.mk").display()
    );
    assert_eq!(root, expected);
    assert!(reporter.contains(Level::Info, "2 shared makefile(s)"));
}

#[test]
fn second_install_without_force_copies_nothing() {
    let p = Project::new();
    fixtures::write_artifact(&p.upstream_files(), "Common.mk", "v1\n", T);

    let fake = FakeTransport::new();
    let reporter = RecordingReporter::new();
    let settings = p.settings();
    let session = Session::new(&settings, &fake, &reporter);
    session.install().expect("first install");

    fs::write(p.include.join("Common.mk"), "local edit\n").unwrap();
    let second = session.install().expect("second install");

    assert_eq!(second.summary.copied(), 0);
    assert_eq!(second.summary.skipped_existing, 1);
    assert_eq!(
        fs::read_to_string(p.include.join("Common.mk")).unwrap(),
        "local edit\n"
    );
    assert!(reporter.contains(Level::Notice, "already present, refusing to override"));
    // Skipped artifacts stay listed in the regenerated root makefile.
    assert!(fs::read_to_string(&p.makefile).unwrap().contains("Common.mk"));
}

#[test]
fn install_with_force_overwrites_local_copies() {
    let p = Project::new();
    fixtures::write_artifact(&p.upstream_files(), "Common.mk", "upstream\n", T);
    fixtures::write_artifact(&p.include, "Common.mk", "local\n", T + 500);

    let fake = FakeTransport::new();
    let reporter = RecordingReporter::new();
    let settings = p.settings_with(|o| o.force = true);
    let report = Session::new(&settings, &fake, &reporter)
        .install()
        .expect("install");

    assert_eq!(report.summary.installed, 1);
    assert_eq!(
        fs::read_to_string(p.include.join("Common.mk")).unwrap(),
        "upstream\n"
    );
}

#[test]
fn install_respects_inclusion_filter() {
    let p = Project::new();
    for name in ["Common.mk", "Rust.mk", "Python.mk"] {
        fixtures::write_artifact(&p.upstream_files(), name, name, T);
    }

    let fake = FakeTransport::new();
    let reporter = RecordingReporter::new();
    let settings = p.settings_with(|o| o.only = Some("RUST,common.mk,unknown".into()));
    let report = Session::new(&settings, &fake, &reporter)
        .install()
        .expect("install");

    assert_eq!(report.includes.len(), 2);
    assert!(p.include.join("Common.mk").exists());
    assert!(p.include.join("Rust.mk").exists());
    assert!(!p.include.join("Python.mk").exists());
}

#[test]
fn install_with_empty_selection_has_no_side_effects() {
    let p = Project::new();
    fixtures::write_artifact(&p.upstream_files(), "Common.mk", "c", T);

    let fake = FakeTransport::new();
    let reporter = RecordingReporter::new();
    let settings = p.settings_with(|o| o.only = Some("python".into()));
    let err = Session::new(&settings, &fake, &reporter)
        .install()
        .unwrap_err();

    assert!(matches!(err, SyncError::EmptyResourceDir { .. }), "got: {err}");
    assert!(err.is_user_error());
    assert!(!p.include.exists(), "include dir must not be created");
    assert!(!p.makefile.exists(), "root makefile must not be written");
}

#[test]
fn install_refreshes_an_existing_mirror() {
    let p = Project::new();
    fixtures::write_artifact(&p.upstream_files(), "Common.mk", "c", T);

    let fake = FakeTransport::new();
    let reporter = RecordingReporter::new();
    let settings = p.settings();
    let session = Session::new(&settings, &fake, &reporter);
    session.install().expect("first install");

    fixtures::write_artifact(&p.upstream_files(), "Late.mk", "late", T);
    session.install().expect("second install");

    assert!(fake.steps().contains(&Step::Refresh));
    assert!(p.include.join("Late.mk").exists());
}

// ---------------------------------------------------------------------------
// 2. Pull
// ---------------------------------------------------------------------------

#[test]
fn pull_updates_older_files_and_never_introduces_new_ones() {
    let p = Project::new();
    fixtures::write_artifact(&p.include, "Common.mk", "old local\n", T);
    fixtures::write_artifact(&p.upstream_files(), "Common.mk", "upstream\n", T + 10);
    fixtures::write_artifact(&p.upstream_files(), "New.mk", "new\n", T + 5);

    let fake = FakeTransport::new();
    let reporter = RecordingReporter::new();
    let settings = p.settings();
    let report = Session::new(&settings, &fake, &reporter)
        .pull()
        .expect("pull");

    assert_eq!(report.summary.updated, 1);
    let common = p.include.join("Common.mk");
    assert_eq!(fs::read_to_string(&common).unwrap(), "upstream\n");
    assert_eq!(fixtures::mtime(&common), fixtures::at(T + 10));
    assert!(!p.include.join("New.mk").exists(), "pull must not add files");
    assert!(reporter.contains(Level::Info, "1 file(s) updated"));
}

#[test]
fn pull_right_after_pull_copies_nothing() {
    let p = Project::new();
    fixtures::write_artifact(&p.include, "Common.mk", "old\n", T);
    fixtures::write_artifact(&p.upstream_files(), "Common.mk", "new\n", T + 10);

    let fake = FakeTransport::new();
    let reporter = RecordingReporter::new();
    let settings = p.settings();
    let session = Session::new(&settings, &fake, &reporter);
    session.pull().expect("first pull");
    let second = session.pull().expect("second pull");

    assert_eq!(second.summary.copied(), 0);
    assert_eq!(second.summary.skipped_unchanged, 1);
    assert!(reporter.contains(Level::Notice, "skipping unchanged"));
}

#[test]
fn pull_keeps_newer_local_edits_unless_forced() {
    let p = Project::new();
    fixtures::write_artifact(&p.include, "Edited.mk", "mine\n", T + 100);
    fixtures::write_artifact(&p.upstream_files(), "Edited.mk", "theirs\n", T);

    let fake = FakeTransport::new();
    let reporter = RecordingReporter::new();
    let settings = p.settings();
    let report = Session::new(&settings, &fake, &reporter)
        .pull()
        .expect("pull");

    assert_eq!(report.summary.skipped_newer, 1);
    assert_eq!(
        fs::read_to_string(p.include.join("Edited.mk")).unwrap(),
        "mine\n"
    );
    assert!(reporter.contains(Level::Notice, "is more recent, skipping"));

    let forced = p.settings_with(|o| o.force = true);
    let report = Session::new(&forced, &fake, &reporter)
        .pull()
        .expect("forced pull");
    assert_eq!(report.summary.updated, 1);
    assert_eq!(
        fs::read_to_string(p.include.join("Edited.mk")).unwrap(),
        "theirs\n"
    );
}

#[test]
fn pull_without_include_dir_fails_before_touching_the_remote() {
    let p = Project::new();
    fixtures::write_artifact(&p.upstream_files(), "Common.mk", "c", T);

    let fake = FakeTransport::new();
    let reporter = RecordingReporter::new();
    let settings = p.settings();
    let err = Session::new(&settings, &fake, &reporter).pull().unwrap_err();

    match &err {
        SyncError::MissingLocalDir { path } => assert_eq!(path, &p.include),
        other => panic!("expected MissingLocalDir, got {other:?}"),
    }
    assert!(err.to_string().contains(&p.include.display().to_string()));
    assert!(fake.calls().is_empty());
}

#[test]
fn pull_propagates_refresh_failure() {
    let p = Project::new();
    fixtures::write_artifact(&p.include, "Common.mk", "c", T);
    fixtures::write_artifact(&p.upstream_files(), "Common.mk", "c", T);

    let fake = FakeTransport::new();
    fake.fail_at(Step::Refresh);
    let reporter = RecordingReporter::new();
    let settings = p.settings();
    let err = Session::new(&settings, &fake, &reporter).pull().unwrap_err();

    assert!(matches!(err, SyncError::Transport(_)), "got: {err}");
    assert!(!err.is_user_error());
}

// ---------------------------------------------------------------------------
// 3. List
// ---------------------------------------------------------------------------

#[test]
fn list_returns_sorted_filtered_names() {
    let p = Project::new();
    for name in ["Rust.mk", "Common.mk", "Python.mk"] {
        fixtures::write_artifact(&p.upstream_files(), name, name, T);
    }
    fixtures::write_artifact(&p.upstream_files(), "notes.txt", "x", T);

    let fake = FakeTransport::new();
    let reporter = RecordingReporter::new();
    let settings = p.settings();
    let all = Session::new(&settings, &fake, &reporter).list().expect("list");
    let names: Vec<_> = all.iter().map(|a| a.name.to_string()).collect();
    assert_eq!(names, vec!["Common.mk", "Python.mk", "Rust.mk"]);
}

#[test]
fn list_of_empty_remote_reports_empty_resource_dir() {
    let p = Project::new();

    let fake = FakeTransport::new();
    let reporter = RecordingReporter::new();
    let settings = p.settings();
    let err = Session::new(&settings, &fake, &reporter).list().unwrap_err();

    match err {
        SyncError::EmptyResourceDir { path } => assert_eq!(path, p.mirror_files()),
        other => panic!("expected EmptyResourceDir, got {other:?}"),
    }
    assert!(!p.include.exists());
}
