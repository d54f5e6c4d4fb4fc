//! End-to-end CLI tests
//!
//! Every invocation here uses --once (or fails during validation), so no
//! test ever starts the polling loop.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a Command for the doppel binary
fn doppel_cmd() -> Command {
    Command::cargo_bin("doppel").expect("Failed to find doppel binary")
}

#[test]
fn test_no_args_reports_missing_watched_dir() {
    doppel_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("no watched directory"));
}

#[test]
fn test_missing_copy_to_reported() {
    let watched = TempDir::new().expect("create watched tempdir");

    doppel_cmd()
        .args(["--watched"])
        .arg(watched.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no copy-to directory"));
}

#[test]
fn test_nonexistent_watched_dir_rejected() {
    let base = TempDir::new().expect("create base tempdir");

    doppel_cmd()
        .arg("-w")
        .arg(base.path().join("missing"))
        .arg("-c")
        .arg(base.path().join("copy"))
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_same_roots_rejected() {
    let dir = TempDir::new().expect("create tempdir");

    doppel_cmd()
        .arg("-w")
        .arg(dir.path())
        .arg("-c")
        .arg(dir.path())
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("same as the watched"));
}

#[test]
fn test_nested_roots_rejected() {
    let watched = TempDir::new().expect("create watched tempdir");

    doppel_cmd()
        .arg("-w")
        .arg(watched.path())
        .arg("-c")
        .arg(watched.path().join("inner"))
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("may not contain each other"));
}

#[test]
fn test_once_mirrors_the_tree() {
    let watched = TempDir::new().expect("create watched tempdir");
    let copy = TempDir::new().expect("create copy tempdir");

    fs::create_dir(watched.path().join("sub")).expect("create sub dir");
    fs::write(watched.path().join("sub/data.txt"), b"payload").expect("write data file");

    doppel_cmd()
        .arg("-w")
        .arg(watched.path())
        .arg("-c")
        .arg(copy.path())
        .arg("--once")
        .assert()
        .success()
        .stdout(predicate::str::contains("doppel"));

    assert_eq!(
        fs::read(copy.path().join("sub/data.txt")).expect("read mirrored file"),
        b"payload"
    );
}

#[test]
fn test_once_on_converged_trees_reports_nothing_to_do() {
    let watched = TempDir::new().expect("create watched tempdir");
    let copy = TempDir::new().expect("create copy tempdir");

    fs::write(watched.path().join("a.txt"), b"a").expect("write a.txt");
    fs::write(copy.path().join("a.txt"), b"a").expect("write mirrored a.txt");

    doppel_cmd()
        .arg("-w")
        .arg(watched.path())
        .arg("-c")
        .arg(copy.path())
        .arg("--once")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to mirror."));
}

#[test]
fn test_log_dir_gets_a_launch_log() {
    let watched = TempDir::new().expect("create watched tempdir");
    let copy = TempDir::new().expect("create copy tempdir");
    let logs = TempDir::new().expect("create logs tempdir");

    fs::write(watched.path().join("a.txt"), b"a").expect("write a.txt");

    doppel_cmd()
        .arg("-w")
        .arg(watched.path())
        .arg("-c")
        .arg(copy.path())
        .arg("-l")
        .arg(logs.path())
        .arg("--once")
        .assert()
        .success();

    let names: Vec<String> = fs::read_dir(logs.path())
        .expect("list logs dir")
        .map(|entry| {
            entry
                .expect("read logs dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();

    assert_eq!(names.len(), 1, "one launch writes one log: {names:?}");
    assert!(names[0].starts_with("Logs_") && names[0].ends_with(".log"));
}

#[test]
fn test_config_file_supplies_directories() {
    let watched = TempDir::new().expect("create watched tempdir");
    let copy = TempDir::new().expect("create copy tempdir");
    let base = TempDir::new().expect("create base tempdir");

    fs::write(watched.path().join("a.txt"), b"from-file-settings").expect("write a.txt");

    let settings_path = base.path().join("doppel.toml");
    let settings = format!(
        "watched = {:?}\ncopy_to = {:?}\n",
        watched.path(),
        copy.path()
    );
    fs::write(&settings_path, settings).expect("write settings file");

    doppel_cmd()
        .arg("--config")
        .arg(&settings_path)
        .arg("--once")
        .assert()
        .success();

    assert_eq!(
        fs::read(copy.path().join("a.txt")).expect("read mirrored file"),
        b"from-file-settings"
    );
}

#[test]
fn test_cli_flags_override_config_file() {
    let watched_a = TempDir::new().expect("create first watched tempdir");
    let watched_b = TempDir::new().expect("create second watched tempdir");
    let copy = TempDir::new().expect("create copy tempdir");
    let base = TempDir::new().expect("create base tempdir");

    fs::write(watched_a.path().join("from_file.txt"), b"file").expect("write file-settings file");
    fs::write(watched_b.path().join("from_cli.txt"), b"cli").expect("write cli file");

    let settings_path = base.path().join("doppel.toml");
    let settings = format!(
        "watched = {:?}\ncopy_to = {:?}\n",
        watched_a.path(),
        copy.path()
    );
    fs::write(&settings_path, settings).expect("write settings file");

    doppel_cmd()
        .arg("--config")
        .arg(&settings_path)
        .arg("-w")
        .arg(watched_b.path())
        .arg("--once")
        .assert()
        .success();

    assert!(copy.path().join("from_cli.txt").exists());
    assert!(!copy.path().join("from_file.txt").exists());
}

#[test]
fn test_unknown_settings_key_rejected() {
    let base = TempDir::new().expect("create base tempdir");
    let settings_path = base.path().join("doppel.toml");
    fs::write(&settings_path, "wached = \"/tmp/typo\"\n").expect("write settings file");

    doppel_cmd()
        .arg("--config")
        .arg(&settings_path)
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse settings file"));
}

#[test]
fn test_nonpositive_interval_warns_and_continues() {
    let watched = TempDir::new().expect("create watched tempdir");
    let copy = TempDir::new().expect("create copy tempdir");

    doppel_cmd()
        .arg("-w")
        .arg(watched.path())
        .arg("-c")
        .arg(copy.path())
        .args(["-i", "0", "--once"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning"));
}

#[test]
fn test_byte_by_byte_flag_accepted() {
    let watched = TempDir::new().expect("create watched tempdir");
    let copy = TempDir::new().expect("create copy tempdir");

    fs::write(watched.path().join("data.txt"), b"new").expect("write source file");
    fs::write(copy.path().join("data.txt"), b"old").expect("write stale mirrored file");

    doppel_cmd()
        .arg("-w")
        .arg(watched.path())
        .arg("-c")
        .arg(copy.path())
        .args(["--byte-by-byte", "--once"])
        .assert()
        .success();

    assert_eq!(
        fs::read(copy.path().join("data.txt")).expect("read refreshed file"),
        b"new"
    );
}

#[test]
fn test_help_mentions_both_directories() {
    doppel_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--watched"))
        .stdout(predicate::str::contains("--copy-to"))
        .stdout(predicate::str::contains("--once"));
}
