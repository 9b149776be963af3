//! End-to-end tests of the `loopmark` binary

use predicates::prelude::*;
use tempfile::TempDir;

use loopmark::store::{JsonFileStore, MarkStore};
use loopmark::VideoIdentity;

use super::helpers::loopmark;

const CLIP: &str = "/media/lessons/scales.mp4";

#[test]
fn marks_add_list_remove_clear() {
    let home = TempDir::new().unwrap();

    loopmark(&home)
        .args(["marks", "add", CLIP, "40", "10", "10.25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 00:40.0"))
        .stdout(predicate::str::contains("Skipped 00:10.2"));

    loopmark(&home)
        .args(["marks", "list", CLIP])
        .assert()
        .success()
        .stdout(predicate::str::contains("00:10.0"))
        .stdout(predicate::str::contains("00:40.0"));

    loopmark(&home)
        .args(["marks", "remove", CLIP, "39.8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 00:40.0"));

    let store = JsonFileStore::new(home.path().join("store"));
    assert_eq!(store.load(&VideoIdentity::from_location(CLIP)), vec![10.0]);

    loopmark(&home)
        .args(["marks", "clear", CLIP])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 mark(s)"));

    loopmark(&home)
        .args(["marks", "list", CLIP])
        .assert()
        .success()
        .stdout(predicate::str::contains("No marks"));
}

#[test]
fn negative_mark_is_rejected() {
    let home = TempDir::new().unwrap();
    loopmark(&home)
        .args(["marks", "add", CLIP, "-4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-negative"));
}

#[test]
fn library_and_purge() {
    let home = TempDir::new().unwrap();
    let id = VideoIdentity::from_location(CLIP);

    loopmark(&home)
        .arg("library")
        .assert()
        .success()
        .stdout(predicate::str::contains("No videos stored"));

    loopmark(&home)
        .args(["marks", "add", CLIP, "12"])
        .assert()
        .success();

    loopmark(&home)
        .arg("library")
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()))
        .stdout(predicate::str::contains("1 mark(s)"));

    loopmark(&home)
        .args(["purge", "--id", id.as_str()])
        .assert()
        .success();

    loopmark(&home)
        .arg("library")
        .assert()
        .success()
        .stdout(predicate::str::contains("No videos stored"));
}

#[test]
fn bad_identity_is_an_error() {
    let home = TempDir::new().unwrap();
    loopmark(&home)
        .args(["marks", "list", "--id", "Not An Id"])
        .assert()
        .failure();
}

#[test]
fn play_session_from_stdin() {
    let home = TempDir::new().unwrap();

    loopmark(&home)
        .args(["play", CLIP, "--duration", "90"])
        .write_stdin("g 10\nm\ng 40\nm\ng 20\nl\nbogus\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("marks 2 segment 1/1"))
        .stdout(predicate::str::contains("loop 00:10.0-00:40.0"))
        .stderr(predicate::str::contains("unknown command 'bogus'"));

    let store = JsonFileStore::new(home.path().join("store"));
    let id = VideoIdentity::from_location(CLIP);
    assert_eq!(store.load(&id), vec![10.0, 40.0]);
}

#[test]
fn play_rejects_bad_duration() {
    let home = TempDir::new().unwrap();
    loopmark(&home)
        .args(["play", CLIP, "--duration", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--duration"));
}

#[test]
fn config_show_prints_defaults() {
    let home = TempDir::new().unwrap();
    loopmark(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[looping]"))
        .stdout(predicate::str::contains("duration_secs = 30.0"));
}

#[test]
fn config_migrate_with_yes_creates_file() {
    let home = TempDir::new().unwrap();
    loopmark(&home)
        .args(["config", "migrate", "--yes"])
        .assert()
        .success();

    loopmark(&home)
        .args(["config", "migrate", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"));
}

#[test]
fn completions_generate() {
    let home = TempDir::new().unwrap();
    loopmark(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("loopmark"));
}
