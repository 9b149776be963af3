//! File store integration tests

use std::fs;

use tempfile::TempDir;

use loopmark::store::{JsonFileStore, MarkStore, PositionStore, StoreError};
use loopmark::VideoIdentity;

use super::helpers::video;

#[test]
fn marks_round_trip_in_order() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());

    store.save(&video(), &[10.0, 40.5, 70.25]);
    assert_eq!(store.load(&video()), vec![10.0, 40.5, 70.25]);

    // A fresh handle on the same directory sees the same data
    let reopened = JsonFileStore::new(dir.path());
    assert_eq!(reopened.load(&video()), vec![10.0, 40.5, 70.25]);
}

#[test]
fn videos_are_kept_apart() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    let other = VideoIdentity::from_location("/media/lessons/arpeggios.mp4");

    store.save(&video(), &[1.0]);
    store.save(&other, &[2.0, 3.0]);
    store.clear(&video());

    assert!(store.load(&video()).is_empty());
    assert_eq!(store.load(&other), vec![2.0, 3.0]);
}

#[test]
fn clearing_marks_keeps_position() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());

    store.save(&video(), &[10.0, 20.0]);
    store.save_position(&video(), 15.0);
    store.clear(&video());

    assert!(store.load(&video()).is_empty());
    assert_eq!(store.position(&video()), Some(15.0));
}

#[test]
fn purge_removes_everything() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());

    store.save(&video(), &[10.0]);
    store.save_position(&video(), 5.0);
    store.update_last_played(&video());
    store.purge(&video()).unwrap();

    assert!(!store.record_path(&video()).exists());
    assert!(store.load(&video()).is_empty());
    assert_eq!(store.position(&video()), None);
    assert_eq!(store.last_played(&video()), None);
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn corrupt_record_reads_as_empty_through_trait() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    let path = store.record_path(&video());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{ not json").unwrap();

    assert!(store.load(&video()).is_empty());
    assert!(matches!(
        store.read_record(&video()),
        Err(StoreError::Corrupt { .. })
    ));
}

#[test]
fn unwritable_root_is_absorbed() {
    let dir = TempDir::new().unwrap();
    // A file where the data directory should be
    let root = dir.path().join("blocked");
    fs::write(&root, "").unwrap();
    let store = JsonFileStore::new(&root);

    store.save(&video(), &[10.0]);
    assert!(store.load(&video()).is_empty());
}

#[test]
fn list_reports_stored_videos() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    let other = VideoIdentity::from_location("https://example.com/watch/arpeggios.mp4?t=3");

    store.save(&video(), &[1.0, 2.0]);
    store.save_position(&other, 8.0);

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 2);
    let (_, record) = listed.iter().find(|(id, _)| *id == video()).unwrap();
    assert_eq!(record.marks, vec![1.0, 2.0]);
    let (_, record) = listed.iter().find(|(id, _)| *id == other).unwrap();
    assert_eq!(record.position, Some(8.0));
}
