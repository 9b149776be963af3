//! JSON-file store.
//!
//! Layout: `<root>/videos/<identity>.json`, one [`VideoRecord`] per file.
//! Writes go to a sibling temp file which is then renamed over the target, so
//! a reader never observes a half-written record.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{MarkStore, PositionStore, StoreError, VideoRecord};
use crate::identity::VideoIdentity;

const VIDEOS_DIR: &str = "videos";
const RECORD_EXTENSION: &str = "json";

/// File-backed store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record file for `video`.
    pub fn record_path(&self, video: &VideoIdentity) -> PathBuf {
        self.root
            .join(VIDEOS_DIR)
            .join(format!("{}.{}", video.as_str(), RECORD_EXTENSION))
    }

    /// Read one record. A missing file is an empty record.
    pub fn read_record(&self, video: &VideoIdentity) -> Result<VideoRecord, StoreError> {
        let path = self.record_path(video);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(VideoRecord::default()),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt { path, source })
    }

    /// Replace one record atomically. An empty record deletes the file.
    pub fn write_record(&self, video: &VideoIdentity, record: &VideoRecord) -> Result<(), StoreError> {
        if record.is_empty() {
            return self.purge(video);
        }

        let path = self.record_path(video);
        let json = serde_json::to_string_pretty(record)?;

        let write = |target: &Path| -> std::io::Result<()> {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let tmp = target.with_extension(format!("{}.tmp", RECORD_EXTENSION));
            fs::write(&tmp, json.as_bytes())?;
            fs::rename(&tmp, target)
        };
        write(&path).map_err(|source| StoreError::Write { path, source })?;

        debug!(video = %video, marks = record.marks.len(), "record saved");
        Ok(())
    }

    /// Delete every persisted trace of `video`. Deleting nothing is fine.
    pub fn purge(&self, video: &VideoIdentity) -> Result<(), StoreError> {
        let path = self.record_path(video);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(video = %video, "record purged");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Write { path, source }),
        }
    }

    /// All stored records, sorted by identity. Unreadable entries are skipped.
    pub fn list(&self) -> Result<Vec<(VideoIdentity, VideoRecord)>, StoreError> {
        let dir = self.root.join(VIDEOS_DIR);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Read { path: dir, source }),
        };

        let mut records = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(video) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| VideoIdentity::parse(s).ok())
            else {
                continue;
            };
            match self.read_record(&video) {
                Ok(record) => records.push((video, record)),
                Err(e) => warn!("skipping unreadable record: {}", e),
            }
        }
        records.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(records)
    }

    /// Read-modify-write, absorbing failures the way the traits promise.
    fn update(&self, video: &VideoIdentity, apply: impl FnOnce(&mut VideoRecord)) {
        let mut record = self.load_record(video);
        apply(&mut record);
        if let Err(e) = self.write_record(video, &record) {
            warn!("failed to persist state for {}: {}", video, e);
        }
    }

    /// Record or empty on any error (logged).
    fn load_record(&self, video: &VideoIdentity) -> VideoRecord {
        self.read_record(video).unwrap_or_else(|e| {
            warn!("treating record as empty: {}", e);
            VideoRecord::default()
        })
    }
}

impl MarkStore for JsonFileStore {
    fn load(&self, video: &VideoIdentity) -> Vec<f64> {
        self.load_record(video).marks
    }

    fn save(&self, video: &VideoIdentity, marks: &[f64]) {
        self.update(video, |r| r.marks = marks.to_vec());
    }

    fn clear(&self, video: &VideoIdentity) {
        self.update(video, |r| r.marks.clear());
    }
}

impl PositionStore for JsonFileStore {
    fn position(&self, video: &VideoIdentity) -> Option<f64> {
        self.load_record(video).position
    }

    fn save_position(&self, video: &VideoIdentity, position: f64) {
        self.update(video, |r| r.position = Some(position));
    }

    fn last_played(&self, video: &VideoIdentity) -> Option<DateTime<Utc>> {
        self.load_record(video).last_played
    }

    fn update_last_played(&self, video: &VideoIdentity) {
        self.update(video, |r| r.last_played = Some(Utc::now()));
    }
}
