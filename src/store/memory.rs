//! In-memory store.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::{MarkStore, PositionStore, VideoRecord};
use crate::identity::VideoIdentity;

/// Store backed by a shared map. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<BTreeMap<VideoIdentity, VideoRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, BTreeMap<VideoIdentity, VideoRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of one video's record.
    pub fn record(&self, video: &VideoIdentity) -> Option<VideoRecord> {
        self.records().get(video).cloned()
    }

    /// Remove every record of `video`.
    pub fn purge(&self, video: &VideoIdentity) {
        self.records().remove(video);
    }

    fn update(&self, video: &VideoIdentity, apply: impl FnOnce(&mut VideoRecord)) {
        let mut records = self.records();
        let record = records.entry(video.clone()).or_default();
        apply(record);
        if record.is_empty() {
            records.remove(video);
        }
    }
}

impl MarkStore for MemoryStore {
    fn load(&self, video: &VideoIdentity) -> Vec<f64> {
        self.record(video).map(|r| r.marks).unwrap_or_default()
    }

    fn save(&self, video: &VideoIdentity, marks: &[f64]) {
        self.update(video, |r| r.marks = marks.to_vec());
    }

    fn clear(&self, video: &VideoIdentity) {
        self.update(video, |r| r.marks.clear());
    }
}

impl PositionStore for MemoryStore {
    fn position(&self, video: &VideoIdentity) -> Option<f64> {
        self.record(video).and_then(|r| r.position)
    }

    fn save_position(&self, video: &VideoIdentity, position: f64) {
        self.update(video, |r| r.position = Some(position));
    }

    fn last_played(&self, video: &VideoIdentity) -> Option<DateTime<Utc>> {
        self.record(video).and_then(|r| r.last_played)
    }

    fn update_last_played(&self, video: &VideoIdentity) {
        self.update(video, |r| r.last_played = Some(Utc::now()));
    }
}
