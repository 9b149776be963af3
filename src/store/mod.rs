//! Persistence for per-video marks, playback position and last-played time.
//!
//! The controller only sees the infallible [`MarkStore`] / [`PositionStore`]
//! traits: failures are logged and absorbed at this boundary, and the player
//! keeps working in memory. Backends expose fallible inherent methods for
//! callers (like the CLI) that want to report errors.
//!
//! - [`JsonFileStore`]: one JSON record per video in a data directory
//! - [`MemoryStore`]: in-process store shared between clones, used by tests

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::VideoIdentity;

/// Everything persisted for one video.
///
/// Kept in a single record so that purging a video removes marks, position
/// and last-played together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(default)]
    pub marks: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played: Option<DateTime<Utc>>,
}

impl VideoRecord {
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty() && self.position.is_none() && self.last_played.is_none()
    }
}

/// Durable mark list per video. Never fails from the caller's view.
pub trait MarkStore: Send {
    /// Stored marks, or empty when nothing (or nothing readable) is stored.
    fn load(&self, video: &VideoIdentity) -> Vec<f64>;

    /// Replace the stored marks. Last writer wins.
    fn save(&self, video: &VideoIdentity, marks: &[f64]);

    /// Remove the stored marks.
    fn clear(&self, video: &VideoIdentity);
}

/// Resume position and last-played timestamp per video.
pub trait PositionStore: Send {
    fn position(&self, video: &VideoIdentity) -> Option<f64>;

    fn save_position(&self, video: &VideoIdentity, position: f64);

    fn last_played(&self, video: &VideoIdentity) -> Option<DateTime<Utc>>;

    /// Stamp the video as played now.
    fn update_last_played(&self, video: &VideoIdentity);
}
