//! Segment-loop playback core.
//!
//! # Architecture
//!
//! - `segments`: pure segment arithmetic over an ascending mark list
//! - `marks`: the mark set, distinct up to a proximity tolerance
//! - `seeking`: the single in-flight seek against the media player
//! - `loop_timer`: loop countdown driving segment auto-advance
//! - `session_timer`: practice stopwatch
//! - `state`: playback/loop state records and the UI snapshot
//! - `controller`: the state machine tying it all together
//!
//! # Usage
//!
//! ```no_run
//! use loopmark::config::Config;
//! use loopmark::identity::VideoIdentity;
//! use loopmark::player::SimulatedPlayer;
//! use loopmark::playback::PlaybackController;
//! use loopmark::store::MemoryStore;
//!
//! let video = VideoIdentity::from_location("/videos/lesson.mp4");
//! let mut controller = PlaybackController::new(
//!     SimulatedPlayer::new(90.0),
//!     MemoryStore::new(),
//!     video,
//!     &Config::default(),
//! );
//! controller.toggle_mark();
//! controller.poll_seek();
//! ```

mod controller;
mod loop_timer;
mod marks;
mod seeking;
pub mod segments;
mod session_timer;
mod state;

pub use controller::PlaybackController;
pub use loop_timer::{LoopTick, LoopTimer};
pub use marks::{MarkList, MarkToggle};
pub use seeking::{CompletedSeek, SeekCoordinator, SeekError};
pub use session_timer::SessionTimer;
pub use state::{sanitize_seconds, ControllerSnapshot, LoopState, PlaybackState};
