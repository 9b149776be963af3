//! loopmark - segment-loop playback control
//!
//! Drop marks on a video's timeline, loop the segment between two marks, and
//! keep marks and the resume position per video across runs.
//!
//! - [`playback`]: the controller state machine and its pure helpers
//! - [`player`]: the media player seam and a simulated player
//! - [`session`]: the controller driven as a single async actor
//! - [`store`]: per-video persistence
//! - [`identity`]: stable per-video keys

pub mod cli;
pub mod config;
pub mod identity;
pub mod playback;
pub mod player;
pub mod session;
pub mod status;
pub mod store;
pub mod theme;

pub use config::Config;
pub use identity::VideoIdentity;
pub use playback::PlaybackController;
pub use session::{Command, PlayerSession, SessionHandle};
