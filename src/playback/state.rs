//! Playback and loop state owned by the controller.
//!
//! Contains the two state records the controller mutates, plus
//! [`ControllerSnapshot`], the read-only view handed to rendering code.

use tracing::warn;

use super::loop_timer::LoopTimer;

/// Replace a garbage time value (NaN, infinite, negative) with 0.
///
/// `what` names the value in the data-quality log line.
pub fn sanitize_seconds(value: f64, what: &str) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!("invalid {} from media player: {}, treating as 0", what, value);
        0.0
    }
}

/// Position and transport state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    current_time: f64,
    duration: f64,
    /// Whether the player is (as far as the controller knows) playing
    pub is_playing: bool,
}

impl PlaybackState {
    pub fn new(duration: f64) -> Self {
        Self {
            current_time: 0.0,
            duration: sanitize_seconds(duration, "duration"),
            is_playing: false,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Clamp `time` into `[0, duration]`, sanitising garbage first.
    pub fn clamp(&self, time: f64) -> f64 {
        sanitize_seconds(time, "time").min(self.duration)
    }

    /// Write the current time, clamped.
    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = self.clamp(time);
    }

    /// Replace the duration and re-clamp the current time.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = sanitize_seconds(duration, "duration");
        self.current_time = self.current_time.min(self.duration);
    }
}

/// Loop mode state.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopState {
    pub is_looping: bool,
    /// Segment being looped; 0 when there are fewer than two marks
    pub segment_index: usize,
    pub timer: LoopTimer,
}

impl LoopState {
    pub fn new(loop_duration: f64) -> Self {
        Self {
            is_looping: false,
            segment_index: 0,
            timer: LoopTimer::new(loop_duration),
        }
    }

    /// Leave loop mode. Marks and segment index are untouched.
    pub fn disable(&mut self) {
        self.is_looping = false;
        self.timer.disable();
    }
}

/// Everything a UI needs to draw the player chrome.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub current_time: f64,
    pub duration: f64,
    pub is_playing: bool,
    pub is_seek_in_progress: bool,
    pub marks: Vec<f64>,
    pub is_looping: bool,
    pub segment_index: usize,
    pub segment_count: usize,
    /// Bounds of the current segment while looping
    pub loop_bounds: Option<(f64, f64)>,
    pub loop_timer_active: bool,
    pub loop_time_remaining: f64,
    pub seek_step: f64,
    pub session_elapsed: f64,
    pub session_timer_running: bool,
}
