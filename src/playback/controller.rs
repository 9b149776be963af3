//! The segment-loop playback state machine.
//!
//! [`PlaybackController`] owns playback position, the mark list, loop state
//! and the single in-flight seek for one video. User operations and sampler
//! ticks are plain `&mut self` calls, so they are totally ordered by
//! construction; the only asynchronous piece is seek acknowledgement, which
//! comes back through [`PlaybackController::poll_seek`] or
//! [`PlaybackController::complete_seek`].
//!
//! While a seek is outstanding every mutating operation is a silent no-op
//! (it returns `false`/`None`), and ticks do not overwrite the position with
//! stale samples.

use tracing::{debug, warn};

use super::loop_timer::LoopTick;
use super::marks::{MarkList, MarkToggle};
use super::seeking::{CompletedSeek, SeekCoordinator};
use super::segments::{
    locate, next_mark_after, previous_mark_before, segment_count, segment_end, segment_start,
};
use super::session_timer::SessionTimer;
use super::state::{sanitize_seconds, ControllerSnapshot, LoopState, PlaybackState};
use crate::config::{Config, LoopConfig, MarksConfig, ResumePolicy, SeekingConfig};
use crate::identity::VideoIdentity;
use crate::player::{MediaPlayer, SeekCompletion, SeekOutcome};
use crate::store::MarkStore;

/// How a seek treats transport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeekKind {
    /// Explicit seek: pause, resume afterwards only in loop mode
    Direct,
    /// Mark or segment jump: pause, resume per [`ResumePolicy`]
    Jump,
    /// Loop correction: leave transport alone
    Correction,
}

/// Playback controller for one video session.
#[derive(Debug)]
pub struct PlaybackController<P, S> {
    player: P,
    store: S,
    video: VideoIdentity,

    marks_config: MarksConfig,
    loop_config: LoopConfig,
    seeking_config: SeekingConfig,

    playback: PlaybackState,
    looping: LoopState,
    marks: MarkList,
    seeks: SeekCoordinator,
    session_timer: SessionTimer,

    step_index: usize,
    /// Sampler seconds since the last loop-boundary correction
    since_correction: f64,
}

impl<P: MediaPlayer, S: MarkStore> PlaybackController<P, S> {
    /// Create a controller, loading the video's marks from `store`.
    ///
    /// Duration and position are read from the player and sanitised.
    /// Playback is assumed paused.
    pub fn new(player: P, store: S, video: VideoIdentity, config: &Config) -> Self {
        let playback = {
            let mut state = PlaybackState::new(player.duration());
            state.set_current_time(player.current_time());
            state
        };
        let marks = MarkList::from_values(store.load(&video), config.marks.proximity_tolerance);
        debug!(video = %video, marks = marks.len(), "controller created");

        let mut controller = Self {
            player,
            store,
            video,
            marks_config: config.marks.clone(),
            loop_config: config.looping.clone(),
            seeking_config: config.seeking.clone(),
            playback,
            looping: LoopState::new(config.looping.duration_secs),
            marks,
            seeks: SeekCoordinator::new(),
            session_timer: SessionTimer::new(),
            step_index: config
                .seeking
                .default_step_index
                .min(config.seeking.step_options.len().saturating_sub(1)),
            since_correction: f64::INFINITY,
        };
        controller.relocate_segment();
        controller
    }

    // === Queries ===

    pub fn video(&self) -> &VideoIdentity {
        &self.video
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current_time(&self) -> f64 {
        self.playback.current_time()
    }

    pub fn duration(&self) -> f64 {
        self.playback.duration()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing
    }

    pub fn is_seeking(&self) -> bool {
        self.seeks.is_in_progress()
    }

    pub fn marks(&self) -> &[f64] {
        self.marks.as_slice()
    }

    pub fn is_looping(&self) -> bool {
        self.looping.is_looping
    }

    pub fn segment_index(&self) -> usize {
        self.looping.segment_index
    }

    pub fn segment_count(&self) -> usize {
        segment_count(self.marks.as_slice())
    }

    /// `[start, end)` of the current segment, if there is one.
    pub fn segment_bounds(&self) -> Option<(f64, f64)> {
        let marks = self.marks.as_slice();
        let idx = self.looping.segment_index;
        (idx < segment_count(marks)).then(|| {
            (
                segment_start(marks, idx),
                segment_end(marks, idx, self.duration()),
            )
        })
    }

    pub fn loop_timer_active(&self) -> bool {
        self.looping.timer.is_active()
    }

    pub fn loop_time_remaining(&self) -> f64 {
        self.looping.timer.remaining()
    }

    /// Current skip step in seconds.
    pub fn seek_step(&self) -> f64 {
        self.seeking_config
            .step_options
            .get(self.step_index)
            .copied()
            .unwrap_or(5.0)
    }

    pub fn session_timer(&self) -> &SessionTimer {
        &self.session_timer
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            current_time: self.current_time(),
            duration: self.duration(),
            is_playing: self.is_playing(),
            is_seek_in_progress: self.is_seeking(),
            marks: self.marks.to_vec(),
            is_looping: self.is_looping(),
            segment_index: self.segment_index(),
            segment_count: self.segment_count(),
            loop_bounds: self.segment_bounds().filter(|_| self.is_looping()),
            loop_timer_active: self.loop_timer_active(),
            loop_time_remaining: self.loop_time_remaining(),
            seek_step: self.seek_step(),
            session_elapsed: self.session_timer.elapsed(),
            session_timer_running: self.session_timer.is_running(),
        }
    }

    // === Transport ===

    /// Flip between playing and paused.
    pub fn toggle_play_pause(&mut self) -> bool {
        if self.is_seeking() {
            return false;
        }
        if self.playback.is_playing {
            self.pause();
        } else {
            self.play();
        }
        true
    }

    /// Seek to `time` (clamped). Always pauses first.
    pub fn seek_to(&mut self, time: f64) -> bool {
        self.issue_seek(time, SeekKind::Direct)
    }

    /// Skip back by the current step.
    pub fn seek_backward(&mut self) -> bool {
        self.seek_to(self.current_time() - self.seek_step())
    }

    /// Skip forward by the current step.
    pub fn seek_forward(&mut self) -> bool {
        self.seek_to(self.current_time() + self.seek_step())
    }

    /// Advance to the next configured step size (wrapping). Returns the new step.
    pub fn cycle_seek_step(&mut self) -> f64 {
        let count = self.seeking_config.step_options.len().max(1);
        self.step_index = (self.step_index + 1) % count;
        self.seek_step()
    }

    /// Accept a duration reported late by the player.
    pub fn set_duration(&mut self, duration: f64) {
        self.playback.set_duration(duration);
        if self.duration() <= 0.0 && self.looping.is_looping {
            warn!(video = %self.video, "duration unusable, leaving loop mode");
            self.looping.disable();
        }
    }

    // === Marks ===

    /// Remove the mark near the playhead, or add one at the playhead.
    pub fn toggle_mark(&mut self) -> Option<MarkToggle> {
        if self.is_seeking() {
            return None;
        }
        self.pause();

        let toggled = self
            .marks
            .toggle(self.current_time(), self.marks_config.proximity_tolerance);
        debug!(video = %self.video, ?toggled, "mark toggled");

        self.after_marks_changed();
        self.store.save(&self.video, self.marks.as_slice());
        Some(toggled)
    }

    /// Drop every mark and leave loop mode.
    pub fn clear_marks(&mut self) -> bool {
        if self.is_seeking() {
            return false;
        }
        self.pause();
        self.marks.clear();
        self.looping.disable();
        self.looping.segment_index = 0;
        self.store.clear(&self.video);
        debug!(video = %self.video, "marks cleared");
        true
    }

    /// Move the mark near the playhead earlier by `step` seconds.
    pub fn finetune_mark_left(&mut self, step: f64) -> Option<f64> {
        self.finetune_mark(-step.abs())
    }

    /// Move the mark near the playhead later by `step` seconds.
    pub fn finetune_mark_right(&mut self, step: f64) -> Option<f64> {
        self.finetune_mark(step.abs())
    }

    fn finetune_mark(&mut self, delta: f64) -> Option<f64> {
        if self.is_seeking() || !delta.is_finite() {
            return None;
        }
        let tolerance = self.marks_config.proximity_tolerance;
        let idx = self.marks.find(self.current_time(), tolerance)?;
        let moved = self.marks.shift(idx, delta, self.duration(), tolerance)?;
        debug!(video = %self.video, moved, "mark fine-tuned");

        self.store.save(&self.video, self.marks.as_slice());
        if self.segment_count() > 0 {
            self.looping.segment_index = locate(self.marks.as_slice(), moved);
        }
        self.issue_seek(moved, SeekKind::Direct);
        Some(moved)
    }

    // === Looping ===

    /// Enter or leave loop mode. Returns whether loop mode is now on.
    ///
    /// Entering needs at least two marks and a usable duration; otherwise
    /// loop mode is forced off.
    pub fn toggle_loop(&mut self) -> bool {
        if self.is_seeking() {
            return self.looping.is_looping;
        }
        if self.looping.is_looping {
            self.looping.disable();
            debug!(video = %self.video, "loop off");
            return false;
        }
        if self.segment_count() == 0 || self.duration() <= 0.0 {
            self.looping.disable();
            return false;
        }

        self.looping.is_looping = true;
        self.relocate_segment();
        self.looping.timer.reset();
        debug!(
            video = %self.video,
            segment = self.looping.segment_index,
            "loop on"
        );

        if let Some((start, end)) = self.segment_bounds() {
            let now = self.current_time();
            if now < start || now >= end {
                self.issue_seek(start, SeekKind::Correction);
            }
        }
        true
    }

    /// Go to the following segment (wrapping) and seek to its start.
    pub fn next_segment(&mut self) -> bool {
        self.step_segment(true)
    }

    /// Go to the preceding segment (wrapping) and seek to its start.
    pub fn previous_segment(&mut self) -> bool {
        self.step_segment(false)
    }

    fn step_segment(&mut self, forward: bool) -> bool {
        let count = self.segment_count();
        if count == 0 || self.is_seeking() {
            return false;
        }
        let idx = self.looping.segment_index.min(count - 1);
        self.looping.segment_index = if forward {
            (idx + 1) % count
        } else {
            (idx + count - 1) % count
        };
        if self.looping.is_looping {
            self.looping.timer.reset();
        }
        let start = segment_start(self.marks.as_slice(), self.looping.segment_index);
        self.issue_seek(start, SeekKind::Jump)
    }

    /// Jump to the next mark (wrapping to the first), or the next segment
    /// in loop mode.
    pub fn jump_to_next_mark(&mut self) -> bool {
        self.jump_to_mark(true)
    }

    /// Jump to the previous mark (wrapping to the last), or the previous
    /// segment in loop mode.
    pub fn jump_to_previous_mark(&mut self) -> bool {
        self.jump_to_mark(false)
    }

    fn jump_to_mark(&mut self, forward: bool) -> bool {
        if self.is_seeking() {
            return false;
        }
        if self.looping.is_looping {
            return self.step_segment(forward);
        }

        let marks = self.marks.as_slice();
        let now = self.current_time();
        let tolerance = self.marks_config.jump_tolerance;
        let target = if forward {
            next_mark_after(marks, now, tolerance)
        } else {
            previous_mark_before(marks, now, tolerance)
        };
        let Some(target) = target else {
            return false;
        };

        self.looping.segment_index = locate(marks, target);
        self.issue_seek(target, SeekKind::Jump)
    }

    // === Session timer ===

    /// Restart the practice stopwatch.
    pub fn start_timer(&mut self) {
        self.session_timer.start();
    }

    // === Sampler ===

    /// Feed one sampler tick: the player's reported time and the seconds
    /// elapsed since the previous tick.
    pub fn on_tick(&mut self, player_time: f64, delta: f64) {
        let delta = if delta.is_finite() && delta > 0.0 {
            delta
        } else {
            0.0
        };
        self.session_timer.tick(delta);

        if self.is_seeking() {
            // The sample predates the seek target
            return;
        }

        let previous = self.current_time();
        self.playback.set_current_time(player_time);
        self.since_correction += delta;

        if !self.playback.is_playing {
            return;
        }

        if self.looping.is_looping {
            self.enforce_loop(delta);
        } else if self.marks_config.pause_at_marks {
            self.pause_at_passed_mark(previous);
        }
    }

    fn enforce_loop(&mut self, delta: f64) {
        if self.looping.timer.tick(delta, self.playback.is_playing) == LoopTick::Advance {
            let count = self.segment_count();
            if count > 0 {
                self.looping.segment_index = (self.looping.segment_index + 1) % count;
                let start = segment_start(self.marks.as_slice(), self.looping.segment_index);
                debug!(
                    video = %self.video,
                    segment = self.looping.segment_index,
                    "loop timer expired, advancing"
                );
                self.since_correction = 0.0;
                self.issue_seek(start, SeekKind::Correction);
            }
            return;
        }

        let Some((start, end)) = self.segment_bounds() else {
            return;
        };
        let now = self.current_time();
        if (now >= end || now < start) && self.since_correction >= self.loop_config.boundary_debounce_secs
        {
            debug!(video = %self.video, now, start, end, "segment boundary, looping back");
            self.since_correction = 0.0;
            self.issue_seek(start, SeekKind::Correction);
        }
    }

    fn pause_at_passed_mark(&mut self, previous: f64) {
        let now = self.current_time();
        let window = self.marks_config.pause_tolerance;
        let passed = self
            .marks
            .as_slice()
            .iter()
            .copied()
            .find(|&m| previous < m && m <= now && now - m <= window);

        if let Some(mark) = passed {
            debug!(video = %self.video, mark, "passed mark, pausing");
            self.issue_seek(mark, SeekKind::Direct);
        }
    }

    // === Seek completion ===

    /// Complete the outstanding seek if the player has answered.
    pub fn poll_seek(&mut self) -> Option<CompletedSeek> {
        let done = self.seeks.poll()?;
        self.apply_completed(done);
        Some(done)
    }

    /// Take the completion future of the outstanding seek so an async
    /// driver can await it, then report back via [`Self::complete_seek`].
    pub fn take_seek_completion(&mut self) -> Option<SeekCompletion> {
        self.seeks.take_completion()
    }

    /// Apply the player's answer to the outstanding seek.
    pub fn complete_seek(&mut self, outcome: SeekOutcome) -> Option<CompletedSeek> {
        let done = self.seeks.finish(outcome)?;
        self.apply_completed(done);
        Some(done)
    }

    fn apply_completed(&mut self, done: CompletedSeek) {
        if !done.finished {
            debug!(video = %self.video, to = done.target, "seek superseded, not committing");
            return;
        }
        self.playback.set_current_time(done.target);
        if done.resume {
            self.play();
        }
    }

    // === Internals ===

    fn play(&mut self) {
        self.player.play();
        self.playback.is_playing = true;
    }

    fn pause(&mut self) {
        if self.playback.is_playing {
            self.player.pause();
            self.playback.is_playing = false;
        }
    }

    fn issue_seek(&mut self, time: f64, kind: SeekKind) -> bool {
        if self.is_seeking() {
            return false;
        }
        let target = self.playback.clamp(sanitize_seconds(time, "seek target"));
        let was_playing = self.playback.is_playing;

        let resume = match kind {
            SeekKind::Direct => was_playing && self.looping.is_looping,
            SeekKind::Jump => {
                was_playing
                    && (self.looping.is_looping
                        || self.loop_config.resume_after_jump == ResumePolicy::Always)
            }
            SeekKind::Correction => false,
        };
        if kind != SeekKind::Correction {
            self.pause();
        }

        match self.seeks.begin(&mut self.player, target, resume) {
            Ok(()) => true,
            Err(e) => {
                debug!("seek not issued: {}", e);
                false
            }
        }
    }

    /// Recompute the segment index from the playhead and drop out of loop
    /// mode when segments disappear.
    fn after_marks_changed(&mut self) {
        if self.segment_count() == 0 {
            self.looping.disable();
            self.looping.segment_index = 0;
        } else {
            self.relocate_segment();
        }
    }

    fn relocate_segment(&mut self) {
        self.looping.segment_index = locate(self.marks.as_slice(), self.current_time());
    }
}
