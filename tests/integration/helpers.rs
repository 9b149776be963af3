//! Shared fixtures for integration tests

use std::sync::{Arc, Mutex, MutexGuard};

use assert_cmd::Command;
use tempfile::TempDir;

use loopmark::player::{MediaPlayer, SeekCompletion, SeekResponder};
use loopmark::store::{MarkStore, MemoryStore};
use loopmark::{Config, PlaybackController, VideoIdentity};

#[derive(Default)]
pub struct FakeState {
    pub duration: f64,
    pub time: f64,
    pub playing: bool,
    pub seeks: Vec<f64>,
    pub pending: Vec<SeekResponder>,
}

/// Player whose seeks resolve only when the test answers them.
///
/// Clones share state, so the test keeps a handle after the controller takes
/// ownership.
#[derive(Clone, Default)]
pub struct FakePlayer {
    state: Arc<Mutex<FakeState>>,
}

impl FakePlayer {
    pub fn new(duration: f64, time: f64) -> Self {
        let player = Self::default();
        {
            let mut state = player.state();
            state.duration = duration;
            state.time = time;
        }
        player
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Answer the oldest unanswered seek.
    pub fn answer(&self, finished: bool) {
        let responder = {
            let mut state = self.state();
            assert!(!state.pending.is_empty(), "no seek waiting for an answer");
            state.pending.remove(0)
        };
        responder.respond(finished);
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.state().seeks.clone()
    }
}

impl MediaPlayer for FakePlayer {
    fn play(&mut self) {
        self.state().playing = true;
    }

    fn pause(&mut self) {
        self.state().playing = false;
    }

    fn current_time(&self) -> f64 {
        self.state().time
    }

    fn duration(&self) -> f64 {
        self.state().duration
    }

    fn seek(&mut self, to: f64) -> SeekCompletion {
        let (responder, completion) = SeekCompletion::pair();
        let mut state = self.state();
        state.seeks.push(to);
        state.pending.push(responder);
        completion
    }
}

pub type TestController = PlaybackController<FakePlayer, MemoryStore>;

pub fn video() -> VideoIdentity {
    VideoIdentity::from_location("/media/lessons/scales.mp4")
}

/// Controller over a 90 s video with `marks` stored, playhead at `time`.
pub fn controller(marks: &[f64], time: f64) -> (TestController, FakePlayer, MemoryStore) {
    controller_with_config(marks, time, &Config::default())
}

pub fn controller_with_config(
    marks: &[f64],
    time: f64,
    config: &Config,
) -> (TestController, FakePlayer, MemoryStore) {
    let player = FakePlayer::new(90.0, time);
    let store = MemoryStore::new();
    store.save(&video(), marks);
    let controller = PlaybackController::new(player.clone(), store.clone(), video(), config);
    (controller, player, store)
}

/// Answer the outstanding seek and let the controller apply it.
pub fn settle(controller: &mut TestController, player: &FakePlayer, finished: bool) {
    player.answer(finished);
    assert!(controller.poll_seek().is_some(), "seek did not complete");
}

/// The `loopmark` binary isolated from the user's config and data.
pub fn loopmark(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("loopmark").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(home.path().join("store"));
    cmd
}
