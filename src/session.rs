//! One player session as a serial actor.
//!
//! [`PlayerSession`] owns the controller and multiplexes three event sources
//! through a single `select!` loop: user commands from [`SessionHandle`]s,
//! sampler ticks, and the acknowledgement of the in-flight seek. Only one of
//! them runs at a time, which is what keeps the controller free of locks.
//!
//! Opening a session restores the saved position and stamps last-played;
//! closing it saves the position.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::config::Config;
use crate::identity::VideoIdentity;
use crate::playback::{ControllerSnapshot, PlaybackController};
use crate::player::{MediaPlayer, SeekCompletion, SeekOutcome};
use crate::store::{MarkStore, PositionStore};

/// Inbox depth; user input is slow, this only absorbs bursts.
const COMMAND_BUFFER: usize = 64;

/// A user-facing operation, delivered to the session actor.
#[derive(Debug)]
pub enum Command {
    TogglePlayPause,
    SeekTo(f64),
    SeekForward,
    SeekBackward,
    CycleSeekStep,
    ToggleMark,
    ClearMarks,
    ToggleLoop,
    NextSegment,
    PreviousSegment,
    JumpToNextMark,
    JumpToPreviousMark,
    FinetuneMarkLeft,
    FinetuneMarkRight,
    StartTimer,
    /// Reply with the current state
    Snapshot(oneshot::Sender<ControllerSnapshot>),
    /// Save position and stop
    Close,
}

/// The session is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("player session has closed")]
pub struct SessionClosed;

/// Cheap, cloneable sender of commands to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub async fn send(&self, command: Command) -> Result<(), SessionClosed> {
        self.tx.send(command).await.map_err(|_| SessionClosed)
    }

    /// Ask the session for its current state.
    pub async fn snapshot(&self) -> Result<ControllerSnapshot, SessionClosed> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx)).await?;
        rx.await.map_err(|_| SessionClosed)
    }

    pub async fn close(&self) -> Result<(), SessionClosed> {
        self.send(Command::Close).await
    }
}

/// The actor for one video being watched.
pub struct PlayerSession<P, S> {
    controller: PlaybackController<P, S>,
    inbox: mpsc::Receiver<Command>,
    tick_interval: Duration,
    finetune_step: f64,
}

impl<P, S> PlayerSession<P, S>
where
    P: MediaPlayer + 'static,
    S: MarkStore + PositionStore + 'static,
{
    /// Build the controller and bootstrap from persisted state.
    pub fn open(player: P, store: S, video: VideoIdentity, config: &Config) -> (Self, SessionHandle) {
        let mut controller = PlaybackController::new(player, store, video, config);

        let video = controller.video().clone();
        if let Some(position) = controller.store().position(&video) {
            if position > 0.0 && position < controller.duration() {
                debug!(video = %video, position, "restoring position");
                controller.seek_to(position);
            }
        }
        controller.store().update_last_played(&video);

        let (tx, inbox) = mpsc::channel(COMMAND_BUFFER);
        let session = Self {
            controller,
            inbox,
            tick_interval: Duration::from_millis(config.session.tick_interval_ms.max(1)),
            finetune_step: config.marks.finetune_step,
        };
        (session, SessionHandle { tx })
    }

    /// Open and run on the current tokio runtime.
    pub fn spawn(
        player: P,
        store: S,
        video: VideoIdentity,
        config: &Config,
    ) -> (SessionHandle, JoinHandle<ControllerSnapshot>) {
        let (session, handle) = Self::open(player, store, video, config);
        (handle, tokio::spawn(session.run()))
    }

    /// Process events until closed. Returns the final state.
    pub async fn run(self) -> ControllerSnapshot {
        let PlayerSession {
            mut controller,
            mut inbox,
            tick_interval,
            finetune_step,
        } = self;

        let mut ticker = tokio::time::interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_tick = Instant::now();
        let mut pending: Option<SeekCompletion> = None;

        loop {
            if pending.is_none() {
                pending = controller.take_seek_completion();
            }

            // Seek acknowledgements first, so commands never observe a
            // seek the player has already finished
            tokio::select! {
                biased;

                outcome = wait_for_seek(&mut pending) => {
                    pending = None;
                    controller.complete_seek(outcome);
                }
                command = inbox.recv() => match command {
                    None | Some(Command::Close) => break,
                    Some(command) => dispatch(&mut controller, command, finetune_step),
                },
                _ = ticker.tick() => {
                    let now = Instant::now();
                    let delta = now.duration_since(last_tick).as_secs_f64();
                    last_tick = now;
                    let sample = controller.player().current_time();
                    controller.on_tick(sample, delta);
                }
            }
        }

        let video = controller.video().clone();
        controller
            .store()
            .save_position(&video, controller.current_time());
        debug!(video = %video, position = controller.current_time(), "session closed");
        controller.snapshot()
    }
}

/// Resolve with the seek outcome, or never if no seek is pending.
async fn wait_for_seek(pending: &mut Option<SeekCompletion>) -> SeekOutcome {
    match pending {
        Some(completion) => completion.await,
        None => std::future::pending().await,
    }
}

fn dispatch<P: MediaPlayer, S: MarkStore>(
    controller: &mut PlaybackController<P, S>,
    command: Command,
    finetune_step: f64,
) {
    match command {
        Command::TogglePlayPause => {
            controller.toggle_play_pause();
        }
        Command::SeekTo(time) => {
            controller.seek_to(time);
        }
        Command::SeekForward => {
            controller.seek_forward();
        }
        Command::SeekBackward => {
            controller.seek_backward();
        }
        Command::CycleSeekStep => {
            controller.cycle_seek_step();
        }
        Command::ToggleMark => {
            controller.toggle_mark();
        }
        Command::ClearMarks => {
            controller.clear_marks();
        }
        Command::ToggleLoop => {
            controller.toggle_loop();
        }
        Command::NextSegment => {
            controller.next_segment();
        }
        Command::PreviousSegment => {
            controller.previous_segment();
        }
        Command::JumpToNextMark => {
            controller.jump_to_next_mark();
        }
        Command::JumpToPreviousMark => {
            controller.jump_to_previous_mark();
        }
        Command::FinetuneMarkLeft => {
            controller.finetune_mark_left(finetune_step);
        }
        Command::FinetuneMarkRight => {
            controller.finetune_mark_right(finetune_step);
        }
        Command::StartTimer => controller.start_timer(),
        Command::Snapshot(reply) => {
            // The asker may have given up
            let _ = reply.send(controller.snapshot());
        }
        Command::Close => {}
    }
}
