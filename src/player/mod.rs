//! Media player contract.
//!
//! The controller drives an external player through [`MediaPlayer`] and
//! nothing else. Seeking is the only asynchronous operation: the player hands
//! back a [`SeekCompletion`] that resolves to a [`SeekOutcome`] once it has
//! actually moved.

mod simulated;

pub use simulated::SimulatedPlayer;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// Result of a seek as acknowledged by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekOutcome {
    /// False when the seek was superseded or cancelled by the player
    pub finished: bool,
}

impl SeekOutcome {
    pub const FINISHED: SeekOutcome = SeekOutcome { finished: true };
    pub const SUPERSEDED: SeekOutcome = SeekOutcome { finished: false };
}

/// The player-side half of a pending seek.
#[derive(Debug)]
pub struct SeekResponder {
    tx: oneshot::Sender<SeekOutcome>,
}

impl SeekResponder {
    /// Acknowledge the seek. Dropping the responder without calling this
    /// counts as a superseded seek.
    pub fn respond(self, finished: bool) {
        // The controller may already be gone
        let _ = self.tx.send(SeekOutcome { finished });
    }
}

/// Awaitable acknowledgement of a seek request.
#[derive(Debug)]
pub struct SeekCompletion {
    rx: oneshot::Receiver<SeekOutcome>,
}

impl SeekCompletion {
    /// Create a linked responder/completion pair.
    pub fn pair() -> (SeekResponder, SeekCompletion) {
        let (tx, rx) = oneshot::channel();
        (SeekResponder { tx }, SeekCompletion { rx })
    }

    /// A completion that is already resolved.
    pub fn ready(finished: bool) -> SeekCompletion {
        let (responder, completion) = Self::pair();
        responder.respond(finished);
        completion
    }

    /// Non-blocking check. Returns `None` while the player has not answered.
    pub fn try_outcome(&mut self) -> Option<SeekOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(SeekOutcome::SUPERSEDED),
        }
    }
}

impl Future for SeekCompletion {
    type Output = SeekOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(SeekOutcome::SUPERSEDED))
    }
}

/// An external media player.
///
/// Implementations report time in seconds. Values may be garbage (NaN,
/// negative, infinite); the controller sanitises everything it reads.
pub trait MediaPlayer: Send {
    /// Start or resume playback.
    fn play(&mut self);

    /// Pause playback.
    fn pause(&mut self);

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Total media duration in seconds.
    fn duration(&self) -> f64;

    /// Request a move to `to` seconds.
    fn seek(&mut self, to: f64) -> SeekCompletion;
}

impl<P: MediaPlayer + ?Sized> MediaPlayer for Box<P> {
    fn play(&mut self) {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn duration(&self) -> f64 {
        (**self).duration()
    }

    fn seek(&mut self, to: f64) -> SeekCompletion {
        (**self).seek(to)
    }
}
