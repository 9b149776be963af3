//! Seek serialisation.
//!
//! At most one seek is in flight against the media player. A request made
//! while another is outstanding is rejected rather than queued, so nothing
//! moves the playhead later without the user asking again.

use tracing::debug;

use crate::player::{MediaPlayer, SeekCompletion, SeekOutcome};

/// Why a seek was not issued.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SeekError {
    #[error("a seek to {target:.3}s is already in flight")]
    InFlight { target: f64 },
}

/// A seek whose acknowledgement has arrived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedSeek {
    /// Clamped target the seek was issued for
    pub target: f64,
    /// Whether the player actually got there
    pub finished: bool,
    /// Whether playback should restart now
    pub resume: bool,
}

#[derive(Debug)]
struct InFlight {
    target: f64,
    resume: bool,
    /// `None` once handed to an external driver via `take_completion`
    completion: Option<SeekCompletion>,
}

/// Tracks the single outstanding seek.
#[derive(Debug, Default)]
pub struct SeekCoordinator {
    in_flight: Option<InFlight>,
}

impl SeekCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Target of the outstanding seek.
    pub fn target(&self) -> Option<f64> {
        self.in_flight.as_ref().map(|s| s.target)
    }

    /// Issue a seek to `target` (already clamped by the caller).
    ///
    /// `resume` is remembered and reported back on completion.
    pub fn begin<P: MediaPlayer + ?Sized>(
        &mut self,
        player: &mut P,
        target: f64,
        resume: bool,
    ) -> Result<(), SeekError> {
        if let Some(current) = &self.in_flight {
            return Err(SeekError::InFlight {
                target: current.target,
            });
        }

        debug!(to = target, resume, "seek issued");
        let completion = player.seek(target);
        self.in_flight = Some(InFlight {
            target,
            resume,
            completion: Some(completion),
        });
        Ok(())
    }

    /// Hand the completion future to whoever will await it.
    ///
    /// The seek stays in progress until [`SeekCoordinator::finish`] is called.
    pub fn take_completion(&mut self) -> Option<SeekCompletion> {
        self.in_flight.as_mut().and_then(|s| s.completion.take())
    }

    /// Non-blocking: finish the seek if the player has already answered.
    pub fn poll(&mut self) -> Option<CompletedSeek> {
        let outcome = self
            .in_flight
            .as_mut()
            .and_then(|s| s.completion.as_mut())
            .and_then(|c| c.try_outcome())?;
        self.finish(outcome)
    }

    /// Clear the in-flight seek with the player's answer.
    pub fn finish(&mut self, outcome: SeekOutcome) -> Option<CompletedSeek> {
        let seek = self.in_flight.take()?;
        debug!(to = seek.target, finished = outcome.finished, "seek completed");
        Some(CompletedSeek {
            target: seek.target,
            finished: outcome.finished,
            resume: seek.resume,
        })
    }
}
