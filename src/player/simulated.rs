//! A wall-clock driven stand-in for a real media player.
//!
//! Used by `loopmark play` and by session tests. Position advances with real
//! time while playing; seeks move the playhead immediately and are
//! acknowledged after a configurable latency.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::{MediaPlayer, SeekCompletion};

#[derive(Debug)]
struct Clock {
    /// Position at `anchor`
    base: f64,
    /// Wall time the current playing stretch started, if playing
    anchor: Option<Instant>,
}

/// Simulated player with a virtual timeline of fixed duration.
///
/// Cloning shares the same clock, so a test can hold one handle while the
/// session owns another.
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    duration: f64,
    seek_latency: Duration,
    clock: Arc<Mutex<Clock>>,
}

impl SimulatedPlayer {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            seek_latency: Duration::ZERO,
            clock: Arc::new(Mutex::new(Clock {
                base: 0.0,
                anchor: None,
            })),
        }
    }

    /// Acknowledge seeks only after `latency` has elapsed.
    pub fn with_seek_latency(mut self, latency: Duration) -> Self {
        self.seek_latency = latency;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.lock().anchor.is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Clock> {
        // A poisoned clock only means a panicking test thread; the data is plain f64s
        self.clock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn position(&self, clock: &Clock) -> f64 {
        let elapsed = clock
            .anchor
            .map(|start| start.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        (clock.base + elapsed).min(self.duration)
    }
}

impl MediaPlayer for SimulatedPlayer {
    fn play(&mut self) {
        let mut clock = self.lock();
        if clock.anchor.is_none() {
            clock.anchor = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        let mut clock = self.lock();
        let position = self.position(&clock);
        clock.base = position;
        clock.anchor = None;
    }

    fn current_time(&self) -> f64 {
        let clock = self.lock();
        self.position(&clock)
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn seek(&mut self, to: f64) -> SeekCompletion {
        {
            let mut clock = self.lock();
            clock.base = to.clamp(0.0, self.duration);
            if clock.anchor.is_some() {
                clock.anchor = Some(Instant::now());
            }
        }

        if self.seek_latency.is_zero() {
            return SeekCompletion::ready(true);
        }

        let (responder, completion) = SeekCompletion::pair();
        let latency = self.seek_latency;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(latency).await;
                    responder.respond(true);
                });
            }
            Err(_) => responder.respond(true),
        }
        completion
    }
}
