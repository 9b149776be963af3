//! Loop countdown.
//!
//! Driven by the same sampler ticks as the controller; it has no clock of
//! its own.

/// What a [`LoopTimer::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum LoopTick {
    /// Inactive or paused: nothing counted
    Idle,
    /// Counted down, not yet expired
    Counting,
    /// Expired and reset: advance to the next segment
    Advance,
}

/// Countdown that fires once per loop period while playing.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopTimer {
    active: bool,
    remaining: f64,
    period: f64,
}

impl LoopTimer {
    /// Inactive timer with the given period (seconds).
    pub fn new(period: f64) -> Self {
        Self {
            active: false,
            remaining: period,
            period,
        }
    }

    /// Activate and restart the countdown from the full period.
    pub fn reset(&mut self) {
        self.active = true;
        self.remaining = self.period;
    }

    /// Stop counting. Remaining time is kept.
    pub fn disable(&mut self) {
        self.active = false;
    }

    /// Count down by `delta` seconds if active and playing.
    pub fn tick(&mut self, delta: f64, is_playing: bool) -> LoopTick {
        if !self.active || !is_playing || !delta.is_finite() || delta < 0.0 {
            return LoopTick::Idle;
        }
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.reset();
            LoopTick::Advance
        } else {
            LoopTick::Counting
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn period(&self) -> f64 {
        self.period
    }
}
