//! Practice-session stopwatch, independent of loop mode.

/// Elapsed-time counter advanced by sampler ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTimer {
    elapsed: f64,
    running: bool,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the counter and start running.
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self, delta: f64) {
        if self.running && delta.is_finite() && delta > 0.0 {
            self.elapsed += delta;
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
