use std::time::{Duration, Instant};

/// Debounced zoom threshold for the all-plots layer.
#[derive(Debug, Clone)]
pub struct ZoomGate {
    min_zoom: f64,
    window: Duration,
    last_change: Option<Instant>,
}

impl ZoomGate {
    pub fn new(min_zoom: f64, window: Duration) -> Self {
        Self {
            min_zoom,
            window,
            last_change: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn should_attach(&self, zoom: f64) -> bool {
        zoom >= self.min_zoom
    }

    pub fn record(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    /// A zoom change is recorded and has not settled yet.
    pub fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    /// Time left before a recorded change settles, `None` when idle.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.last_change
            .map(|at| self.window.saturating_sub(now.saturating_duration_since(at)))
    }

    /// Consumes the recorded change once the window has passed without a
    /// newer one.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.remaining(now) {
            Some(left) if left.is_zero() => {
                self.last_change = None;
                true
            }
            _ => false,
        }
    }
}
