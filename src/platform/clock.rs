//! Frame clock
//!
//! Turns animation-frame timestamps (milliseconds) into frame deltas
//! (seconds). The simulation clamps the delta; the clock only measures it.

/// Tracks the previous frame's timestamp
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call. The first frame (and the first after a
    /// [`reset`](Self::reset)) is zero. Timestamps going backwards give zero.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if now_ms > last => ((now_ms - last) / 1000.0) as f32,
            _ => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }

    /// Forget the previous timestamp, e.g. after the page was hidden
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
