//! Frame clock
//!
//! Converts animation-frame timestamps into per-frame steps for glides.

use std::time::Duration;

/// Nominal frame step (60 Hz = 16.666ms) used for the first frame.
pub const FRAME_DURATION: Duration = Duration::from_micros(16_666);

/// Longest step handed out; longer gaps (background tabs) are clamped.
pub const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

pub struct FrameClock {
    last_ms: Option<f64>,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_ms: None,
            frames: 0,
        }
    }

    /// Step since the previous timestamp. Non-monotonic or non-finite
    /// timestamps yield a zero step.
    pub fn tick(&mut self, now_ms: f64) -> Duration {
        self.frames += 1;
        if !now_ms.is_finite() {
            return Duration::ZERO;
        }
        match self.last_ms.replace(now_ms) {
            None => FRAME_DURATION,
            Some(last) if now_ms > last => {
                Duration::from_secs_f64((now_ms - last) / 1000.0).min(MAX_FRAME_STEP)
            }
            Some(_) => Duration::ZERO,
        }
    }

    /// Forget the last timestamp so the next tick is a nominal frame.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
