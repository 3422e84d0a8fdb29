//! Mosaic Metrics - recompute timing for the grid controller
//!
//! Provides zero-cost abstractions for timing collection that completely
//! vanish in production builds via feature flags.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable timing collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use mosaic_metrics::RecomputeTimer;
//!
//! let mut timer = RecomputeTimer::new(120); // Track last 120 recomputes
//! timer.begin();
//! // ... walk the visible rectangle ...
//! timer.end();
//! println!("avg: {:.3}ms", timer.average_ms());
//! ```
//!
//! Without the `metrics` feature the timer is a unit struct whose methods
//! compile to nothing.

#[cfg(feature = "metrics")]
mod recompute_timer;
#[cfg(feature = "metrics")]
mod ring_buffer;

#[cfg(feature = "metrics")]
pub use recompute_timer::RecomputeTimer;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct RecomputeTimer;

#[cfg(not(feature = "metrics"))]
impl RecomputeTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn samples(&self) -> usize { 0 }
    pub fn average_ms(&self) -> f64 { 0.0 }
    pub fn max_ms(&self) -> f64 { 0.0 }
}
