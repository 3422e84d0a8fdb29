//! Pluggable momentum
//!
//! A [`MomentumPolicy`] turns an input impulse into a [`Glide`]: a finite,
//! time-driven sequence of synthetic deltas that keeps the grid moving after
//! the physical input stops. A glide cannot be restarted; a new impulse
//! launches a new one.

use crate::settings::MomentumSettings;
use mosaic_core::glam::DVec2;
use std::convert::Infallible;
use std::time::Duration;

/// Decaying delta stream produced by a momentum policy.
pub trait Glide {
    /// Advance by `dt` and return the delta for this frame, or `None` once
    /// the glide has finished. Keeps returning `None` afterwards.
    fn advance(&mut self, dt: Duration) -> Option<DVec2>;
}

pub trait MomentumPolicy {
    type Glide: Glide;

    /// Start a glide for `impulse`, or `None` if it is too weak to glide.
    fn launch(&self, impulse: DVec2) -> Option<Self::Glide>;
}

/// Tween the velocity from `impulse * impulse_scale` to zero with a
/// quadratic ease-out. Each frame emits the current velocity as a delta.
#[derive(Debug, Clone)]
pub struct TweenMomentum {
    settings: MomentumSettings,
}

impl TweenMomentum {
    pub fn new(settings: MomentumSettings) -> Self {
        Self { settings }
    }
}

impl Default for TweenMomentum {
    fn default() -> Self {
        Self::new(MomentumSettings::default())
    }
}

impl MomentumPolicy for TweenMomentum {
    type Glide = TweenGlide;

    fn launch(&self, impulse: DVec2) -> Option<TweenGlide> {
        let settings = &self.settings;
        if !settings.enabled || settings.duration_ms == 0 {
            return None;
        }
        // Single-axis motion has a zero product and never glides.
        if (impulse.x * impulse.y).abs() <= settings.threshold {
            return None;
        }
        Some(TweenGlide::new(
            impulse * settings.impulse_scale,
            Duration::from_millis(settings.duration_ms),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct TweenGlide {
    start: DVec2,
    elapsed: Duration,
    duration: Duration,
    finished: bool,
}

impl TweenGlide {
    pub fn new(start: DVec2, duration: Duration) -> Self {
        Self {
            start,
            elapsed: Duration::ZERO,
            duration: duration.max(Duration::from_millis(1)),
            finished: false,
        }
    }

    pub fn progress(&self) -> f64 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

impl Glide for TweenGlide {
    fn advance(&mut self, dt: Duration) -> Option<DVec2> {
        if self.finished {
            return None;
        }
        self.elapsed += dt;
        let t = self.progress();
        if t >= 1.0 {
            self.finished = true;
        }
        Some(self.start * (1.0 - ease_out_quad(t)))
    }
}

fn ease_out_quad(t: f64) -> f64 {
    t * (2.0 - t)
}

/// Policy that never glides.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMomentum;

impl MomentumPolicy for NoMomentum {
    type Glide = Infallible;

    fn launch(&self, _impulse: DVec2) -> Option<Infallible> {
        None
    }
}

impl Glide for Infallible {
    fn advance(&mut self, _dt: Duration) -> Option<DVec2> {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_micros(16_666);

    #[test]
    fn test_weak_impulse_does_not_glide() {
        let policy = TweenMomentum::default();
        assert!(policy.launch(DVec2::new(5.0, 5.0)).is_none());
        assert!(policy.launch(DVec2::new(500.0, 0.0)).is_none());
        assert!(policy.launch(DVec2::new(10.0, 6.0)).is_some());
    }

    #[test]
    fn test_glide_decays_to_zero_and_stops() {
        let policy = TweenMomentum::default();
        let mut glide = policy.launch(DVec2::new(40.0, -20.0)).unwrap();

        let first = glide.advance(FRAME).unwrap();
        assert!(first.x > 0.0 && first.x < 20.0);
        assert!(first.y < 0.0 && first.y > -10.0);

        let mut last = first;
        let mut frames = 1;
        while let Some(delta) = glide.advance(FRAME) {
            assert!(delta.x.abs() <= last.x.abs());
            last = delta;
            frames += 1;
        }
        assert_eq!(last, DVec2::ZERO);
        // 500ms at ~60fps
        assert!((30..=31).contains(&frames));
        assert!(glide.advance(FRAME).is_none());
    }

    #[test]
    fn test_disabled_policy_never_launches() {
        let policy = TweenMomentum::new(MomentumSettings {
            enabled: false,
            ..MomentumSettings::default()
        });
        assert!(policy.launch(DVec2::new(100.0, 100.0)).is_none());
        assert!(NoMomentum.launch(DVec2::new(100.0, 100.0)).is_none());
    }
}
