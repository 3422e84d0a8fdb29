//! Input abstraction
//!
//! Normalizes wheel and pointer-drag events into pan deltas for the grid and
//! owns the momentum glide that follows them. Non-finite input is dropped
//! here so it never reaches the controller.

use crate::momentum::{Glide, MomentumPolicy, TweenMomentum};
use crate::settings::InputSettings;
use mosaic_core::glam::DVec2;
use std::time::Duration;

/// Unit of a wheel delta, matching `WheelEvent.deltaMode`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    pub fn from_dom(mode: u32) -> Self {
        match mode {
            1 => DeltaMode::Line,
            2 => DeltaMode::Page,
            _ => DeltaMode::Pixel,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WheelInput {
    pub delta: DVec2,
    pub mode: DeltaMode,
}

impl WheelInput {
    pub fn pixels(dx: f64, dy: f64) -> Self {
        Self {
            delta: DVec2::new(dx, dy),
            mode: DeltaMode::Pixel,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    last: DVec2,
    velocity: DVec2,
    last_move_ms: f64,
    moved: bool,
}

pub struct InputAdapter<P: MomentumPolicy = TweenMomentum> {
    settings: InputSettings,
    policy: P,
    glide: Option<P::Glide>,
    drag: Option<Drag>,
}

impl InputAdapter<TweenMomentum> {
    pub fn from_settings(settings: &InputSettings) -> Self {
        Self::new(settings.clone(), TweenMomentum::new(settings.momentum.clone()))
    }
}

impl<P: MomentumPolicy> InputAdapter<P> {
    pub fn new(settings: InputSettings, policy: P) -> Self {
        Self {
            settings,
            policy,
            glide: None,
            drag: None,
        }
    }

    /// Pan delta for a wheel event. Content moves against the wheel, so the
    /// delta is negated. A strong enough delta replaces any running glide.
    pub fn on_wheel(&mut self, wheel: WheelInput, viewport: DVec2) -> Option<DVec2> {
        let scale = match wheel.mode {
            DeltaMode::Pixel => DVec2::ONE,
            DeltaMode::Line => DVec2::splat(self.settings.line_height_px),
            DeltaMode::Page => viewport,
        };
        let delta = sanitize(-(wheel.delta * scale), self.settings.max_delta_px)?;
        self.launch(delta);
        Some(delta)
    }

    /// Begin a drag at `time_ms`. Grabbing the grid stops any glide.
    pub fn on_pointer_down(&mut self, position: DVec2, time_ms: f64) {
        if !position.is_finite() {
            tracing::warn!(?position, "ignoring non-finite pointer position");
            return;
        }
        self.glide = None;
        self.drag = Some(Drag {
            last: position,
            velocity: DVec2::ZERO,
            last_move_ms: time_ms,
            moved: false,
        });
    }

    /// Pan delta for a pointer move while dragging. Content follows the pointer.
    pub fn on_pointer_move(&mut self, position: DVec2, time_ms: f64) -> Option<DVec2> {
        let max = self.settings.max_delta_px;
        let drag = self.drag.as_mut()?;
        let delta = sanitize(position - drag.last, max)?;
        drag.last = position;
        if delta != DVec2::ZERO {
            drag.velocity = delta;
            drag.last_move_ms = time_ms;
            drag.moved = true;
        }
        Some(delta)
    }

    /// End a drag at `time_ms`, gliding on with the last drag delta unless
    /// the pointer has been still for longer than `release_idle_ms`.
    pub fn on_pointer_up(&mut self, time_ms: f64) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let idle_ms = time_ms - drag.last_move_ms;
        if idle_ms.is_nan() || idle_ms > self.settings.release_idle_ms {
            tracing::trace!(idle_ms, "drag released at rest");
            return;
        }
        self.launch(drag.velocity);
    }

    /// Abandon a drag without momentum.
    pub fn on_pointer_cancel(&mut self) {
        self.drag = None;
    }

    /// Next glide delta after `dt`, or `None` when no glide is running.
    pub fn tick(&mut self, dt: Duration) -> Option<DVec2> {
        let glide = self.glide.as_mut()?;
        match glide.advance(dt) {
            Some(delta) => sanitize(delta, self.settings.max_delta_px),
            None => {
                self.glide = None;
                None
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// True once the current drag has actually moved the grid. A press that
    /// never moves is a click, not a drag.
    pub fn drag_has_moved(&self) -> bool {
        self.drag.as_ref().is_some_and(|drag| drag.moved)
    }

    pub fn is_gliding(&self) -> bool {
        self.glide.is_some()
    }

    pub fn stop(&mut self) {
        self.glide = None;
        self.drag = None;
    }

    fn launch(&mut self, impulse: DVec2) {
        if let Some(glide) = self.policy.launch(impulse) {
            tracing::trace!(?impulse, "momentum glide started");
            self.glide = Some(glide);
        }
    }
}

/// Reject non-finite deltas and clamp each axis to `±max`.
fn sanitize(delta: DVec2, max: f64) -> Option<DVec2> {
    if !delta.is_finite() {
        tracing::warn!(?delta, "dropping non-finite input delta");
        return None;
    }
    Some(delta.clamp(DVec2::splat(-max), DVec2::splat(max)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::momentum::NoMomentum;

    const FRAME: Duration = Duration::from_micros(16_666);
    const VIEWPORT: DVec2 = DVec2::new(800.0, 600.0);

    fn adapter() -> InputAdapter {
        InputAdapter::from_settings(&InputSettings::default())
    }

    #[test]
    fn test_wheel_is_negated() {
        let mut input = adapter();
        let delta = input.on_wheel(WheelInput::pixels(3.0, -4.0), VIEWPORT).unwrap();
        assert_eq!(delta, DVec2::new(-3.0, 4.0));
        assert!(!input.is_gliding());
    }

    #[test]
    fn test_wheel_delta_modes() {
        let mut input = InputAdapter::new(InputSettings::default(), NoMomentum);
        let line = WheelInput {
            delta: DVec2::new(0.0, 2.0),
            mode: DeltaMode::from_dom(1),
        };
        assert_eq!(input.on_wheel(line, VIEWPORT), Some(DVec2::new(0.0, -32.0)));

        let page = WheelInput {
            delta: DVec2::new(1.0, 0.0),
            mode: DeltaMode::from_dom(2),
        };
        assert_eq!(input.on_wheel(page, VIEWPORT), Some(DVec2::new(-800.0, 0.0)));
        assert_eq!(DeltaMode::from_dom(7), DeltaMode::Pixel);
    }

    #[test]
    fn test_non_finite_wheel_rejected() {
        let mut input = adapter();
        assert_eq!(input.on_wheel(WheelInput::pixels(f64::NAN, 1.0), VIEWPORT), None);
        assert_eq!(input.on_wheel(WheelInput::pixels(1.0, f64::INFINITY), VIEWPORT), None);
    }

    #[test]
    fn test_huge_delta_clamped() {
        let mut input = adapter();
        let delta = input.on_wheel(WheelInput::pixels(-1.0e9, 0.0), VIEWPORT).unwrap();
        assert_eq!(delta, DVec2::new(4_000.0, 0.0));
    }

    #[test]
    fn test_strong_diagonal_wheel_glides_then_stops() {
        let mut input = adapter();
        input.on_wheel(WheelInput::pixels(-20.0, -20.0), VIEWPORT);
        assert!(input.is_gliding());

        let first = input.tick(FRAME).unwrap();
        assert!(first.x > 0.0 && first.y > 0.0);

        let mut frames = 1;
        while input.tick(FRAME).is_some() {
            frames += 1;
        }
        assert!(frames >= 30);
        assert!(!input.is_gliding());
        assert_eq!(input.tick(FRAME), None);
    }

    #[test]
    fn test_drag_follows_pointer_and_glides_on_release() {
        let mut input = adapter();
        assert_eq!(input.on_pointer_move(DVec2::new(5.0, 5.0), 0.0), None);

        input.on_pointer_down(DVec2::new(100.0, 100.0), 0.0);
        assert!(input.is_dragging());
        assert_eq!(
            input.on_pointer_move(DVec2::new(110.0, 120.0), 16.0),
            Some(DVec2::new(10.0, 20.0))
        );
        assert_eq!(
            input.on_pointer_move(DVec2::new(130.0, 150.0), 32.0),
            Some(DVec2::new(20.0, 30.0))
        );
        assert!(!input.is_gliding());

        input.on_pointer_up(48.0);
        assert!(!input.is_dragging());
        assert!(input.is_gliding());
    }

    #[test]
    fn test_press_without_motion_is_not_a_drag() {
        let mut input = adapter();
        input.on_pointer_down(DVec2::new(50.0, 50.0), 0.0);
        assert!(!input.drag_has_moved());
        input.on_pointer_move(DVec2::new(50.0, 50.0), 8.0);
        assert!(!input.drag_has_moved());

        input.on_pointer_move(DVec2::new(51.0, 50.0), 16.0);
        assert!(input.drag_has_moved());

        input.on_pointer_up(20.0);
        assert!(!input.drag_has_moved());
    }

    #[test]
    fn test_drag_held_still_before_release_does_not_glide() {
        let mut input = adapter();
        input.on_pointer_down(DVec2::new(100.0, 100.0), 0.0);
        input.on_pointer_move(DVec2::new(130.0, 140.0), 16.0);
        // Same position again: no motion, so the last move time stays put.
        assert_eq!(input.on_pointer_move(DVec2::new(130.0, 140.0), 400.0), Some(DVec2::ZERO));

        input.on_pointer_up(600.0);
        assert!(!input.is_dragging());
        assert!(!input.is_gliding());
    }

    #[test]
    fn test_pointer_down_stops_glide() {
        let mut input = adapter();
        input.on_wheel(WheelInput::pixels(-30.0, -30.0), VIEWPORT);
        assert!(input.is_gliding());

        input.on_pointer_down(DVec2::ZERO, 0.0);
        assert!(!input.is_gliding());

        input.on_pointer_cancel();
        assert!(!input.is_dragging());
        assert!(!input.is_gliding());
    }
}
