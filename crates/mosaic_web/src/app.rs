//! Browser wiring: DOM listeners feed the input adapter, the adapter feeds
//! the controller, and an animation-frame pump drains momentum glides.

use crate::dom_viewport::{DomViewport, LoadEvent};
use crate::error::WebError;
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use mosaic_core::glam::DVec2;
use mosaic_core::{ChurnStats, GridController, Manifest};
use mosaic_services::{DeltaMode, FrameClock, InputAdapter, Settings, WheelInput};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys::{Event, PointerEvent, WheelEvent};

struct Shared {
    grid: RefCell<GridController<DomViewport>>,
    input: RefCell<InputAdapter>,
    clock: RefCell<FrameClock>,
    frame: RefCell<Option<AnimationFrame>>,
}

impl Shared {
    fn pan(&self, delta: DVec2) {
        match self.grid.try_borrow_mut() {
            Ok(mut grid) => grid.on_pan_delta(delta.x, delta.y),
            Err(_) => tracing::warn!(?delta, "grid busy, dropping pan delta"),
        }
    }

    fn on_load_event(&self, ticket: mosaic_core::LoadTicket, event: LoadEvent) {
        let Ok(mut grid) = self.grid.try_borrow_mut() else {
            tracing::warn!(?ticket, "grid busy, dropping load event");
            return;
        };
        match event {
            LoadEvent::Loaded => {
                grid.on_tile_loaded(ticket);
            }
            LoadEvent::Failed => grid.on_tile_load_failed(ticket),
        }
    }

    /// Keep requesting frames while a glide is running.
    fn schedule_glide(self: &Rc<Self>) {
        if self.frame.borrow().is_some() || !self.input.borrow().is_gliding() {
            return;
        }
        self.clock.borrow_mut().reset();
        self.request_frame();
    }

    fn request_frame(self: &Rc<Self>) {
        let shared = Rc::clone(self);
        let handle = request_animation_frame(move |timestamp| {
            shared.frame.borrow_mut().take();
            let dt = shared.clock.borrow_mut().tick(timestamp);
            let delta = shared.input.borrow_mut().tick(dt);
            if let Some(delta) = delta {
                shared.pan(delta);
            }
            if shared.input.borrow().is_gliding() {
                shared.request_frame();
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }
}

/// A running grid bound to one container element. Dropping it (or calling
/// [`MosaicApp::teardown`]) detaches every listener and tile.
pub struct MosaicApp {
    shared: Rc<Shared>,
    listeners: Vec<EventListener>,
}

impl MosaicApp {
    pub fn new(container_id: &str, manifest: Manifest, settings: &Settings) -> Result<Self, WebError> {
        settings.validate()?;
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(WebError::NoWindow)?;
        let viewport = DomViewport::from_id(document, container_id)?;
        let grid = GridController::new(viewport, manifest, settings.grid.clone())?;

        let shared = Rc::new(Shared {
            grid: RefCell::new(grid),
            input: RefCell::new(InputAdapter::from_settings(&settings.input)),
            clock: RefCell::new(FrameClock::new()),
            frame: RefCell::new(None),
        });

        let weak: Weak<Shared> = Rc::downgrade(&shared);
        shared
            .grid
            .borrow()
            .viewport()
            .set_load_handler(Rc::new(move |ticket, event| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_load_event(ticket, event);
                }
            }));

        let mut app = Self {
            shared,
            listeners: Vec::new(),
        };
        app.install_listeners()?;
        tracing::info!(container_id, "mosaic grid started");
        Ok(app)
    }

    fn install_listeners(&mut self) -> Result<(), WebError> {
        let container = self.shared.grid.borrow().viewport().container().clone();
        let suppress_click = Rc::clone(self.shared.grid.borrow().viewport().suppress_click());
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let active = EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: false,
        };

        let shared = Rc::clone(&self.shared);
        self.listeners.push(EventListener::new_with_options(
            &container,
            "wheel",
            active,
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<WheelEvent>() else {
                    return;
                };
                event.prevent_default();
                let wheel = WheelInput {
                    delta: DVec2::new(event.delta_x(), event.delta_y()),
                    mode: DeltaMode::from_dom(event.delta_mode()),
                };
                let viewport = shared.grid.borrow().viewport_size();
                let delta = shared.input.borrow_mut().on_wheel(wheel, viewport);
                if let Some(delta) = delta {
                    shared.pan(delta);
                }
                shared.schedule_glide();
            },
        ));

        let shared = Rc::clone(&self.shared);
        let click_guard = Rc::clone(&suppress_click);
        self.listeners.push(EventListener::new_with_options(
            &container,
            "pointerdown",
            active,
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if event.button() != 0 {
                    return;
                }
                click_guard.set(false);
                shared
                    .input
                    .borrow_mut()
                    .on_pointer_down(pointer_position(event), event.time_stamp());
            },
        ));

        // The pointer is captured only once a press turns into a drag; a
        // captured pointer retargets the closing click to the container,
        // which would stop a plain click from reaching the tile.
        let shared = Rc::clone(&self.shared);
        let target = container.clone();
        let click_guard = Rc::clone(&suppress_click);
        self.listeners.push(EventListener::new_with_options(
            &container,
            "pointermove",
            active,
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let (delta, started) = {
                    let mut input = shared.input.borrow_mut();
                    let was_moving = input.drag_has_moved();
                    let delta = input.on_pointer_move(pointer_position(event), event.time_stamp());
                    (delta, !was_moving && input.drag_has_moved())
                };
                if started {
                    click_guard.set(true);
                    if let Err(err) = target.set_pointer_capture(event.pointer_id()) {
                        tracing::warn!(?err, "pointer capture failed");
                    }
                }
                if let Some(delta) = delta {
                    event.prevent_default();
                    shared.pan(delta);
                }
            },
        ));

        let shared = Rc::clone(&self.shared);
        self.listeners.push(EventListener::new(&container, "pointerup", move |event| {
            shared.input.borrow_mut().on_pointer_up(event.time_stamp());
            shared.schedule_glide();
        }));

        let shared = Rc::clone(&self.shared);
        self.listeners.push(EventListener::new(&container, "pointercancel", move |_event| {
            shared.input.borrow_mut().on_pointer_cancel();
        }));

        let shared = Rc::clone(&self.shared);
        self.listeners.push(EventListener::new(&window, "resize", move |_event| {
            match shared.grid.try_borrow_mut() {
                Ok(mut grid) => grid.on_viewport_resize(),
                Err(_) => tracing::warn!("grid busy, skipping resize"),
            }
        }));

        Ok(())
    }

    pub fn stats(&self) -> ChurnStats {
        self.shared.grid.borrow().stats()
    }

    pub fn visible_len(&self) -> usize {
        self.shared.grid.borrow().visible_len()
    }

    pub fn pooled_len(&self) -> usize {
        self.shared.grid.borrow().pooled_len()
    }

    /// Stop input and animation, then detach every tile. Idempotent.
    pub fn teardown(&mut self) {
        if self.listeners.is_empty() && self.shared.frame.borrow().is_none() {
            return;
        }
        self.listeners.clear();
        self.shared.frame.borrow_mut().take();
        self.shared.input.borrow_mut().stop();
        let mut grid = self.shared.grid.borrow_mut();
        grid.viewport().clear_load_handler();
        grid.shutdown();
        tracing::info!(stats = ?grid.stats(), "mosaic grid torn down");
    }
}

impl Drop for MosaicApp {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn pointer_position(event: &PointerEvent) -> DVec2 {
    DVec2::new(event.client_x() as f64, event.client_y() as f64)
}
