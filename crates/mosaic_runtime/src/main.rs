//! Mosaic Runtime
//!
//! Drives the grid against the in-memory host with a scripted session of
//! wheel scrolls, drags, and resizes, then reports pool churn and recompute
//! timing. Loads complete one frame after they start.
//!
//! Usage: `mosaic [manifest.json] [settings.json]`

use anyhow::{Context, Result};
use mosaic_core::glam::DVec2;
use mosaic_core::headless::HeadlessViewport;
use mosaic_core::{GridController, LoadTicket};
use mosaic_services::{DeltaMode, FrameClock, InputAdapter, Settings, WheelInput};
use tracing_subscriber::EnvFilter;

const DEFAULT_MANIFEST: &str = "demos/gallery.json";
const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Copy)]
enum Step {
    Wheel(WheelInput),
    DragStart(DVec2),
    DragTo(DVec2),
    DragEnd,
    Resize(f64, f64),
    Idle,
}

fn session() -> Vec<Step> {
    let mut steps = Vec::new();
    // Gentle vertical scroll: single-axis, no glide.
    steps.extend(std::iter::repeat(Step::Wheel(WheelInput::pixels(0.0, 40.0))).take(30));
    steps.extend(std::iter::repeat(Step::Idle).take(10));
    // Diagonal fling in line mode, long enough to glide.
    steps.push(Step::Wheel(WheelInput {
        delta: DVec2::new(-6.0, -6.0),
        mode: DeltaMode::Line,
    }));
    steps.extend(std::iter::repeat(Step::Idle).take(40));
    // Drag up and to the left, release mid-motion.
    steps.push(Step::DragStart(DVec2::new(640.0, 360.0)));
    for i in 1..=20 {
        let t = i as f64;
        steps.push(Step::DragTo(DVec2::new(640.0 - 25.0 * t, 360.0 - 15.0 * t)));
    }
    steps.push(Step::DragEnd);
    steps.extend(std::iter::repeat(Step::Idle).take(40));
    steps.push(Step::Resize(800.0, 600.0));
    steps.extend(std::iter::repeat(Step::Wheel(WheelInput::pixels(120.0, 0.0))).take(20));
    steps.push(Step::Resize(1920.0, 1080.0));
    steps.extend(std::iter::repeat(Step::Idle).take(5));
    steps
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Mosaic v{}", mosaic_core::VERSION);

    let mut args = std::env::args().skip(1);
    let manifest_path = args.next().unwrap_or_else(|| DEFAULT_MANIFEST.to_owned());
    let settings = match args.next() {
        Some(path) => {
            Settings::load(&path).with_context(|| format!("loading settings from {path}"))?
        }
        None => Settings::default(),
    };
    let manifest = mosaic_asset::load_manifest(&manifest_path)
        .with_context(|| format!("loading manifest from {manifest_path}"))?;

    let viewport = HeadlessViewport::new(1280.0, 720.0);
    let mut grid = GridController::new(viewport, manifest, settings.grid.clone())?;
    let mut input = InputAdapter::from_settings(&settings.input);
    let mut clock = FrameClock::new();

    let mut now_ms = 0.0;
    let mut in_flight: Vec<LoadTicket> = Vec::new();
    let (mut revealed, mut stale) = (0u64, 0u64);

    for step in session() {
        let delta = match step {
            Step::Wheel(wheel) => input.on_wheel(wheel, grid.viewport_size()),
            Step::DragStart(at) => {
                input.on_pointer_down(at, now_ms);
                None
            }
            Step::DragTo(at) => input.on_pointer_move(at, now_ms),
            Step::DragEnd => {
                input.on_pointer_up(now_ms);
                None
            }
            Step::Resize(width, height) => {
                grid.viewport_mut().set_size(width, height);
                grid.on_viewport_resize();
                tracing::info!(width, height, span = ?grid.span(), "viewport resized");
                None
            }
            Step::Idle => None,
        };
        if let Some(delta) = delta {
            grid.on_pan_delta(delta.x, delta.y);
        }

        now_ms += FRAME_MS;
        let dt = clock.tick(now_ms);
        if let Some(glide) = input.tick(dt) {
            grid.on_pan_delta(glide.x, glide.y);
        }

        for ticket in in_flight.drain(..) {
            if grid.on_tile_loaded(ticket) {
                revealed += 1;
            } else {
                stale += 1;
            }
        }
        in_flight.extend(
            grid.visible_tiles()
                .filter_map(|(_, tile)| tile.element().pending_ticket()),
        );
    }

    let stats = grid.stats();
    let (avg_ms, max_ms) = grid.recompute_time_ms();
    tracing::info!(
        frames = clock.frames(),
        offset = ?grid.offset(),
        visible = grid.visible_len(),
        pooled = grid.pooled_len(),
        constructed = grid.constructed(),
        peak_visible = grid.peak_visible(),
        "session finished"
    );
    tracing::info!(?stats, revealed, stale, "tile churn");
    tracing::info!("recompute avg {avg_ms:.3} ms, max {max_ms:.3} ms");

    grid.shutdown();
    Ok(())
}
