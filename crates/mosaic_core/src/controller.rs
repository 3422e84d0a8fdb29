//! Grid controller - the virtualization core
//!
//! Owns the pan offset and maps it to a bounded set of attached tiles. Every
//! pan delta or resize re-walks the whole visible rectangle; the cost is
//! bounded by viewport size, never by how far the user has panned.
//!
//! # Reconciliation
//!
//! Each recompute consumes the previous visible set completely:
//! 1. cells still visible keep their tile (carried),
//! 2. tiles whose cell left the viewport are detached and pooled,
//! 3. newly visible cells take a tile from the pool, constructing one only
//!    when the pool is empty.
//!
//! Releasing before acquiring means the arena never grows past the largest
//! visible set seen so far.

use crate::asset::{AssetDescriptor, Manifest};
use crate::cell::{CellKey, CellSpan};
use crate::error::GridError;
use crate::host::{LoadTicket, Viewport};
use crate::layout::GridLayout;
use crate::pool::{Acquired, TilePool};
use crate::tile::{LoadOutcome, Tile, TileId};
use glam::DVec2;
use mosaic_metrics::RecomputeTimer;
use std::collections::HashMap;
use std::rc::Rc;

/// Running totals of tile churn since initialization.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ChurnStats {
    pub recomputes: u64,
    pub constructed: u64,
    pub recycled: u64,
    pub carried: u64,
    pub released: u64,
    pub stale_loads: u64,
    pub failed_loads: u64,
    pub rejected_deltas: u64,
}

pub struct GridController<V: Viewport> {
    viewport: V,
    assets: Vec<Rc<AssetDescriptor>>,
    layout: GridLayout,
    offset: DVec2,
    viewport_size: DVec2,
    span: CellSpan,
    visible: HashMap<CellKey, TileId>,
    pool: TilePool<V::Element>,
    /// Visible cells of the current walk, reused across recomputes.
    scratch: Vec<(CellKey, DVec2)>,
    peak_visible: usize,
    stats: ChurnStats,
    timer: RecomputeTimer,
}

impl<V: Viewport> GridController<V> {
    /// Bind to `viewport` and render the initial visible set.
    pub fn new(viewport: V, manifest: Manifest, layout: GridLayout) -> Result<Self, GridError> {
        layout.validate()?;
        if manifest.is_empty() {
            return Err(GridError::EmptyManifest);
        }

        let assets: Vec<_> = manifest.into_assets().into_iter().map(Rc::new).collect();
        tracing::info!(
            assets = assets.len(),
            tile_width = layout.tile_width,
            tile_height = layout.tile_height,
            fixed_cols = layout.fixed_cols,
            "grid initialized"
        );

        let mut grid = Self {
            viewport,
            assets,
            layout,
            offset: DVec2::ZERO,
            viewport_size: DVec2::ZERO,
            span: CellSpan::default(),
            visible: HashMap::new(),
            pool: TilePool::new(),
            scratch: Vec::new(),
            peak_visible: 0,
            stats: ChurnStats::default(),
            timer: RecomputeTimer::default(),
        };
        grid.on_viewport_resize();
        Ok(grid)
    }

    /// Accumulate a pan delta and recompute. Deltas that are non-finite, or
    /// that would overflow the offset, are dropped.
    pub fn on_pan_delta(&mut self, dx: f64, dy: f64) {
        let offset = self.offset + DVec2::new(dx, dy);
        if !offset.is_finite() {
            tracing::warn!(dx, dy, "ignoring pan delta with non-finite result");
            self.stats.rejected_deltas += 1;
            return;
        }
        self.offset = offset;
        self.recompute();
    }

    /// Re-read the viewport size, resize the walk span and recompute.
    pub fn on_viewport_resize(&mut self) {
        let size = self.viewport.size();
        let sanitize = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        self.viewport_size = DVec2::new(sanitize(size.x), sanitize(size.y));
        self.span = self.layout.span_for(self.viewport_size);
        tracing::debug!(
            width = self.viewport_size.x,
            height = self.viewport_size.y,
            cols = self.span.cols,
            rows = self.span.rows,
            "viewport resized"
        );
        self.recompute();
    }

    /// Deliver a finished load. Returns `true` if the tile was revealed.
    pub fn on_tile_loaded(&mut self, ticket: LoadTicket) -> bool {
        let outcome = match self.pool.get_mut(ticket.tile) {
            Ok(tile) => tile.complete_load(ticket),
            Err(_) => LoadOutcome::Stale,
        };
        match outcome {
            LoadOutcome::Revealed => true,
            LoadOutcome::Stale => {
                tracing::trace!(tile = ticket.tile.index(), generation = ticket.generation, "stale load ignored");
                self.stats.stale_loads += 1;
                false
            }
        }
    }

    /// Note a failed load. The tile stays hidden; no retry.
    pub fn on_tile_load_failed(&mut self, ticket: LoadTicket) {
        match self.pool.get(ticket.tile) {
            Ok(tile) if tile.is_current(ticket) => {
                let source = tile.asset().map(|asset| asset.source_url.as_str()).unwrap_or("");
                tracing::warn!(tile = ticket.tile.index(), source, "asset failed to load");
                self.stats.failed_loads += 1;
            }
            _ => {
                tracing::trace!(tile = ticket.tile.index(), "stale load failure ignored");
                self.stats.stale_loads += 1;
            }
        }
    }

    /// Detach every visible tile into the pool. The grid renders nothing
    /// until the next delta or resize.
    pub fn shutdown(&mut self) {
        let released = self.visible.len();
        for (_, id) in self.visible.drain() {
            if let Err(err) = self.pool.release(id) {
                tracing::error!(%err, "tile bookkeeping out of sync during shutdown");
            }
        }
        self.stats.released += released as u64;
        tracing::info!(released, constructed = self.pool.len_total(), "grid shut down");
    }

    fn recompute(&mut self) {
        self.timer.begin();

        let base = self.layout.base_cell(self.offset);
        let phase = self.layout.phase(self.offset);

        self.scratch.clear();
        for row in -1..self.span.rows as i64 {
            for col in -1..self.span.cols as i64 {
                let position = self.layout.screen_position(col, row, phase);
                if !self.layout.intersects_viewport(position, self.viewport_size) {
                    continue;
                }
                // The base saturates for offsets past i64 cells; wrapping keeps
                // the walk's keys distinct there.
                let key = CellKey::new(base.col.wrapping_add(col), base.row.wrapping_add(row));
                self.scratch.push((key, position));
            }
        }

        let mut previous = std::mem::take(&mut self.visible);
        let mut next = HashMap::with_capacity(self.scratch.len());

        // Carry tiles whose cell is still visible.
        for &(key, position) in &self.scratch {
            if let Some(id) = previous.remove(&key) {
                let tile = &mut self.pool[id];
                tile.reposition(position);
                tile.attach();
                next.insert(key, id);
                self.stats.carried += 1;
            }
        }

        // Everything left in the previous set went out of view.
        let released = previous.len();
        for (key, id) in previous.drain() {
            tracing::trace!(col = key.col, row = key.row, tile = id.index(), "tile released");
            if let Err(err) = self.pool.release(id) {
                tracing::error!(%err, "tile bookkeeping out of sync");
            }
        }
        self.stats.released += released as u64;

        // Fill newly visible cells from the pool.
        for &(key, position) in &self.scratch {
            if next.contains_key(&key) {
                continue;
            }
            let index = key.asset_index(self.layout.fixed_cols, self.assets.len());
            let asset = Rc::clone(&self.assets[index]);
            let viewport = &mut self.viewport;
            let (id, how) = self.pool.acquire(asset, || viewport.create_element());
            match how {
                Acquired::Constructed => self.stats.constructed += 1,
                Acquired::Recycled => self.stats.recycled += 1,
            }
            let tile = &mut self.pool[id];
            tile.reposition(position);
            tile.attach();
            let duplicate = next.insert(key, id);
            debug_assert!(duplicate.is_none(), "cell {key:?} visited twice");
        }

        self.visible = next;
        self.peak_visible = self.peak_visible.max(self.visible.len());
        self.stats.recomputes += 1;
        self.timer.end();

        tracing::trace!(
            offset_x = self.offset.x,
            offset_y = self.offset.y,
            visible = self.visible.len(),
            pooled = self.pool.pooled_len(),
            "visible set recomputed"
        );
    }

    pub fn offset(&self) -> DVec2 {
        self.offset
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn span(&self) -> CellSpan {
        self.span
    }

    /// Size read on the last resize.
    pub fn viewport_size(&self) -> DVec2 {
        self.viewport_size
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Mutable host access. Size changes take effect on `on_viewport_resize`.
    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Asset a cell maps to, visible or not.
    pub fn asset_for(&self, key: CellKey) -> &AssetDescriptor {
        &self.assets[key.asset_index(self.layout.fixed_cols, self.assets.len())]
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn pooled_len(&self) -> usize {
        self.pool.pooled_len()
    }

    /// Tiles ever constructed (attached + pooled).
    pub fn constructed(&self) -> usize {
        self.pool.len_total()
    }

    /// Largest visible set seen since initialization.
    pub fn peak_visible(&self) -> usize {
        self.peak_visible
    }

    pub fn stats(&self) -> ChurnStats {
        self.stats
    }

    pub fn tile_at(&self, key: CellKey) -> Option<&Tile<V::Element>> {
        self.visible.get(&key).map(|&id| &self.pool[id])
    }

    pub fn visible_tiles(&self) -> impl Iterator<Item = (CellKey, &Tile<V::Element>)> + '_ {
        self.visible.iter().map(|(&key, &id)| (key, &self.pool[id]))
    }

    /// Average and worst recompute time in milliseconds over the recent window.
    /// Zero without the `metrics` feature.
    pub fn recompute_time_ms(&self) -> (f64, f64) {
        (self.timer.average_ms(), self.timer.max_ms())
    }
}
