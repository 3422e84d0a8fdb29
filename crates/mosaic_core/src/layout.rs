//! Grid geometry: tile size, lattice stride and the offset-to-screen mapping

use crate::cell::{CellKey, CellSpan};
use crate::error::GridError;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Default tile edge in CSS pixels.
pub const DEFAULT_TILE_SIZE: f64 = 200.0;

/// Default lattice stride used by wrap-around indexing.
pub const DEFAULT_FIXED_COLS: u32 = 4;

/// Extra cells evaluated past each viewport edge.
pub const OVERSCAN_CELLS: u32 = 1;

/// Static grid configuration.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub tile_width: f64,
    pub tile_height: f64,
    /// Lattice stride for asset lookup, decoupled from the viewport column count.
    pub fixed_cols: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            fixed_cols: DEFAULT_FIXED_COLS,
        }
    }
}

impl GridLayout {
    /// Tile sizes must be positive whole pixels: positions are rounded to
    /// whole pixels, so a fractional size would open gaps between columns.
    pub fn validate(&self) -> Result<(), GridError> {
        for (axis, size) in [("width", self.tile_width), ("height", self.tile_height)] {
            if !size.is_finite() || size < 1.0 || size.fract() != 0.0 {
                return Err(GridError::InvalidTileSize { axis, size });
            }
        }
        if self.fixed_cols == 0 {
            return Err(GridError::InvalidStride);
        }
        Ok(())
    }

    #[inline]
    pub fn tile_size(&self) -> DVec2 {
        DVec2::new(self.tile_width, self.tile_height)
    }

    /// Cells to walk for a viewport: `ceil(extent / tile) + 2` per axis.
    pub fn span_for(&self, viewport: DVec2) -> CellSpan {
        let cells = |extent: f64, tile: f64| {
            let extent = extent.max(0.0);
            (extent / tile).ceil().min(u32::MAX as f64 / 2.0) as u32 + 2 * OVERSCAN_CELLS
        };
        CellSpan {
            cols: cells(viewport.x, self.tile_width),
            rows: cells(viewport.y, self.tile_height),
        }
    }

    /// Whole cells the pan has moved past the origin, negated.
    pub fn base_cell(&self, offset: DVec2) -> CellKey {
        CellKey::new(
            -(offset.x / self.tile_width).floor() as i64,
            -(offset.y / self.tile_height).floor() as i64,
        )
    }

    /// Sub-tile remainder of the offset, always in `[0, tile)`.
    ///
    /// Pairs with the floored `base_cell`; positions derive from this phase
    /// instead of the absolute offset so long pans do not drift.
    pub fn phase(&self, offset: DVec2) -> DVec2 {
        DVec2::new(
            offset.x.rem_euclid(self.tile_width),
            offset.y.rem_euclid(self.tile_height),
        )
    }

    /// Screen position of the walk cell `(col, row)`, rounded to whole pixels.
    ///
    /// Column `-1` lands one tile left of column `0`, just off-screen. Halves
    /// round toward positive infinity on both sides of zero so neighbouring
    /// tiles stay exactly one tile apart.
    pub fn screen_position(&self, col: i64, row: i64, phase: DVec2) -> DVec2 {
        let tile = self.tile_size();
        (DVec2::new(col as f64 * tile.x, row as f64 * tile.y) + phase - tile + 0.5).floor()
    }

    /// True when a tile placed at `position` overlaps `[0, w) x [0, h)`.
    pub fn intersects_viewport(&self, position: DVec2, viewport: DVec2) -> bool {
        position.x + self.tile_width > 0.0
            && position.y + self.tile_height > 0.0
            && position.x < viewport.x
            && position.y < viewport.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_includes_overscan() {
        let layout = GridLayout::default();
        let span = layout.span_for(DVec2::new(800.0, 600.0));
        assert_eq!(span, CellSpan { cols: 6, rows: 5 });
        assert_eq!(span.capacity(), 30);
    }

    #[test]
    fn test_span_of_partial_tiles_rounds_up() {
        let layout = GridLayout::default();
        let span = layout.span_for(DVec2::new(801.0, 1.0));
        assert_eq!(span, CellSpan { cols: 7, rows: 3 });
    }

    #[test]
    fn test_span_of_degenerate_viewport() {
        let layout = GridLayout::default();
        assert_eq!(layout.span_for(DVec2::ZERO), CellSpan { cols: 2, rows: 2 });
        assert_eq!(layout.span_for(DVec2::new(-5.0, f64::NAN)), CellSpan { cols: 2, rows: 2 });
    }

    #[test]
    fn test_one_tile_of_pan_shifts_base_by_one() {
        let layout = GridLayout::default();
        assert_eq!(layout.base_cell(DVec2::ZERO), CellKey::new(0, 0));
        assert_eq!(layout.base_cell(DVec2::new(200.0, 0.0)), CellKey::new(-1, 0));
        assert_eq!(layout.base_cell(DVec2::new(-1.0, -200.0)), CellKey::new(1, 1));
        assert_eq!(layout.phase(DVec2::new(200.0, 0.0)), layout.phase(DVec2::ZERO));
    }

    #[test]
    fn test_phase_is_never_negative() {
        let layout = GridLayout::default();
        let phase = layout.phase(DVec2::new(-50.0, -450.0));
        assert_eq!(phase, DVec2::new(150.0, 150.0));
    }

    #[test]
    fn test_overscan_cell_sits_off_screen() {
        let layout = GridLayout::default();
        let phase = layout.phase(DVec2::new(30.0, 0.0));
        let near = layout.screen_position(-1, -1, phase);
        assert_eq!(near, DVec2::new(-370.0, -400.0));
        assert!(!layout.intersects_viewport(near, DVec2::new(800.0, 600.0)));

        let first = layout.screen_position(0, 0, phase);
        assert_eq!(first, DVec2::new(-170.0, -200.0));
        assert!(!layout.intersects_viewport(first, DVec2::new(800.0, 600.0)));
        assert!(layout.intersects_viewport(layout.screen_position(0, 1, phase), DVec2::new(800.0, 600.0)));
    }

    #[test]
    fn test_half_pixel_phase_rounds_consistently() {
        let layout = GridLayout::default();
        let phase = layout.phase(DVec2::new(0.5, 0.5));
        let left = layout.screen_position(0, 0, phase);
        let right = layout.screen_position(1, 1, phase);
        assert_eq!(right - left, DVec2::new(200.0, 200.0));
        assert_eq!(left, DVec2::new(-199.0, -199.0));
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut layout = GridLayout::default();
        assert!(layout.validate().is_ok());

        layout.tile_width = 0.0;
        assert!(matches!(
            layout.validate(),
            Err(GridError::InvalidTileSize { axis: "width", .. })
        ));

        layout.tile_width = 200.0;
        layout.tile_height = f64::INFINITY;
        assert!(matches!(
            layout.validate(),
            Err(GridError::InvalidTileSize { axis: "height", .. })
        ));

        layout.tile_height = 200.0;
        layout.fixed_cols = 0;
        assert!(matches!(layout.validate(), Err(GridError::InvalidStride)));
    }

    #[test]
    fn test_validate_rejects_fractional_tile_size() {
        let layout = GridLayout {
            tile_width: 200.4,
            ..GridLayout::default()
        };
        assert!(matches!(
            layout.validate(),
            Err(GridError::InvalidTileSize { axis: "width", size }) if size == 200.4
        ));

        let layout = GridLayout {
            tile_height: 0.5,
            ..GridLayout::default()
        };
        assert!(matches!(
            layout.validate(),
            Err(GridError::InvalidTileSize { axis: "height", .. })
        ));
    }

    #[test]
    fn test_columns_are_exactly_one_tile_apart() {
        let layout = GridLayout {
            tile_width: 201.0,
            tile_height: 199.0,
            ..GridLayout::default()
        };
        let phase = layout.phase(DVec2::new(-37.5, 12.5));
        for col in -1..6 {
            let left = layout.screen_position(col, col, phase);
            let right = layout.screen_position(col + 1, col + 1, phase);
            assert_eq!(right - left, DVec2::new(201.0, 199.0));
        }
    }
}
