//! Logical cell addressing and wrap-around asset lookup

/// Identity of one cell in the unbounded lattice.
///
/// Two keys with the same column and row are the same cell, whatever tile
/// or asset currently occupies it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub col: i64,
    pub row: i64,
}

impl CellKey {
    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }

    /// Asset index for this cell: `|row * stride + col| mod asset_count`.
    ///
    /// `stride` is a fixed lattice width, independent of how many columns the
    /// viewport shows, so a cell keeps its asset across resizes. Arithmetic is
    /// widened so extreme pans cannot overflow.
    pub fn asset_index(&self, stride: u32, asset_count: usize) -> usize {
        debug_assert!(asset_count > 0, "asset_index requires a non-empty manifest");
        let linear = self.row as i128 * stride as i128 + self.col as i128;
        (linear.unsigned_abs() % asset_count.max(1) as u128) as usize
    }
}

/// How many columns and rows one recompute walks (overscan included).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CellSpan {
    pub cols: u32,
    pub rows: u32,
}

impl CellSpan {
    /// Upper bound on tiles attached after a recompute.
    pub fn capacity(&self) -> usize {
        self.cols as usize * self.rows as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_column_wraps_to_positive_index() {
        // |2 * 4 + -1| mod 3 = 7 mod 3 = 1
        assert_eq!(CellKey::new(-1, 2).asset_index(4, 3), 1);
    }

    #[test]
    fn test_negative_linear_index_uses_absolute_value() {
        // |-1 * 4 + 0| mod 3 = 4 mod 3 = 1
        assert_eq!(CellKey::new(0, -1).asset_index(4, 3), 1);
        assert!(CellKey::new(i64::MIN, i64::MIN).asset_index(4, 7) < 7);
    }

    #[test]
    fn test_stride_is_independent_of_viewport() {
        // Same cell, same asset, no matter what else happens.
        let key = CellKey::new(13, -5);
        let first = key.asset_index(4, 5);
        for _ in 0..10 {
            assert_eq!(key.asset_index(4, 5), first);
        }
    }
}
