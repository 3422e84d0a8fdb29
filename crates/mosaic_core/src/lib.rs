//! Mosaic Core
//!
//! Virtualization engine for an endlessly pannable grid of tiles:
//! - Cell addressing and wrap-around asset lookup
//! - Tile lifecycle (bind / attach / detach / reposition) with stale-load guards
//! - Free-list tile pool
//! - Grid controller that reconciles the visible set on every pan or resize
//!
//! Hosts plug in through the [`Viewport`] and [`TileElement`] traits.

pub mod asset;
pub mod cell;
pub mod controller;
pub mod error;
pub mod headless;
pub mod host;
pub mod layout;
pub mod pool;
pub mod tile;

pub use asset::{AssetDescriptor, AssetKind, Manifest};
pub use cell::{CellKey, CellSpan};
pub use controller::{ChurnStats, GridController};
pub use error::GridError;
pub use host::{LoadTicket, TileElement, Viewport};
pub use layout::GridLayout;
pub use pool::{Acquired, PoolError, TilePool};
pub use tile::{LoadOutcome, Tile, TileId, TileState};

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
