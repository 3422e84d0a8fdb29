//! Seams between the grid and whatever draws it
//!
//! The controller never touches a DOM directly. A host supplies a
//! [`Viewport`] that reports its size and manufactures [`TileElement`]s; the
//! web crate implements both over `web-sys`, [`crate::headless`] implements
//! them in memory.

use crate::asset::AssetDescriptor;
use crate::tile::TileId;
use glam::DVec2;

/// Identifies one asset load so its completion can be matched to the tile.
///
/// The generation is bumped whenever the tile's source changes or the tile is
/// detached; a completion carrying an older generation is stale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub tile: TileId,
    pub generation: u32,
}

/// Drawing surface the grid pans over.
pub trait Viewport {
    type Element: TileElement;

    /// Current pixel size. Queried on init and on every resize notification.
    fn size(&self) -> DVec2;

    /// Build a fresh, unmounted element. Only called when the pool is empty.
    fn create_element(&mut self) -> Self::Element;
}

/// On-screen representation of one tile.
pub trait TileElement {
    /// Make the element a child of the viewport. Called only while unmounted.
    fn mount(&mut self);

    /// Remove the element from the viewport. Called only while mounted.
    fn unmount(&mut self);

    /// Start fetching `asset`. The host reports completion through
    /// `GridController::on_tile_loaded` / `on_tile_load_failed` with `ticket`.
    fn begin_load(&mut self, asset: &AssetDescriptor, ticket: LoadTicket);

    /// Drop the current source, abandoning any in-flight fetch.
    fn clear_source(&mut self);

    /// Translate the element to `translate` pixels (parallax already applied).
    fn set_transform(&mut self, translate: DVec2);

    fn set_revealed(&mut self, revealed: bool);

    /// Click target; `None` makes the element inert.
    fn set_link(&mut self, link: Option<&str>);
}
