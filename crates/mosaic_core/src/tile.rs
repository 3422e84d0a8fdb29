//! Tile: a pooled, rebindable renderable bound to one asset
//!
//! Tiles are never destroyed while the grid runs. The pool hands them out,
//! the controller attaches and positions them, and detached tiles go back to
//! the pool with their element intact.

use crate::asset::AssetDescriptor;
use crate::host::{LoadTicket, TileElement};
use glam::DVec2;
use std::rc::Rc;

/// Stable arena index of a tile.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u32);

impl TileId {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Attachment state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TileState {
    Detached,
    /// Mounted, source requested, still hidden.
    Loading,
    /// Mounted and revealed.
    Ready,
}

impl TileState {
    pub fn is_attached(&self) -> bool {
        !matches!(self, TileState::Detached)
    }
}

/// Result of delivering a load completion to a tile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Revealed,
    /// The ticket predates a rebind or detach; nothing changed.
    Stale,
}

pub struct Tile<E> {
    id: TileId,
    element: E,
    asset: Option<Rc<AssetDescriptor>>,
    position: DVec2,
    state: TileState,
    generation: u32,
    /// Element currently holds (or is fetching) the bound asset's source.
    source_requested: bool,
}

impl<E: TileElement> Tile<E> {
    pub(crate) fn new(id: TileId, element: E) -> Self {
        Self {
            id,
            element,
            asset: None,
            position: DVec2::ZERO,
            state: TileState::Detached,
            generation: 0,
            source_requested: false,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn asset(&self) -> Option<&AssetDescriptor> {
        self.asset.as_deref()
    }

    /// Logical screen position, before parallax.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn link(&self) -> Option<&str> {
        self.asset.as_deref().and_then(AssetDescriptor::link)
    }

    /// Rebind to `asset`. A no-op for the source when it is unchanged; a
    /// changed source invalidates any in-flight load and, if attached,
    /// starts the new one immediately.
    pub fn bind(&mut self, asset: Rc<AssetDescriptor>) {
        let unchanged = self
            .asset
            .as_deref()
            .is_some_and(|current| !current.source_differs(&asset));

        self.element.set_link(asset.link());
        self.asset = Some(asset);

        if unchanged {
            if self.state.is_attached() {
                self.apply_transform();
            }
            return;
        }

        self.generation = self.generation.wrapping_add(1);
        self.source_requested = false;
        if self.state.is_attached() {
            self.request_source();
        }
    }

    /// Mount the element if needed and request the source on first attach
    /// or after a source change.
    pub fn attach(&mut self) {
        if self.state == TileState::Detached {
            self.element.set_revealed(false);
            self.element.mount();
            self.state = TileState::Loading;
        }
        if !self.source_requested {
            self.request_source();
        }
    }

    /// Unmount and drop the source. Safe to call while detached.
    pub fn detach(&mut self) {
        if self.state == TileState::Detached {
            return;
        }
        self.element.set_revealed(false);
        self.element.clear_source();
        self.element.unmount();
        self.source_requested = false;
        self.generation = self.generation.wrapping_add(1);
        self.state = TileState::Detached;
    }

    /// Place the tile at `position`, scaled by the asset's parallax speed.
    pub fn reposition(&mut self, position: DVec2) {
        self.position = position;
        self.apply_transform();
    }

    /// Deliver a load completion. Tickets from an older generation, or for a
    /// tile no longer waiting on a load, are ignored.
    pub fn complete_load(&mut self, ticket: LoadTicket) -> LoadOutcome {
        if ticket.tile != self.id
            || ticket.generation != self.generation
            || self.state != TileState::Loading
        {
            return LoadOutcome::Stale;
        }
        self.state = TileState::Ready;
        self.apply_transform();
        self.element.set_revealed(true);
        LoadOutcome::Revealed
    }

    /// True when `ticket` names the load this tile is currently waiting on.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.tile == self.id && ticket.generation == self.generation && self.state == TileState::Loading
    }

    fn request_source(&mut self) {
        let Some(asset) = self.asset.clone() else {
            return;
        };
        self.generation = self.generation.wrapping_add(1);
        self.state = TileState::Loading;
        self.element.set_revealed(false);
        self.element.begin_load(
            &asset,
            LoadTicket {
                tile: self.id,
                generation: self.generation,
            },
        );
        self.source_requested = true;
    }

    fn apply_transform(&mut self) {
        let speed = self.asset.as_deref().map_or(1.0, |asset| asset.parallax_speed);
        self.element.set_transform(self.position * speed);
    }
}
