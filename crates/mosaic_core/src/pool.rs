//! Free-list arena of tiles
//!
//! Tiles live in one contiguous arena and are addressed by [`TileId`]. The
//! free list is a LIFO stack of ids; a tile is either on it or owned by the
//! controller's visible set, never both.

use crate::asset::AssetDescriptor;
use crate::host::TileElement;
use crate::tile::{Tile, TileId};
use std::ops::{Index, IndexMut};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("tile {index} is out of bounds (arena holds {len})")]
    IndexOutOfBounds { index: u32, len: usize },

    #[error("tile {index} is already pooled")]
    AlreadyPooled { index: u32 },
}

/// How `acquire` satisfied a request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Acquired {
    Recycled,
    Constructed,
}

pub struct TilePool<E> {
    tiles: Vec<Tile<E>>,
    free: Vec<TileId>,
    pooled: Vec<bool>,
}

impl<E: TileElement> TilePool<E> {
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            free: Vec::new(),
            pooled: Vec::new(),
        }
    }

    /// Pop a free tile, or build one with `make` when the free list is empty,
    /// and bind it to `asset`. The returned tile is detached.
    pub fn acquire(
        &mut self,
        asset: Rc<AssetDescriptor>,
        make: impl FnOnce() -> E,
    ) -> (TileId, Acquired) {
        let (id, how) = match self.free.pop() {
            Some(id) => {
                self.pooled[id.index() as usize] = false;
                (id, Acquired::Recycled)
            }
            None => {
                let id = TileId::new(self.tiles.len() as u32);
                self.tiles.push(Tile::new(id, make()));
                self.pooled.push(false);
                (id, Acquired::Constructed)
            }
        };
        self.tiles[id.index() as usize].bind(asset);
        (id, how)
    }

    /// Detach `id` and push it on the free list.
    pub fn release(&mut self, id: TileId) -> Result<(), PoolError> {
        let index = id.index();
        let slot = self
            .pooled
            .get_mut(index as usize)
            .ok_or(PoolError::IndexOutOfBounds {
                index,
                len: self.tiles.len(),
            })?;
        if *slot {
            return Err(PoolError::AlreadyPooled { index });
        }
        *slot = true;
        self.tiles[index as usize].detach();
        self.free.push(id);
        Ok(())
    }

    pub fn get(&self, id: TileId) -> Result<&Tile<E>, PoolError> {
        self.tiles
            .get(id.index() as usize)
            .ok_or(PoolError::IndexOutOfBounds {
                index: id.index(),
                len: self.tiles.len(),
            })
    }

    pub fn get_mut(&mut self, id: TileId) -> Result<&mut Tile<E>, PoolError> {
        let len = self.tiles.len();
        self.tiles
            .get_mut(id.index() as usize)
            .ok_or(PoolError::IndexOutOfBounds {
                index: id.index(),
                len,
            })
    }

    pub fn is_pooled(&self, id: TileId) -> bool {
        self.pooled.get(id.index() as usize).copied().unwrap_or(false)
    }

    /// Tiles ever constructed. Never shrinks.
    #[inline]
    pub fn len_total(&self) -> usize {
        self.tiles.len()
    }

    /// Tiles currently on the free list.
    #[inline]
    pub fn pooled_len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl<E: TileElement> Default for TilePool<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Index<TileId> for TilePool<E> {
    type Output = Tile<E>;

    fn index(&self, id: TileId) -> &Tile<E> {
        &self.tiles[id.index() as usize]
    }
}

impl<E> IndexMut<TileId> for TilePool<E> {
    fn index_mut(&mut self, id: TileId) -> &mut Tile<E> {
        &mut self.tiles[id.index() as usize]
    }
}
