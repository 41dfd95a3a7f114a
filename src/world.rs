//! The world registry: every loaded map with its tile lookup and
//! walkability grid, plus the current-map pointer.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::pathfinding::WalkGrid;
use crate::renderer::tiles::TileLookup;
use crate::tilemap::{MapError, TileMap};

/// The layer walkability derives from.
const TERRAIN_LAYER: usize = 0;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Owns three parallel lists — maps, tile lookups, walk grids — indexed
/// identically, and the index of the current map. Loading is all-or-none;
/// there is no partial world.
#[derive(Default)]
pub struct World {
    maps: Vec<TileMap>,
    lookups: Vec<TileLookup>,
    grids: Vec<WalkGrid>,
    current: usize,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a `.tmj` map and register it. The newest map becomes current.
    pub fn load(&mut self, path: &Path) -> Result<usize, WorldError> {
        let map = TileMap::load(path)?;
        let index = self.insert(map);
        info!(path = %path.display(), index, "map loaded");
        Ok(index)
    }

    /// Register an already-parsed map, deriving its lookup and grid.
    pub fn insert(&mut self, map: TileMap) -> usize {
        let lookup = TileLookup::build(&map);
        let grid = WalkGrid::from_layer(&map, TERRAIN_LAYER);
        self.maps.push(map);
        self.lookups.push(lookup);
        self.grids.push(grid);
        self.current = self.maps.len() - 1;
        self.current
    }

    /// Repoint the current map. Callers that hold per-map spatial caches
    /// must clear them alongside this.
    pub fn switch_to(&mut self, index: usize) {
        assert!(index < self.maps.len(), "no map at index {index}");
        self.current = index;
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_map(&self) -> &TileMap {
        &self.maps[self.current]
    }

    pub fn current_grid(&self) -> &WalkGrid {
        &self.grids[self.current]
    }

    pub fn map(&self, index: usize) -> &TileMap {
        &self.maps[index]
    }

    pub fn lookup(&self, index: usize) -> &TileLookup {
        &self.lookups[index]
    }

    pub fn grid(&self, index: usize) -> &WalkGrid {
        &self.grids[index]
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
