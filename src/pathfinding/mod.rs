//! Per-map walkability grid and the path query over it.
//!
//! The grid is derived once per map at load time from the terrain layer
//! and never changes afterward; runtime blocking (entities standing in a
//! cell) is deliberately not modeled.

mod astar;

pub use astar::astar;

use crate::tilemap::TileMap;

/// Terrain-layer local tile IDs that block movement (water, rock).
pub const BLOCKED_TILE_IDS: [u32; 2] = [4, 5];

/// Ceiling on A* expansions per query.
const MAX_SEARCH_ITERATIONS: usize = 10_000;

/// Boolean walkability grid for one map, in cell coordinates.
#[derive(Debug, Clone)]
pub struct WalkGrid {
    width: i32,
    height: i32,
    walkable: Vec<bool>,
}

impl WalkGrid {
    /// Derive walkability from one tile layer: blocked IDs are impassable,
    /// empty cells and every other ID are walkable.
    pub fn from_layer(map: &TileMap, layer: usize) -> Self {
        let width = map.width as i32;
        let height = map.height as i32;
        let mut walkable = vec![true; (width * height) as usize];
        for row in 0..height {
            for col in 0..width {
                if let Some(id) = map.tile_id_at(layer, col, row)
                    && BLOCKED_TILE_IDS.contains(&id)
                {
                    walkable[(row * width + col) as usize] = false;
                }
            }
        }
        Self { width, height, walkable }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Cells outside the grid are not walkable.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.walkable[(y * self.width + x) as usize]
    }

    /// Shortest path between two cells, start and goal inclusive, or None
    /// when unreachable.
    pub fn find_path(&self, start: (i32, i32), goal: (i32, i32)) -> Option<Vec<(i32, i32)>> {
        astar(start, goal, |x, y| self.is_walkable(x, y), MAX_SEARCH_ITERATIONS)
    }
}
