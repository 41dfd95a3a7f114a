//! Tiled JSON (`.tmj`) map resource.
//!
//! The simulation treats maps as opaque external input: a grid of tile
//! IDs per layer plus enough tileset metadata to slice the tileset image
//! into per-ID regions. Layer data holds GIDs (0 = empty cell); the
//! game's tile vocabulary is local IDs, `gid - firstgid` of the covering
//! tileset.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("map {path} is not valid Tiled JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("map {path} has no tile layers")]
    NoLayers { path: PathBuf },
    #[error("map {path} has no tilesets")]
    NoTilesets { path: PathBuf },
    #[error("map {path} layer '{layer}' has {actual} cells, expected {expected}")]
    LayerSize {
        path: PathBuf,
        layer: String,
        expected: usize,
        actual: usize,
    },
}

/// One tile layer: a row-major grid of GIDs.
#[derive(Debug, Clone, Deserialize)]
pub struct Layer {
    #[serde(default)]
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u32>,
}

/// Tileset metadata sufficient to slice its source image by local ID.
#[derive(Debug, Clone, Deserialize)]
pub struct Tileset {
    pub firstgid: u32,
    #[serde(default)]
    pub name: String,
    /// Source image path, relative to the map file.
    pub image: String,
    pub imagewidth: u32,
    pub imageheight: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    pub columns: u32,
    pub tilecount: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TileMap {
    pub width: u32,
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    pub layers: Vec<Layer>,
    pub tilesets: Vec<Tileset>,
    /// Directory the map was loaded from; tileset image paths resolve
    /// against it. Empty for maps parsed from strings in tests.
    #[serde(skip)]
    pub dir: PathBuf,
}

impl TileMap {
    /// Load and validate a `.tmj` file. Any failure here is fatal to the
    /// caller: there is no partial or degraded map.
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut map: TileMap =
            serde_json::from_str(&text).map_err(|source| MapError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        map.dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
        map.validate(path)?;
        Ok(map)
    }

    fn validate(&self, path: &Path) -> Result<(), MapError> {
        if self.layers.is_empty() {
            return Err(MapError::NoLayers { path: path.to_path_buf() });
        }
        if self.tilesets.is_empty() {
            return Err(MapError::NoTilesets { path: path.to_path_buf() });
        }
        for layer in &self.layers {
            let expected = (layer.width * layer.height) as usize;
            if layer.data.len() != expected {
                return Err(MapError::LayerSize {
                    path: path.to_path_buf(),
                    layer: layer.name.clone(),
                    expected,
                    actual: layer.data.len(),
                });
            }
        }
        Ok(())
    }

    /// Resolve a GID to (tileset index, local tile ID). The covering
    /// tileset is the one with the largest `firstgid` not exceeding the
    /// GID (Tiled's rule); GID 0 is the empty cell.
    pub fn resolve(&self, gid: u32) -> Option<(usize, u32)> {
        if gid == 0 {
            return None;
        }
        self.tilesets
            .iter()
            .enumerate()
            .filter(|(_, ts)| ts.firstgid <= gid)
            .max_by_key(|(_, ts)| ts.firstgid)
            .filter(|(_, ts)| gid < ts.firstgid + ts.tilecount)
            .map(|(i, ts)| (i, gid - ts.firstgid))
    }

    /// Local tile ID for a GID, ignoring which tileset covers it.
    pub fn local_id(&self, gid: u32) -> Option<u32> {
        self.resolve(gid).map(|(_, id)| id)
    }

    /// Local tile ID at a layer cell, or None for empty/out-of-range.
    pub fn tile_id_at(&self, layer: usize, col: i32, row: i32) -> Option<u32> {
        let layer = self.layers.get(layer)?;
        if col < 0 || row < 0 || col as u32 >= layer.width || row as u32 >= layer.height {
            return None;
        }
        let idx = (row as u32 * layer.width + col as u32) as usize;
        self.local_id(layer.data[idx])
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
