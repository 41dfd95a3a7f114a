//! Tileset slicing: mapping local tile IDs to pixel regions of their
//! tileset images, and baking those regions into one atlas image per map.
//!
//! The lookup itself is pure metadata (no I/O, no GPU) so the world
//! registry can own one per map headlessly; `bake_map_atlas` is the
//! load-time step that actually decodes the tileset PNGs.

use std::collections::HashMap;
use std::path::PathBuf;

use image::RgbaImage;
use thiserror::Error;

use crate::tilemap::TileMap;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to open tileset image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Pixel region of one tile inside its tileset's source image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileRegion {
    /// Index into the map's tileset list.
    pub tileset: usize,
    pub px: u32,
    pub py: u32,
    pub w: u32,
    pub h: u32,
}

/// Local tile ID → source-image region, built once per map at load time.
///
/// Layers are scanned in order and the first region seen for an ID wins;
/// a later tileset reusing a local ID cannot repoint it.
#[derive(Debug, Clone, Default)]
pub struct TileLookup {
    regions: HashMap<u32, TileRegion>,
}

impl TileLookup {
    pub fn build(map: &TileMap) -> Self {
        let mut regions = HashMap::new();
        for layer in &map.layers {
            for &gid in &layer.data {
                let Some((tileset, local)) = map.resolve(gid) else {
                    continue;
                };
                regions.entry(local).or_insert_with(|| {
                    let ts = &map.tilesets[tileset];
                    let col = local % ts.columns.max(1);
                    let row = local / ts.columns.max(1);
                    TileRegion {
                        tileset,
                        px: col * ts.tilewidth,
                        py: row * ts.tileheight,
                        w: ts.tilewidth,
                        h: ts.tileheight,
                    }
                });
            }
        }
        Self { regions }
    }

    pub fn region(&self, id: u32) -> Option<&TileRegion> {
        self.regions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// One map's tile art baked into a single RGBA image, with per-ID UVs.
pub struct TileAtlasImage {
    pub image: RgbaImage,
    pub uvs: HashMap<u32, ([f32; 2], [f32; 2])>,
}

/// Decode the map's tileset images and composite them into one atlas,
/// tilesets stacked vertically. Any decode failure is fatal to the load.
pub fn bake_map_atlas(map: &TileMap, lookup: &TileLookup) -> Result<TileAtlasImage, AtlasError> {
    let mut sources = Vec::with_capacity(map.tilesets.len());
    for ts in &map.tilesets {
        let path = map.dir.join(&ts.image);
        let img = image::open(&path)
            .map_err(|source| AtlasError::Image { path: path.clone(), source })?
            .to_rgba8();
        sources.push(img);
    }

    let atlas_w = sources.iter().map(|i| i.width()).max().unwrap_or(1).max(1);
    let atlas_h = sources.iter().map(|i| i.height()).sum::<u32>().max(1);
    let mut image = RgbaImage::new(atlas_w, atlas_h);

    let mut offsets = Vec::with_capacity(sources.len());
    let mut y = 0;
    for src in &sources {
        offsets.push(y);
        for (sx, sy, pixel) in src.enumerate_pixels() {
            image.put_pixel(sx, y + sy, *pixel);
        }
        y += src.height();
    }

    let mut uvs = HashMap::with_capacity(lookup.len());
    for (&id, region) in &lookup.regions {
        let oy = offsets[region.tileset];
        let uv_min = [
            region.px as f32 / atlas_w as f32,
            (region.py + oy) as f32 / atlas_h as f32,
        ];
        let uv_max = [
            (region.px + region.w) as f32 / atlas_w as f32,
            (region.py + region.h + oy) as f32 / atlas_h as f32,
        ];
        uvs.insert(id, (uv_min, uv_max));
    }

    Ok(TileAtlasImage { image, uvs })
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with_two_layers() -> TileMap {
        // Layer 0 uses GIDs 1 and 5 (local 0 and 4); layer 1 adds GID 3
        // (local 2) and repeats GID 1.
        let json = serde_json::json!({
            "width": 2, "height": 2,
            "tilewidth": 16, "tileheight": 16,
            "layers": [
                { "name": "terrain", "width": 2, "height": 2, "data": [1, 5, 1, 1] },
                { "name": "decor", "width": 2, "height": 2, "data": [0, 3, 0, 1] }
            ],
            "tilesets": [{
                "firstgid": 1, "name": "tiles", "image": "tileset.png",
                "imagewidth": 128, "imageheight": 16,
                "tilewidth": 16, "tileheight": 16,
                "columns": 8, "tilecount": 8
            }]
        });
        serde_json::from_value(json).expect("test map must parse")
    }

    #[test]
    fn lookup_covers_every_id_used_by_any_layer() {
        let map = map_with_two_layers();
        let lookup = TileLookup::build(&map);
        assert_eq!(lookup.len(), 3);
        assert!(lookup.region(0).is_some());
        assert!(lookup.region(2).is_some());
        assert!(lookup.region(4).is_some());
        assert!(lookup.region(7).is_none(), "unused IDs are absent");
    }

    #[test]
    fn region_slices_by_column_and_row() {
        let map = map_with_two_layers();
        let lookup = TileLookup::build(&map);
        let region = lookup.region(4).unwrap();
        assert_eq!(
            *region,
            TileRegion { tileset: 0, px: 64, py: 0, w: 16, h: 16 }
        );
    }

    #[test]
    fn first_seen_region_wins_on_repeat() {
        let mut map = map_with_two_layers();
        // A second tileset whose local 0 would slice differently.
        map.tilesets.push(crate::tilemap::Tileset {
            firstgid: 9,
            name: "props".into(),
            image: "props.png".into(),
            imagewidth: 64,
            imageheight: 16,
            tilewidth: 16,
            tileheight: 16,
            columns: 4,
            tilecount: 4,
        });
        map.layers[1].data[0] = 9; // local 0 again, from the second tileset
        let lookup = TileLookup::build(&map);
        assert_eq!(lookup.region(0).unwrap().tileset, 0, "layer-order first seen wins");
    }

    #[test]
    fn bake_fails_on_missing_tileset_image() {
        let mut map = map_with_two_layers();
        map.dir = std::path::PathBuf::from("definitely/not/here");
        let lookup = TileLookup::build(&map);
        assert!(matches!(
            bake_map_atlas(&map, &lookup),
            Err(AtlasError::Image { .. })
        ));
    }
}
