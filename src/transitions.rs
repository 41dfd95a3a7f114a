//! World transitions: per-map barrier and teleporter rectangles scanned
//! lazily from the terrain layer, barrier bounce-back, and the fixed
//! teleporter destination table.

use std::collections::HashMap;

use tracing::debug;

use crate::character::Character;
use crate::collision::{Rect, collides};
use crate::tilemap::TileMap;
use crate::{SPRITE_SCALE, WINDOW_HEIGHT, WINDOW_WIDTH};

/// Terrain tile IDs that stop the player (water, rock).
pub const BARRIER_TILE_IDS: [u32; 2] = [4, 5];
/// Terrain tile IDs that act as teleporter pads.
pub const TELEPORTER_TILE_IDS: [u32; 3] = [1, 2, 3];

/// A blocked move is reversed by this multiple of the attempted step.
/// The bounce (rather than a hard stop) is tuned behavior; keep it.
pub const BOUNCE_FACTOR: i32 = 5;

/// The layer barriers and teleporters are scanned from.
const TERRAIN_LAYER: usize = 0;

/// Lazily-rebuilt spatial caches for the current map. Cleared on every
/// map switch and rebuilt from the new map's tiles on first use.
#[derive(Debug, Default)]
pub struct TransitionCache {
    barriers: Vec<Rect>,
    teleporters: HashMap<u32, Rect>,
    built: bool,
}

impl TransitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached rectangles; the next query rescans the map.
    pub fn clear(&mut self) {
        self.barriers.clear();
        self.teleporters.clear();
        self.built = false;
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    fn ensure_built(&mut self, map: &TileMap) {
        if self.built {
            return;
        }
        let tile_w = map.tilewidth as i32 * SPRITE_SCALE;
        let tile_h = map.tileheight as i32 * SPRITE_SCALE;
        for row in 0..map.height as i32 {
            for col in 0..map.width as i32 {
                let Some(id) = map.tile_id_at(TERRAIN_LAYER, col, row) else {
                    continue;
                };
                let rect = Rect::new(col * tile_w, row * tile_h, tile_w, tile_h);
                if BARRIER_TILE_IDS.contains(&id) {
                    self.barriers.push(rect);
                } else if TELEPORTER_TILE_IDS.contains(&id) {
                    // First pad wins per ID; later duplicates are inert.
                    self.teleporters.entry(id).or_insert(rect);
                }
            }
        }
        self.built = true;
        debug!(
            barriers = self.barriers.len(),
            teleporters = self.teleporters.len(),
            "transition caches rebuilt"
        );
    }

    pub fn barriers(&mut self, map: &TileMap) -> &[Rect] {
        self.ensure_built(map);
        &self.barriers
    }

    pub fn teleporter(&mut self, map: &TileMap, id: u32) -> Option<Rect> {
        self.ensure_built(map);
        self.teleporters.get(&id).copied()
    }

    /// ID of the first teleporter pad the rectangle overlaps, scanning
    /// pad IDs in ascending order.
    pub fn teleporter_hit(&mut self, map: &TileMap, body: Rect) -> Option<u32> {
        self.ensure_built(map);
        TELEPORTER_TILE_IDS
            .iter()
            .copied()
            .find(|id| self.teleporters.get(id).is_some_and(|pad| collides(body, *pad)))
    }
}

/// Apply a movement step and resolve barriers: if the post-move body
/// overlaps any barrier, the step is replaced by BOUNCE_FACTOR times the
/// step in the opposite direction, from the pre-move position.
pub fn resolve_move(cache: &mut TransitionCache, map: &TileMap, ch: &mut Character, dx: i32, dy: i32) {
    let (px, py) = (ch.x, ch.y);
    ch.x += dx;
    ch.y += dy;
    let body = ch.bounds();
    if cache.barriers(map).iter().any(|barrier| collides(body, *barrier)) {
        ch.x = px - dx * BOUNCE_FACTOR;
        ch.y = py - dy * BOUNCE_FACTOR;
    }
}

/// Destination map index for a teleporter pad ID.
pub fn destination(pad: u32) -> Option<usize> {
    match pad {
        1 => Some(1),
        2 => Some(2),
        3 => Some(0),
        _ => None,
    }
}

/// Entry position on the destination map. Pads 1 and 2 branch on x
/// (entering from a horizontal edge); pad 3 branches on y.
pub fn entry_position(pad: u32, x: i32, y: i32) -> (i32, i32) {
    match pad {
        1 | 2 => {
            if x > 600 {
                (50, y)
            } else if x < 150 {
                (WINDOW_WIDTH - 100, y)
            } else {
                (x, y)
            }
        }
        3 => {
            if y > 600 {
                (x, 50)
            } else if y < 150 {
                (x, WINDOW_HEIGHT - 100)
            } else {
                (x, y)
            }
        }
        _ => (x, y),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Character;

    /// 10x10 map: rock border (id 5 → gid 6), one pad of each ID inside,
    /// grass (id 0 → gid 1) elsewhere.
    fn test_map() -> TileMap {
        let w = 10;
        let mut data = vec![1u32; w * w];
        for i in 0..w {
            data[i] = 6;
            data[(w - 1) * w + i] = 6;
            data[i * w] = 6;
            data[i * w + w - 1] = 6;
        }
        data[3 * w + 3] = 2; // pad 1 at (3,3)
        data[5 * w + 5] = 3; // pad 2 at (5,5)
        data[7 * w + 7] = 4; // pad 3 at (7,7)
        data[8 * w + 2] = 3; // duplicate pad 2; first-seen wins
        let json = serde_json::json!({
            "width": w, "height": w,
            "tilewidth": 16, "tileheight": 16,
            "layers": [{ "name": "terrain", "width": w, "height": w, "data": data }],
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
    fn scan_collects_barriers_and_teleporters() {
        let map = test_map();
        let mut cache = TransitionCache::new();
        // Border: 4*10 - 4 corners counted once = 36 rock tiles.
        assert_eq!(cache.barriers(&map).len(), 36);
        assert_eq!(cache.teleporter(&map, 1), Some(Rect::new(96, 96, 32, 32)));
        assert_eq!(cache.teleporter(&map, 2), Some(Rect::new(160, 160, 32, 32)));
        assert_eq!(cache.teleporter(&map, 3), Some(Rect::new(224, 224, 32, 32)));
    }

    #[test]
    fn duplicate_pad_ids_keep_the_first_rect() {
        let map = test_map();
        let mut cache = TransitionCache::new();
        // The (2,8) duplicate of pad 2 must not replace the (5,5) one.
        assert_eq!(cache.teleporter(&map, 2), Some(Rect::new(160, 160, 32, 32)));
    }

    #[test]
    fn clear_forces_a_rescan() {
        let map = test_map();
        let mut cache = TransitionCache::new();
        let _ = cache.barriers(&map);
        assert!(cache.is_built());
        cache.clear();
        assert!(!cache.is_built());
        assert_eq!(cache.barriers(&map).len(), 36);
    }

    #[test]
    fn blocked_move_bounces_back_five_times_the_step() {
        let map = test_map();
        let mut cache = TransitionCache::new();
        // Rock border column at x=288..320; walking right at speed 3 from
        // x=256 pushes the 32-wide body into it.
        let mut ch = Character::new("player", 256, 100, 0, 5, 3, 1);
        resolve_move(&mut cache, &map, &mut ch, 3, 0);
        assert_eq!(ch.x, 256 - 15, "net x shrinks by 5x the step");
        assert_eq!(ch.y, 100);
    }

    #[test]
    fn open_move_applies_the_step() {
        let map = test_map();
        let mut cache = TransitionCache::new();
        let mut ch = Character::new("player", 100, 100, 0, 5, 3, 1);
        resolve_move(&mut cache, &map, &mut ch, 0, 3);
        assert_eq!((ch.x, ch.y), (100, 103));
    }

    #[test]
    fn teleporter_hit_reports_the_overlapping_pad() {
        let map = test_map();
        let mut cache = TransitionCache::new();
        let body = Rect::new(170, 170, 32, 32);
        assert_eq!(cache.teleporter_hit(&map, body), Some(2));
        let off_pad = Rect::new(40, 40, 32, 32);
        assert_eq!(cache.teleporter_hit(&map, off_pad), None);
    }

    #[test]
    fn destination_table_is_fixed() {
        assert_eq!(destination(1), Some(1));
        assert_eq!(destination(2), Some(2));
        assert_eq!(destination(3), Some(0));
        assert_eq!(destination(9), None);
    }

    #[test]
    fn entry_rules_branch_on_position() {
        // Horizontal pads: far right enters at x=50, far left at width-100.
        assert_eq!(entry_position(2, 700, 300), (50, 300));
        assert_eq!(entry_position(2, 100, 300), (WINDOW_WIDTH - 100, 300));
        assert_eq!(entry_position(1, 400, 300), (400, 300));
        // Vertical pad: same rule on y.
        assert_eq!(entry_position(3, 300, 700), (300, 50));
        assert_eq!(entry_position(3, 300, 100), (300, WINDOW_HEIGHT - 100));
        assert_eq!(entry_position(3, 300, 400), (300, 400));
    }
}
