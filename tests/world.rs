//! Sanity checks over the shipped maps: they load, their borders block
//! movement, and every teleporter pad routes somewhere.

use std::path::Path;

use tilequest::transitions::{TELEPORTER_TILE_IDS, destination};
use tilequest::world::World;

fn shipped_world() -> World {
    let mut world = World::new();
    for path in [
        "resources/maps/dirt.tmj",
        "resources/maps/island.tmj",
        "resources/maps/world.tmj",
    ] {
        world.load(Path::new(path)).expect("committed map loads");
    }
    world
}

#[test]
fn all_three_maps_load_and_newest_is_current() {
    let world = shipped_world();
    assert_eq!(world.len(), 3);
    assert_eq!(world.current_index(), 2);
}

#[test]
fn maps_are_31_by_31_with_16px_tiles() {
    let world = shipped_world();
    for index in 0..world.len() {
        let map = world.map(index);
        assert_eq!((map.width, map.height), (31, 31));
        assert_eq!((map.tilewidth, map.tileheight), (16, 16));
        assert!(map.layers.len() >= 2, "terrain plus decor");
    }
}

#[test]
fn map_borders_are_impassable() {
    let world = shipped_world();
    for index in 0..world.len() {
        let grid = world.grid(index);
        for t in 0..31 {
            assert!(!grid.is_walkable(t, 0), "map {index} north border at {t}");
            assert!(!grid.is_walkable(t, 30), "map {index} south border at {t}");
            assert!(!grid.is_walkable(0, t), "map {index} west border at {t}");
            assert!(!grid.is_walkable(30, t), "map {index} east border at {t}");
        }
        assert!(grid.is_walkable(15, 25), "map {index} interior is open");
    }
}

#[test]
fn every_pad_on_every_map_routes_somewhere() {
    let world = shipped_world();
    let mut pads_seen = 0;
    for index in 0..world.len() {
        let map = world.map(index);
        for row in 0..map.height as i32 {
            for col in 0..map.width as i32 {
                if let Some(id) = map.tile_id_at(0, col, row)
                    && TELEPORTER_TILE_IDS.contains(&id)
                {
                    pads_seen += 1;
                    let dest = destination(id).expect("pad id has a destination");
                    assert!(dest < world.len());
                    assert_ne!(dest, index, "pads never route to their own map");
                }
            }
        }
    }
    assert!(pads_seen >= 4, "world has two pads, island and dirt one each");
}

#[test]
fn start_map_has_pads_to_both_other_maps() {
    let world = shipped_world();
    let map = world.map(2);
    let mut dests = Vec::new();
    for row in 0..map.height as i32 {
        for col in 0..map.width as i32 {
            if let Some(id) = map.tile_id_at(0, col, row)
                && let Some(dest) = destination(id)
            {
                dests.push(dest);
            }
        }
    }
    dests.sort_unstable();
    dests.dedup();
    assert_eq!(dests, vec![0, 1]);
}
