use std::path::Path;
use std::process::exit;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tilequest::engine::Engine;
use tilequest::game::RpgGame;
use tilequest::world::World;
use tilequest::{TARGET_UPS, WINDOW_HEIGHT, WINDOW_WIDTH};

/// Maps in load order; the last one is where the game starts.
const MAPS: [&str; 3] = [
    "resources/maps/dirt.tmj",
    "resources/maps/island.tmj",
    "resources/maps/world.tmj",
];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    init_tracing();

    let mut world = World::new();
    for path in MAPS {
        if let Err(e) = world.load(Path::new(path)) {
            error!(path, error = %e, "failed to load map");
            exit(1);
        }
    }
    info!(maps = world.len(), "world loaded");

    let game = RpgGame::new(world);

    Engine::builder()
        .with_title("tilequest")
        .with_size(WINDOW_WIDTH as u32, WINDOW_HEIGHT as u32)
        .with_ups(TARGET_UPS)
        .with_sprite_folder("resources/sprites")
        .with_sound_folder("resources/sounds")
        .run(game);
}
