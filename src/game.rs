//! The game proper: entity roster, the per-tick update pipeline, and the
//! draw pass that feeds the engine's sprite queue.

use tracing::info;

use crate::audio::AudioContext;
use crate::character::{Action, Direction, Npc, NpcKind};
use crate::collision::distance_chebyshev;
use crate::engine::{Engine, Game};
use crate::input::{ActionMap, InputState, KeyCode};
use crate::interact::{
    self, INTERACT_COOLDOWN, PATH_REFRESH_COOLDOWN, cooldown_ready, cooldown_tick,
};
use crate::item::Item;
use crate::player::Player;
use crate::transitions::{self, TransitionCache};
use crate::world::World;
use crate::{FRAME_W, SPRITE_SCALE};

/// Enemies chase when the player is within this many cells (Chebyshev).
pub const CHASE_RADIUS_TILES: i32 = 8;

/// The map the game opens on (the last one loaded).
pub const START_MAP: usize = 2;

/// Logical inputs, bound to physical keys by the engine's action map.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GameAction {
    Left,
    Right,
    Up,
    Down,
    Interact,
}

/// One tick's worth of sampled input, independent of the windowing layer
/// so the simulation can be driven headlessly.
#[derive(Copy, Clone, Debug, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub interact: bool,
}

impl ActionMap<GameAction> {
    /// WASD plus arrows for movement, Space for interact.
    pub fn default_bindings() -> Self {
        let mut map = ActionMap::new();
        map.bind(GameAction::Left, KeyCode::KeyA);
        map.bind(GameAction::Left, KeyCode::ArrowLeft);
        map.bind(GameAction::Right, KeyCode::KeyD);
        map.bind(GameAction::Right, KeyCode::ArrowRight);
        map.bind(GameAction::Up, KeyCode::KeyW);
        map.bind(GameAction::Up, KeyCode::ArrowUp);
        map.bind(GameAction::Down, KeyCode::KeyS);
        map.bind(GameAction::Down, KeyCode::ArrowDown);
        map.bind(GameAction::Interact, KeyCode::Space);
        map
    }

    /// Poll the held keys into one tick's input.
    pub fn sample(&self, input: &InputState) -> TickInput {
        TickInput {
            left: self.is_held(GameAction::Left, input),
            right: self.is_held(GameAction::Right, input),
            up: self.is_held(GameAction::Up, input),
            down: self.is_held(GameAction::Down, input),
            interact: self.is_held(GameAction::Interact, input),
        }
    }
}

pub struct RpgGame {
    pub world: World,
    pub player: Player,
    pub npcs: Vec<Npc>,
    /// Items lying in the world, across all maps.
    pub items: Vec<Item>,
    pub cache: TransitionCache,
    actions: ActionMap<GameAction>,
}

impl RpgGame {
    /// Build the reference world roster on the start map.
    pub fn new(mut world: World) -> Self {
        world.switch_to(START_MAP);
        Self {
            world,
            player: Player::new(500, 800, START_MAP),
            npcs: vec![
                Npc::skeleton(300, 260, START_MAP),
                Npc::villager(700, 230, START_MAP),
            ],
            items: vec![
                Item::heart(400, 100, START_MAP),
                Item::book(500, 500, START_MAP),
                Item::stone(200, 500, START_MAP),
            ],
            cache: TransitionCache::new(),
            actions: ActionMap::default_bindings(),
        }
    }

    /// Advance the simulation one tick: input → movement and barrier
    /// bounce → teleporters → heart conversion and pickups → combat →
    /// NPC pathing → animation.
    pub fn step(&mut self, input: &TickInput, audio: &mut AudioContext) {
        self.apply_input(input);
        self.resolve_teleporters();
        if self.player.character.alive {
            self.player.character.convert_heart_to_health();
            interact::pick_up_items(
                &mut self.player,
                &mut self.items,
                self.world.current_index(),
                audio,
            );
        }
        self.resolve_combat(input, audio);
        self.drive_npcs();
        self.animate();
    }

    /// Sample the held keys into facing/action and apply movement with
    /// barrier resolution. Interact suppresses movement for the tick;
    /// held directions resolve left, right, up, down, first wins.
    fn apply_input(&mut self, input: &TickInput) {
        let ch = &mut self.player.character;
        if !ch.alive {
            return;
        }
        if input.interact {
            ch.action = Action::Interact;
            return;
        }
        ch.action = Action::Walk;

        let direction = if input.left {
            Some(Direction::Left)
        } else if input.right {
            Some(Direction::Right)
        } else if input.up {
            Some(Direction::Up)
        } else if input.down {
            Some(Direction::Down)
        } else {
            None
        };
        let Some(direction) = direction else { return };

        ch.facing = direction;
        let (sx, sy) = direction.signs();
        let (dx, dy) = (sx * ch.speed, sy * ch.speed);
        let map = self.world.current_map();
        transitions::resolve_move(&mut self.cache, map, ch, dx, dy);
    }

    /// Swap maps when the player stands on a teleporter pad, then clear
    /// the per-map caches so the next scan reads the new map.
    fn resolve_teleporters(&mut self) {
        if !self.player.character.alive {
            return;
        }
        let body = self.player.character.bounds();
        let map = self.world.current_map();
        let Some(pad) = self.cache.teleporter_hit(map, body) else {
            return;
        };
        let Some(dest) = transitions::destination(pad) else {
            return;
        };
        let ch = &mut self.player.character;
        let (x, y) = transitions::entry_position(pad, ch.x, ch.y);
        ch.x = x;
        ch.y = y;
        ch.map = dest;
        self.world.switch_to(dest);
        self.cache.clear();
        info!(pad, dest, "map transition");
    }

    /// Player swing (cooldown-gated) and enemy melee.
    fn resolve_combat(&mut self, input: &TickInput, audio: &mut AudioContext) {
        let current = self.world.current_index();
        if self.player.character.alive {
            if input.interact && cooldown_ready(self.player.character.attack_cooldown) {
                interact::player_interact(
                    &mut self.player,
                    &mut self.npcs,
                    &mut self.items,
                    current,
                    audio,
                );
                self.player.character.attack_cooldown = INTERACT_COOLDOWN;
            } else {
                cooldown_tick(&mut self.player.character.attack_cooldown);
            }
        }
        interact::npc_attacks(&mut self.player, &mut self.npcs, &mut self.items, current, audio);
    }

    /// Enemy chase: inside the aggro radius, refresh the path to the
    /// player's cell whenever the refresh cooldown fires, then walk it.
    fn drive_npcs(&mut self) {
        let current = self.world.current_index();
        let cell_px = self.world.current_map().tilewidth as i32 * SPRITE_SCALE;
        let grid = self.world.grid(current);
        let player_alive = self.player.character.alive;
        let player_cell = self.player.character.cell(cell_px);

        for npc in &mut self.npcs {
            if npc.kind != NpcKind::Enemy {
                continue;
            }
            let ch = &mut npc.character;
            if !ch.alive || ch.map != current {
                continue;
            }

            let cell = ch.cell(cell_px);
            let in_range = player_alive
                && distance_chebyshev(cell.0, cell.1, player_cell.0, player_cell.1)
                    <= CHASE_RADIUS_TILES;

            if in_range && cooldown_ready(ch.path_cooldown) {
                ch.path = grid
                    .find_path(cell, player_cell)
                    .map(|path| path.into_iter().skip(1).collect())
                    .unwrap_or_default();
                ch.path_cooldown = PATH_REFRESH_COOLDOWN;
            } else {
                cooldown_tick(&mut ch.path_cooldown);
            }
            if in_range {
                ch.follow_path(cell_px);
            }
        }
    }

    /// Frame state machines tick every update for everything on the
    /// current map, moving or not.
    fn animate(&mut self) {
        let current = self.world.current_index();
        if self.player.character.alive {
            self.player.character.animate();
        }
        for npc in &mut self.npcs {
            if npc.character.alive && npc.character.map == current {
                npc.character.animate();
            }
        }
        for item in &mut self.items {
            if item.map == current {
                item.animate();
            }
        }
    }
}

impl Game for RpgGame {
    fn on_enter(&mut self, engine: &mut Engine) {
        for index in 0..self.world.len() {
            let map = self.world.map(index);
            let lookup = self.world.lookup(index);
            if let Err(e) = engine.renderer.load_map_atlas(map, lookup) {
                tracing::error!(error = %e, index, "failed to bake map atlas");
                std::process::exit(1);
            }
        }
    }

    fn update(&mut self, engine: &mut Engine) {
        let input = self.actions.sample(&engine.input);
        self.step(&input, &mut engine.audio);
    }

    fn render(&mut self, engine: &mut Engine) {
        let current = self.world.current_index();
        engine.set_map(current);

        let map = self.world.current_map();
        let tile_w = map.tilewidth as i32 * SPRITE_SCALE;
        let tile_h = map.tileheight as i32 * SPRITE_SCALE;
        for layer in 0..map.layers.len() {
            for row in 0..map.height as i32 {
                for col in 0..map.width as i32 {
                    if let Some(id) = map.tile_id_at(layer, col, row) {
                        engine.draw_tile(col * tile_w, row * tile_h, id);
                    }
                }
            }
        }

        for item in &self.items {
            if item.map == current {
                engine.draw_frame(
                    item.x,
                    item.y - item.bob,
                    &item.name.to_ascii_lowercase(),
                    0,
                    false,
                );
            }
        }
        for npc in &self.npcs {
            let ch = &npc.character;
            if ch.alive && ch.map == current {
                engine.draw_frame(ch.x, ch.y, &ch.name, ch.frame, ch.facing == Direction::Left);
            }
        }
        let ch = &self.player.character;
        if ch.alive {
            engine.draw_frame(ch.x, ch.y, &ch.name, ch.frame, ch.facing == Direction::Left);
        }

        // HUD: one heart icon per hit point, pinned to the top-left.
        for hp in 0..ch.hp.max(0) {
            engine.draw_frame(8 + hp * (FRAME_W * SPRITE_SCALE + 4), 8, "heart", 0, false);
        }
    }
}
