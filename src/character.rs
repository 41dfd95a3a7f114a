//! Characters: the shared attribute bag and behavior for the player and
//! every NPC — animation state machine, inventory, hitbox, death.

use std::collections::VecDeque;

use tracing::info;

use crate::audio::{AudioContext, SoundConfig};
use crate::collision::Rect;
use crate::item::{self, Item};
use crate::{FRAME_H, FRAME_W, SPRITE_SCALE};

/// Walk cycle length; frames 0..WALK_FRAME_COUNT.
pub const WALK_FRAME_COUNT: u32 = 4;
/// Ticks between animation frame advances.
pub const FRAME_TICKS: u32 = 8;
/// The interact cycle re-arms to this frame.
pub const INTERACT_FRAME_TOP: u32 = 7;
/// Decrementing at or below this frame re-arms the cycle.
pub const INTERACT_FRAME_FLOOR: u32 = 4;

/// Offset from a dead character to each dropped inventory item.
pub const DROP_OFFSET: i32 = 40;
/// Offset to the bonus heart every death leaves behind.
pub const HEART_DROP_OFFSET: i32 = 20;

/// Parked position for dead characters, far outside any map.
pub const DEAD_POSITION: (i32, i32) = (-100, -100);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// Unit displacement sign on (x, y) for one step in this direction.
    pub fn signs(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Walk,
    Interact,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NpcKind {
    /// Paths toward the player and attacks on contact.
    Enemy,
    /// Static dialogue target; interactions advance the quest.
    QuestGiver,
}

#[derive(Clone, Debug)]
pub struct Character {
    /// Identity and sprite-sheet key ("player", "skeleton", "villager").
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub frame: u32,
    frame_delay: u32,
    pub facing: Direction,
    pub action: Action,
    pub hp: i32,
    pub speed: i32,
    pub power: i32,
    pub inventory: Vec<Item>,
    /// Counts down each tick; ready below zero. See `interact::cooldown_ready`.
    pub attack_cooldown: i32,
    pub path_cooldown: i32,
    /// Remaining waypoints toward the current path goal, in grid cells.
    pub path: VecDeque<(i32, i32)>,
    /// Index of the owning map in the world registry.
    pub map: usize,
    pub alive: bool,
}

impl Character {
    pub fn new(name: &str, x: i32, y: i32, map: usize, hp: i32, speed: i32, power: i32) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            frame: 0,
            frame_delay: 0,
            facing: Direction::Down,
            action: Action::Walk,
            hp,
            speed,
            power,
            inventory: Vec::new(),
            attack_cooldown: 0,
            path_cooldown: 0,
            path: VecDeque::new(),
            map,
            alive: true,
        }
    }

    /// Body hitbox: the scaled sprite frame, independent of the current
    /// animation frame.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, FRAME_W * SPRITE_SCALE, FRAME_H * SPRITE_SCALE)
    }

    /// Grid cell the character's origin sits in, for `cell_px`-sized cells.
    pub fn cell(&self, cell_px: i32) -> (i32, i32) {
        (self.x.div_euclid(cell_px), self.y.div_euclid(cell_px))
    }

    // ── Animation ──────────────────────────────────────────────────────

    /// Advance the frame state machine one tick. Runs every update whether
    /// or not the character moved.
    ///
    /// Walk cycles 0..=3 forward; Interact runs 7,6,5 backward through the
    /// wind-up sub-range and re-arms at the bottom. Entering Interact from
    /// a walk frame pins to the top of the sub-range immediately.
    pub fn animate(&mut self) {
        self.frame_delay = self.frame_delay.wrapping_add(1);
        match self.action {
            Action::Walk => {
                if self.frame_delay % FRAME_TICKS == 0 {
                    self.frame = (self.frame + 1) % WALK_FRAME_COUNT;
                }
            }
            Action::Interact => {
                if !(INTERACT_FRAME_FLOOR..=INTERACT_FRAME_TOP).contains(&self.frame) {
                    self.frame = INTERACT_FRAME_TOP;
                } else if self.frame_delay % FRAME_TICKS == 0 {
                    self.frame -= 1;
                    if self.frame <= INTERACT_FRAME_FLOOR {
                        self.frame = INTERACT_FRAME_TOP;
                    }
                }
            }
        }
    }

    // ── Inventory ──────────────────────────────────────────────────────

    /// First inventory slot holding an item with this name.
    pub fn item_index(&self, name: &str) -> Option<usize> {
        self.inventory.iter().position(|item| item.name == name)
    }

    /// Remove one slot, preserving the relative order of the rest.
    pub fn remove_at(&mut self, index: usize) {
        if index < self.inventory.len() {
            self.inventory.remove(index);
        }
    }

    /// Convert the first carried Heart into one hit point. No-op when no
    /// Heart is carried; reports whether a conversion happened.
    pub fn convert_heart_to_health(&mut self) -> bool {
        match self.item_index(item::HEART) {
            Some(index) => {
                self.hp += 1;
                self.remove_at(index);
                true
            }
            None => false,
        }
    }

    // ── Pathing ────────────────────────────────────────────────────────

    /// Walk toward the next waypoint, one axis at a time, popping waypoints
    /// as their cell origin is reached. Horizontal movement flips the
    /// facing; vertical movement keeps it.
    pub fn follow_path(&mut self, cell_px: i32) {
        let Some(&(cx, cy)) = self.path.front() else {
            return;
        };
        let (tx, ty) = (cx * cell_px, cy * cell_px);
        if self.x != tx {
            let step = (tx - self.x).clamp(-self.speed, self.speed);
            self.x += step;
            self.facing = if step < 0 { Direction::Left } else { Direction::Right };
        } else if self.y != ty {
            self.y += (ty - self.y).clamp(-self.speed, self.speed);
        } else {
            self.path.pop_front();
        }
    }

    // ── Death ──────────────────────────────────────────────────────────

    /// Kill this character: every carried item drops at +40/+40, a bonus
    /// Heart drops at +20/+20, and the body parks off-map with `alive`
    /// cleared so later spatial checks skip it. Fires the death cue.
    ///
    /// Callers gate on `alive`, so death fires exactly once per character.
    pub fn die(&mut self, world_items: &mut Vec<Item>, audio: &mut AudioContext) {
        let (x, y) = (self.x, self.y);
        for mut item in self.inventory.drain(..) {
            item.x = x + DROP_OFFSET;
            item.y = y + DROP_OFFSET;
            item.map = self.map;
            world_items.push(item);
        }
        world_items.push(Item::heart(x + HEART_DROP_OFFSET, y + HEART_DROP_OFFSET, self.map));

        let (dx, dy) = DEAD_POSITION;
        self.x = dx;
        self.y = dy;
        self.alive = false;
        info!(name = %self.name, map = self.map, "character died");
        audio.play("enemy_death", SoundConfig::default());
    }
}

/// A non-player character: a Character plus its behavioral kind.
#[derive(Clone, Debug)]
pub struct Npc {
    pub character: Character,
    pub kind: NpcKind,
}

/// Enemy walk speed in pixels per tick.
pub const NPC_SPEED: i32 = 2;

impl Npc {
    /// The standard enemy: 3 HP, power 1, carries one Stone.
    pub fn skeleton(x: i32, y: i32, map: usize) -> Self {
        let mut character = Character::new("skeleton", x, y, map, 3, NPC_SPEED, 1);
        character.inventory.push(Item::stone(x, y, map));
        Self { character, kind: NpcKind::Enemy }
    }

    /// The quest giver. Never targeted by damage.
    pub fn villager(x: i32, y: i32, map: usize) -> Self {
        Self {
            character: Character::new("villager", x, y, map, 1, 0, 0),
            kind: NpcKind::QuestGiver,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
