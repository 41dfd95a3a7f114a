//! The player: a Character plus quest progress, and the directional reach
//! rectangle used for melee/interact range.

use crate::character::{Character, Direction};
use crate::collision::Rect;
use crate::{FRAME_H, FRAME_W, SPRITE_SCALE};

pub const PLAYER_SPEED: i32 = 3;
pub const PLAYER_HP: i32 = 5;
pub const PLAYER_POWER: i32 = 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuestProgress {
    NotTalked,
    Talked,
    ReturnedItem,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub character: Character,
    pub quest: QuestProgress,
}

impl Player {
    pub fn new(x: i32, y: i32, map: usize) -> Self {
        Self {
            character: Character::new("player", x, y, map, PLAYER_HP, PLAYER_SPEED, PLAYER_POWER),
            quest: QuestProgress::NotTalked,
        }
    }

    /// Melee/interact range rectangle for the current facing, recomputed on
    /// every attempt.
    ///
    /// The four formulas are deliberately asymmetric: Up reaches 48 px
    /// while Down reaches 16, and Left/Right use the unscaled frame height.
    /// These extents are tuned for feel; do not square them up.
    pub fn reach_rect(&self) -> Rect {
        let (x, y) = (self.character.x, self.character.y);
        let s = SPRITE_SCALE;
        match self.character.facing {
            Direction::Down => {
                Rect::from_corners(x, y + FRAME_H * s, x + FRAME_W * s, y + FRAME_H * s + FRAME_W)
            }
            Direction::Right => {
                Rect::from_corners(x + FRAME_W * s, y, x + FRAME_W * s * 2, y + FRAME_H)
            }
            Direction::Up => Rect::from_corners(x, y, x + FRAME_W * s, y - FRAME_W * s - FRAME_W),
            Direction::Left => Rect::from_corners(x - FRAME_W * s, y, x, y + FRAME_H),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
