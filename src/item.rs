//! World items: pickups lying on a map, or entries in an inventory.
//!
//! An item's display name is its identity; the two quest-relevant items
//! (Heart and Book) are named singletons whose constructors stamp a fresh
//! position and map on every drop.

use crate::collision::Rect;
use crate::{FRAME_H, FRAME_W, SPRITE_SCALE};

/// Healing pickup; converts to one hit point on a later tick.
pub const HEART: &str = "Heart";
/// Quest-required pickup; handed to the quest giver.
pub const BOOK: &str = "Book";
/// Inert pickup carried by skeletons.
pub const STONE: &str = "Stone";

/// Ticks between bob offset steps.
const BOB_TICKS: u32 = 6;
/// Bob offset wraps back to 0 above this.
const BOB_MAX: i32 = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub name: String,
    pub x: i32,
    pub y: i32,
    /// Vertical hover offset in world pixels, 0..=BOB_MAX.
    pub bob: i32,
    bob_delay: u32,
    /// Index of the owning map in the world registry.
    pub map: usize,
}

impl Item {
    pub fn new(name: &str, x: i32, y: i32, map: usize) -> Self {
        Self { name: name.to_string(), x, y, bob: 0, bob_delay: 0, map }
    }

    pub fn heart(x: i32, y: i32, map: usize) -> Self {
        Self::new(HEART, x, y, map)
    }

    pub fn book(x: i32, y: i32, map: usize) -> Self {
        Self::new(BOOK, x, y, map)
    }

    pub fn stone(x: i32, y: i32, map: usize) -> Self {
        Self::new(STONE, x, y, map)
    }

    /// Pickup hitbox: the scaled sprite frame, ignoring the bob offset.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, FRAME_W * SPRITE_SCALE, FRAME_H * SPRITE_SCALE)
    }

    /// Advance the hover animation one tick.
    pub fn animate(&mut self) {
        self.bob_delay = self.bob_delay.wrapping_add(1);
        if self.bob_delay % BOB_TICKS == 0 {
            self.bob += 1;
            if self.bob > BOB_MAX {
                self.bob = 0;
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_scaled_frame_size() {
        let item = Item::heart(400, 100, 0);
        assert_eq!(item.bounds(), Rect::new(400, 100, 32, 32));
    }

    #[test]
    fn bob_steps_every_sixth_tick_and_wraps() {
        let mut item = Item::stone(0, 0, 0);
        let mut seen = Vec::new();
        for _ in 0..(BOB_TICKS as usize * 8) {
            item.animate();
            seen.push(item.bob);
        }
        // First five ticks hold 0, then the offset steps once per period.
        assert_eq!(&seen[..6], &[0, 0, 0, 0, 0, 1]);
        assert!(seen.iter().all(|&b| (0..=BOB_MAX).contains(&b)));
        // After BOB_MAX + 1 steps the offset has wrapped to 0.
        assert_eq!(seen[(BOB_TICKS as usize * 6) - 1], 0);
    }

    #[test]
    fn bob_never_moves_the_hitbox() {
        let mut item = Item::book(500, 500, 0);
        let before = item.bounds();
        for _ in 0..40 {
            item.animate();
        }
        assert_eq!(item.bounds(), before);
    }
}
