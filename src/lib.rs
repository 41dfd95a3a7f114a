//! Tilequest — a small top-down tile RPG.
//!
//! Simulation modules (`world`, `character`, `interact`, `transitions`,
//! `game`) are headless and tick-driven; the platform glue (`engine`,
//! `renderer`, `input`, `audio`) wires them to winit/wgpu/kira.

pub mod audio;
pub mod character;
pub mod collision;
pub mod engine;
pub mod game;
pub mod input;
pub mod interact;
pub mod item;
pub mod pathfinding;
pub mod player;
pub mod renderer;
pub mod tilemap;
pub mod transitions;
pub mod world;

/// World/display scale factor. Source art is 16 px; everything on screen
/// and in the collision space is scaled by this.
pub const SPRITE_SCALE: i32 = 2;

/// Source sprite frame size in pixels (pre-scale).
pub const FRAME_W: i32 = 16;
pub const FRAME_H: i32 = 16;

pub const WINDOW_WIDTH: i32 = 1000;
pub const WINDOW_HEIGHT: i32 = 1000;

/// Fixed simulation rate.
pub const TARGET_UPS: u32 = 60;
