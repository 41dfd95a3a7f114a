//! Generates placeholder art, the shared tileset, and sound cues so the
//! game runs out of the box.  Real assets dropped into `resources/` are
//! never overwritten — everything here is save-if-missing.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use image::{Rgba, RgbaImage};

const FRAME: u32 = 16;
const WALK_FRAMES: u32 = 8;

fn draw_bordered_rect(width: u32, height: u32, fill: [u8; 4], border: [u8; 4]) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let on_border = x == 0 || x == width - 1 || y == 0 || y == height - 1;
            img.put_pixel(x, y, Rgba(if on_border { border } else { fill }));
        }
    }
    img
}

/// A walk sheet: WALK_FRAMES frames of FRAME x FRAME laid out horizontally.
/// Each frame gets a bobbing eye row so the frames are visually distinct.
fn draw_character_sheet(body: [u8; 4], border: [u8; 4]) -> RgbaImage {
    let mut sheet = RgbaImage::new(FRAME * WALK_FRAMES, FRAME);
    let eye = Rgba([0x10, 0x10, 0x10, 0xFF]);
    for frame in 0..WALK_FRAMES {
        let cell = draw_bordered_rect(FRAME, FRAME, body, border);
        let x0 = frame * FRAME;
        for (x, y, px) in cell.enumerate_pixels() {
            sheet.put_pixel(x0 + x, y, *px);
        }
        // Eyes bob one pixel on odd frames; the interact frames (4..8) get
        // a raised-arm pixel column instead.
        let ey = FRAME / 3 + (frame % 2);
        sheet.put_pixel(x0 + FRAME / 4, ey, eye);
        sheet.put_pixel(x0 + 3 * FRAME / 4, ey, eye);
        if frame >= 4 {
            let arm = Rgba(border);
            for y in 1..(FRAME / 2) {
                sheet.put_pixel(x0 + FRAME - 2, y, arm);
            }
        }
    }
    sheet
}

fn draw_item(fill: [u8; 4], border: [u8; 4]) -> RgbaImage {
    let mut img = RgbaImage::new(FRAME, FRAME);
    // Diamond silhouette so items read differently from characters.
    let c = (FRAME / 2) as i32;
    for y in 0..FRAME {
        for x in 0..FRAME {
            let d = (x as i32 - c).abs() + (y as i32 - c).abs();
            if d < c {
                img.put_pixel(x, y, Rgba(fill));
            } else if d == c {
                img.put_pixel(x, y, Rgba(border));
            }
        }
    }
    img
}

/// The shared tileset, one row of eight 16x16 tiles:
/// grass, pad 1, pad 2, pad 3, water, rock, dirt, flower.
fn draw_tileset() -> RgbaImage {
    let fills: [[u8; 4]; 8] = [
        [0x4C, 0x8C, 0x3A, 0xFF], // grass
        [0xE0, 0xC0, 0x40, 0xFF], // teleporter pad 1
        [0xE0, 0x80, 0x40, 0xFF], // teleporter pad 2
        [0xA0, 0x50, 0xD0, 0xFF], // teleporter pad 3
        [0x2A, 0x55, 0xB0, 0xFF], // water
        [0x6E, 0x6E, 0x6E, 0xFF], // rock
        [0x8A, 0x5A, 0x2A, 0xFF], // dirt
        [0x4C, 0x8C, 0x3A, 0xFF], // flower (grass base + petals)
    ];
    let mut sheet = RgbaImage::new(FRAME * 8, FRAME);
    for (i, fill) in fills.iter().enumerate() {
        let x0 = i as u32 * FRAME;
        for y in 0..FRAME {
            for x in 0..FRAME {
                sheet.put_pixel(x0 + x, y, Rgba(*fill));
            }
        }
        match i {
            // Teleporter pads get a concentric ring.
            1..=3 => {
                let ring = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
                for t in 4..(FRAME - 4) {
                    sheet.put_pixel(x0 + t, 4, ring);
                    sheet.put_pixel(x0 + t, FRAME - 5, ring);
                    sheet.put_pixel(x0 + 4, t, ring);
                    sheet.put_pixel(x0 + FRAME - 5, t, ring);
                }
            }
            // Water gets wave lines, rock gets cracks, flower gets petals.
            4 => {
                let wave = Rgba([0x5A, 0x85, 0xE0, 0xFF]);
                for x in 0..FRAME {
                    sheet.put_pixel(x0 + x, 5 + (x % 2), wave);
                    sheet.put_pixel(x0 + x, 11 + (x % 2), wave);
                }
            }
            5 => {
                let crack = Rgba([0x44, 0x44, 0x44, 0xFF]);
                for t in 2..(FRAME - 2) {
                    sheet.put_pixel(x0 + t, t, crack);
                }
            }
            7 => {
                let petal = Rgba([0xE8, 0x60, 0x90, 0xFF]);
                for (px, py) in [(7, 6), (9, 6), (8, 7), (7, 8), (9, 8)] {
                    sheet.put_pixel(x0 + px, py, petal);
                }
            }
            _ => {}
        }
    }
    sheet
}

/// Write a mono 16-bit 44.1 kHz WAV containing a decaying sine tone.
fn write_sine_wav(path: &str, freq: f32, secs: f32) -> std::io::Result<()> {
    const RATE: u32 = 44_100;
    let samples = (RATE as f32 * secs) as u32;
    let data_len = samples * 2;

    let mut f = File::create(path)?;
    f.write_all(b"RIFF")?;
    f.write_all(&(36 + data_len).to_le_bytes())?;
    f.write_all(b"WAVE")?;
    f.write_all(b"fmt ")?;
    f.write_all(&16u32.to_le_bytes())?;
    f.write_all(&1u16.to_le_bytes())?; // PCM
    f.write_all(&1u16.to_le_bytes())?; // mono
    f.write_all(&RATE.to_le_bytes())?;
    f.write_all(&(RATE * 2).to_le_bytes())?; // byte rate
    f.write_all(&2u16.to_le_bytes())?; // block align
    f.write_all(&16u16.to_le_bytes())?; // bits per sample
    f.write_all(b"data")?;
    f.write_all(&data_len.to_le_bytes())?;

    let mut pcm = Vec::with_capacity(data_len as usize);
    for i in 0..samples {
        let t = i as f32 / RATE as f32;
        let envelope = 1.0 - t / secs;
        let sample = (t * freq * std::f32::consts::TAU).sin() * envelope * 0.4;
        pcm.extend_from_slice(&((sample * i16::MAX as f32) as i16).to_le_bytes());
    }
    f.write_all(&pcm)
}

fn save_if_missing(path: &str, img: RgbaImage) {
    if !Path::new(path).exists() {
        img.save(path).unwrap_or_else(|e| eprintln!("build: could not save {path}: {e}"));
    }
}

fn sound_if_missing(path: &str, freq: f32, secs: f32) {
    if !Path::new(path).exists() {
        write_sine_wav(path, freq, secs)
            .unwrap_or_else(|e| eprintln!("build: could not write {path}: {e}"));
    }
}

fn main() {
    for dir in ["resources/sprites", "resources/maps", "resources/sounds"] {
        std::fs::create_dir_all(dir).unwrap_or_else(|e| panic!("build: failed to create {dir}: {e}"));
    }

    save_if_missing(
        "resources/sprites/player.png",
        draw_character_sheet([0xF5, 0xD0, 0x30, 0xFF], [0x80, 0x60, 0x00, 0xFF]),
    );
    save_if_missing(
        "resources/sprites/skeleton.png",
        draw_character_sheet([0xD8, 0xD8, 0xC8, 0xFF], [0x55, 0x55, 0x50, 0xFF]),
    );
    save_if_missing(
        "resources/sprites/villager.png",
        draw_character_sheet([0x70, 0xA8, 0xD8, 0xFF], [0x20, 0x40, 0x60, 0xFF]),
    );

    save_if_missing(
        "resources/sprites/heart.png",
        draw_item([0xE0, 0x30, 0x50, 0xFF], [0x70, 0x10, 0x20, 0xFF]),
    );
    save_if_missing(
        "resources/sprites/book.png",
        draw_item([0x40, 0x60, 0xC0, 0xFF], [0x18, 0x28, 0x58, 0xFF]),
    );
    save_if_missing(
        "resources/sprites/stone.png",
        draw_item([0x9A, 0x9A, 0x9A, 0xFF], [0x48, 0x48, 0x48, 0xFF]),
    );

    save_if_missing("resources/maps/tileset.png", draw_tileset());

    sound_if_missing("resources/sounds/enemy_death.wav", 140.0, 0.25);
    sound_if_missing("resources/sounds/dialogue.wav", 520.0, 0.12);
    sound_if_missing("resources/sounds/quest_reward.wav", 880.0, 0.30);
    sound_if_missing("resources/sounds/pickup.wav", 660.0, 0.10);

    println!("cargo:rerun-if-changed=build.rs");
}
