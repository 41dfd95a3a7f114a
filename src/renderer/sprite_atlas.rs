use std::collections::{HashMap, HashSet};

use image::RgbaImage;
use tracing::warn;
use wgpu::util::DeviceExt;

use crate::{FRAME_H, FRAME_W};

// ── SheetData ────────────────────────────────────────────────────────────────

/// Per-frame UV rectangles for one named sprite sheet.  Frames are fixed-size
/// cells read row-major from the source image.
#[derive(Clone, Debug)]
pub struct SheetData {
    pub frames: Vec<([f32; 2], [f32; 2])>,
}

// ── Shelf packing (pure, GPU-free) ───────────────────────────────────────────

/// One sheet's position inside the packed atlas.
#[derive(Debug, PartialEq)]
pub(crate) struct PlacedSheet {
    pub name: String,
    /// Top-left pixel coordinate inside the atlas.
    pub atlas_x: u32,
    pub atlas_y: u32,
    /// Pixel dimensions of this sheet.
    pub pixel_w: u32,
    pub pixel_h: u32,
}

/// Pure shelf-packing algorithm — no I/O, no GPU.
///
/// `items` is a slice of `(name, pixel_w, pixel_h)`.  Duplicate names are
/// skipped (only the first occurrence is packed).  Sheets wider than
/// `max_width` are skipped with a warning.
///
/// Returns `(placements, atlas_pixel_width, atlas_pixel_height)`.  Both
/// atlas dimensions are rounded up to the next power of two.
pub(crate) fn pack(items: &[(String, u32, u32)], max_width: u32) -> (Vec<PlacedSheet>, u32, u32) {
    // Sort by height descending for better shelf utilisation.
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[b].2.cmp(&items[a].2));

    let mut placed_names: HashSet<&str> = HashSet::new();
    let mut placements: Vec<PlacedSheet> = Vec::new();
    let mut cur_x = 0u32;
    let mut cur_y = 0u32;
    let mut row_h = 0u32;

    for &i in &order {
        let (ref name, w, h) = items[i];

        // Skip duplicates — only the first (tallest-sorted) occurrence is placed.
        if !placed_names.insert(name.as_str()) {
            continue;
        }

        if w > max_width {
            warn!(name, width = w, max_width, "sheet wider than atlas, skipping");
            continue;
        }

        if cur_x + w > max_width {
            // Start a new shelf.
            cur_y += row_h;
            cur_x = 0;
            row_h = 0;
        }

        placements.push(PlacedSheet {
            name: name.clone(),
            atlas_x: cur_x,
            atlas_y: cur_y,
            pixel_w: w,
            pixel_h: h,
        });
        cur_x += w;
        row_h = row_h.max(h);
    }

    let used_h = cur_y + row_h;
    let atlas_h = used_h.next_power_of_two().max(1);
    let atlas_w = max_width.next_power_of_two();
    (placements, atlas_w, atlas_h)
}

/// Slice a placed sheet into fixed-size frame UV rectangles, row-major.
/// A sheet smaller than one frame cell yields no frames.
pub(crate) fn slice_frames(
    placement: &PlacedSheet,
    atlas_w: u32,
    atlas_h: u32,
    frame_w: u32,
    frame_h: u32,
) -> Vec<([f32; 2], [f32; 2])> {
    let cols = placement.pixel_w / frame_w;
    let rows = placement.pixel_h / frame_h;
    let mut frames = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let px = placement.atlas_x + col * frame_w;
            let py = placement.atlas_y + row * frame_h;
            let uv_min = [px as f32 / atlas_w as f32, py as f32 / atlas_h as f32];
            let uv_max = [
                (px + frame_w) as f32 / atlas_w as f32,
                (py + frame_h) as f32 / atlas_h as f32,
            ];
            frames.push((uv_min, uv_max));
        }
    }
    frames
}

// ── GPU upload ───────────────────────────────────────────────────────────────

/// Upload an RGBA image as a nearest-filtered texture.  Shared by the sprite
/// atlas and the per-map tile atlases.
pub(crate) fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    img: &RgbaImage,
) -> (wgpu::TextureView, wgpu::Sampler) {
    let (w, h) = img.dimensions();
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("atlas_tex"),
            size: wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        img.as_raw(),
    );
    let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });
    (texture_view, sampler)
}

// ── SpriteAtlas ──────────────────────────────────────────────────────────────

pub struct SpriteAtlas {
    pub sheets: HashMap<String, SheetData>,
    pub texture_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl SpriteAtlas {
    /// Maximum row width of the packed atlas texture in pixels.
    const ATLAS_WIDTH: u32 = 512;

    /// Scan `path` recursively for `.png` files, pack them with a shelf
    /// algorithm, slice each into frames, upload to the GPU, and return a
    /// ready-to-use atlas.
    ///
    /// Duplicate file-stem names are deduplicated at load time so that the
    /// pixel dimensions stored in each placement always match the image
    /// that will be copied at bake time.
    pub fn load_folder(device: &wgpu::Device, queue: &wgpu::Queue, path: &str) -> Self {
        // ── 1. Discover and load PNG files ───────────────────────────────
        let mut loaded: Vec<(String, image::DynamicImage)> = Vec::new();
        let mut seen_names: HashSet<String> = HashSet::new();

        for entry in walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let file_path = entry.path();
            if file_path.extension().and_then(|s| s.to_str()) != Some("png") {
                continue;
            }
            let name = match file_path.file_stem().and_then(|s| s.to_str()) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };

            // Deduplicate: only the first file with a given stem name is used.
            if !seen_names.insert(name.clone()) {
                warn!(name, path = %file_path.display(), "duplicate sheet name, skipping");
                continue;
            }

            match image::open(file_path) {
                Ok(img) => loaded.push((name, img)),
                Err(e) => warn!(path = %file_path.display(), error = %e, "failed to load sheet"),
            }
        }

        if loaded.is_empty() {
            return Self::empty(device, queue);
        }

        // ── 2. Pack (pure, no GPU) ─────────────────────────────────────
        let dims: Vec<(String, u32, u32)> = loaded
            .iter()
            .map(|(name, img)| (name.clone(), img.width(), img.height()))
            .collect();

        let (placements, atlas_w, atlas_h) = pack(&dims, Self::ATLAS_WIDTH);

        // ── 3. Composite into a single RGBA image ─────────────────────
        let mut atlas_img = RgbaImage::new(atlas_w, atlas_h);

        let img_lookup: HashMap<&str, &image::DynamicImage> =
            loaded.iter().map(|(n, i)| (n.as_str(), i)).collect();

        let mut sheets = HashMap::new();

        for p in &placements {
            // img_lookup always matches p.name because loaded is deduplicated.
            let Some(img) = img_lookup.get(p.name.as_str()) else { continue };
            let rgba = img.to_rgba8();

            for dy in 0..p.pixel_h {
                for dx in 0..p.pixel_w {
                    atlas_img.put_pixel(p.atlas_x + dx, p.atlas_y + dy, *rgba.get_pixel(dx, dy));
                }
            }

            let frames = slice_frames(p, atlas_w, atlas_h, FRAME_W as u32, FRAME_H as u32);
            if frames.is_empty() {
                warn!(name = %p.name, w = p.pixel_w, h = p.pixel_h, "sheet smaller than one frame");
                continue;
            }
            sheets.insert(p.name.clone(), SheetData { frames });
        }

        // ── 4. Upload to GPU ──────────────────────────────────────────
        let (texture_view, sampler) = upload_rgba(device, queue, &atlas_img);
        Self { sheets, texture_view, sampler }
    }

    /// Create a 1×1 transparent atlas when no sheets are available.
    fn empty(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let img = RgbaImage::new(1, 1);
        let (texture_view, sampler) = upload_rgba(device, queue, &img);
        Self { sheets: HashMap::new(), texture_view, sampler }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // Helper: build an item tuple.
    fn item(name: &str, w: u32, h: u32) -> (String, u32, u32) {
        (name.to_string(), w, h)
    }

    // ── pack() correctness ────────────────────────────────────────────────

    #[test]
    fn pack_empty_input_returns_no_placements() {
        let (placements, atlas_w, atlas_h) = pack(&[], 512);
        assert!(placements.is_empty());
        // Atlas height rounds 0 → next_power_of_two(0).max(1) = 1.
        assert_eq!(atlas_h, 1);
        assert_eq!(atlas_w, 512);
    }

    #[test]
    fn pack_single_sheet_placed_at_origin() {
        let items = [item("player", 128, 16)];
        let (pl, _, _) = pack(&items, 512);
        assert_eq!(pl.len(), 1);
        assert_eq!(pl[0].atlas_x, 0);
        assert_eq!(pl[0].atlas_y, 0);
        assert_eq!(pl[0].pixel_w, 128);
        assert_eq!(pl[0].pixel_h, 16);
    }

    #[test]
    fn pack_two_sheets_on_same_shelf() {
        // Both fit side-by-side within ATLAS_WIDTH.
        let items = [item("a", 128, 16), item("b", 128, 16)];
        let (pl, _, _) = pack(&items, 512);
        assert_eq!(pl.len(), 2);
        // One is at x=0, the other at x=128 (order may differ due to height sort).
        let xs: Vec<u32> = pl.iter().map(|p| p.atlas_x).collect();
        assert!(xs.contains(&0) && xs.contains(&128));
        // Both on the same row (y=0).
        assert!(pl.iter().all(|p| p.atlas_y == 0));
    }

    #[test]
    fn pack_wraps_to_next_shelf_when_row_full() {
        // Three 200px-wide sheets; the third won't fit in a 512px row.
        let items = [item("a", 200, 32), item("b", 200, 32), item("c", 200, 32)];
        let (pl, _, _) = pack(&items, 512);
        assert_eq!(pl.len(), 3);
        let row0: Vec<_> = pl.iter().filter(|p| p.atlas_y == 0).collect();
        let row1: Vec<_> = pl.iter().filter(|p| p.atlas_y > 0).collect();
        assert_eq!(row0.len(), 2, "first two sheets fit on row 0");
        assert_eq!(row1.len(), 1, "third sheet wraps to row 1");
        assert_eq!(row1[0].atlas_y, 32, "row 1 starts at y = row-0 height");
    }

    #[test]
    fn pack_sorts_taller_sheets_first() {
        // The tall sheet should appear on row 0 even though it was listed last.
        let items = [item("small", 32, 16), item("tall", 32, 64)];
        let (pl, _, _) = pack(&items, 512);
        let tall = pl.iter().find(|p| p.name == "tall").unwrap();
        let small = pl.iter().find(|p| p.name == "small").unwrap();
        assert_eq!(tall.atlas_y, 0, "tallest sheet always placed first");
        assert_eq!(small.atlas_y, 0, "shorter sheet shares the same shelf");
        // Tall is to the left of small (placed first).
        assert!(tall.atlas_x < small.atlas_x);
    }

    #[test]
    fn pack_skips_sheet_wider_than_atlas() {
        let items = [item("giant", 600, 48), item("normal", 16, 24)];
        let (pl, _, _) = pack(&items, 512);
        assert_eq!(pl.len(), 1, "oversized sheet is excluded");
        assert_eq!(pl[0].name, "normal");
    }

    #[test]
    fn pack_dedup_only_places_first_occurrence_of_name() {
        let items = [item("player", 16, 24), item("player", 64, 64)];
        let (pl, _, _) = pack(&items, 512);
        assert_eq!(pl.len(), 1, "duplicate name produces only one placement");
        // The 64x64 is taller so it is sorted first and placed; the 16x24 is
        // the duplicate and is dropped.
        assert_eq!(pl[0].pixel_w, 64);
        assert_eq!(pl[0].pixel_h, 64);
    }

    #[test]
    fn pack_atlas_dimensions_are_powers_of_two() {
        let items = [item("a", 10, 10), item("b", 16, 24)];
        let (_, atlas_w, atlas_h) = pack(&items, 100);
        assert!(atlas_w.is_power_of_two(), "atlas_w={atlas_w} must be a power of two");
        assert!(atlas_h.is_power_of_two(), "atlas_h={atlas_h} must be a power of two");
    }

    #[test]
    fn pack_no_placement_overflows_atlas() {
        let items: Vec<_> = (0..10).map(|i| item(&format!("s{i}"), 40, 20)).collect();
        let (pl, atlas_w, atlas_h) = pack(&items, 256);
        for p in &pl {
            assert!(
                p.atlas_x + p.pixel_w <= atlas_w,
                "sheet '{}' overflows atlas x: {}+{} > {atlas_w}",
                p.name, p.atlas_x, p.pixel_w
            );
            assert!(
                p.atlas_y + p.pixel_h <= atlas_h,
                "sheet '{}' overflows atlas y: {}+{} > {atlas_h}",
                p.name, p.atlas_y, p.pixel_h
            );
        }
    }

    // ── Frame slicing ─────────────────────────────────────────────────────

    fn placement(x: u32, y: u32, w: u32, h: u32) -> PlacedSheet {
        PlacedSheet { name: "s".into(), atlas_x: x, atlas_y: y, pixel_w: w, pixel_h: h }
    }

    #[test]
    fn slice_eight_frame_walk_sheet() {
        // A 128x16 sheet of 16x16 frames has 8 frames on one row.
        let p = placement(0, 0, 128, 16);
        let frames = slice_frames(&p, 512, 16, 16, 16);
        assert_eq!(frames.len(), 8);
        // First frame spans [0, 16/512) in u; frame 7 starts at 112/512.
        assert_eq!(frames[0].0, [0.0, 0.0]);
        assert_eq!(frames[0].1[0], 16.0 / 512.0);
        assert_eq!(frames[7].0[0], 112.0 / 512.0);
    }

    #[test]
    fn slice_respects_placement_offset() {
        let p = placement(64, 32, 32, 16);
        let frames = slice_frames(&p, 128, 64, 16, 16);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].0, [64.0 / 128.0, 32.0 / 64.0]);
        assert_eq!(frames[1].0, [80.0 / 128.0, 32.0 / 64.0]);
    }

    #[test]
    fn slice_multi_row_sheet_is_row_major() {
        let p = placement(0, 0, 32, 32);
        let frames = slice_frames(&p, 32, 32, 16, 16);
        assert_eq!(frames.len(), 4);
        // Frame 1 is to the right of frame 0; frame 2 starts the second row.
        assert_eq!(frames[1].0, [0.5, 0.0]);
        assert_eq!(frames[2].0, [0.0, 0.5]);
    }

    #[test]
    fn slice_undersized_sheet_yields_no_frames() {
        let p = placement(0, 0, 8, 8);
        assert!(slice_frames(&p, 64, 64, 16, 16).is_empty());
    }

    #[test]
    fn slice_uvs_within_zero_one_range() {
        let p = placement(100, 40, 128, 16);
        for (uv_min, uv_max) in slice_frames(&p, 256, 64, 16, 16) {
            for v in uv_min.iter().chain(uv_max.iter()) {
                assert!(*v >= 0.0 && *v <= 1.0, "UV {v} out of [0,1]");
            }
            assert!(uv_min[0] < uv_max[0]);
            assert!(uv_min[1] < uv_max[1]);
        }
    }
}
