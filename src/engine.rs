use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::warn;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::audio::{AudioContext, SoundConfig};
use crate::input::InputState;
use crate::renderer::Renderer;
use crate::renderer::pipeline::TileVertex;
use crate::{FRAME_H, FRAME_W, SPRITE_SCALE};

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
}

// ── Game trait ──────────────────────────────────────────────────────────────

pub trait Game {
    fn on_enter(&mut self, _engine: &mut Engine) {}
    fn update(&mut self, engine: &mut Engine);
    fn render(&mut self, engine: &mut Engine);
}

// ── Draw commands ───────────────────────────────────────────────────────────

/// One map tile queued for this frame, in world pixels.
struct TileCommand {
    x: i32,
    y: i32,
    id: u32,
}

/// One sprite-sheet frame queued for this frame, in world pixels.
struct FrameCommand {
    x: i32,
    y: i32,
    sheet: String,
    frame: u32,
    flip: bool,
}

// ── Engine ──────────────────────────────────────────────────────────────────

pub struct Engine {
    /// GPU renderer — holds the WGPU surface, pipeline, and atlas textures.
    pub renderer: Renderer,
    /// Keyboard state for the current frame.
    pub input: InputState,
    /// Audio subsystem for sound cues.
    pub audio: AudioContext,
    /// Which map atlas tile draws resolve against.
    current_map: usize,
    tile_commands: Vec<TileCommand>,
    frame_commands: Vec<FrameCommand>,
    /// Tile IDs and sheet names already warned about, so a missing asset
    /// logs once instead of sixty times a second.
    warned_tiles: HashSet<u32>,
    warned_sheets: HashSet<String>,
    tick: u64,
    /// Set to `true` by `request_quit()`; the event loop exits after the
    /// current tick.
    pub(crate) quit_requested: bool,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn from_builder(renderer: Renderer) -> Self {
        Self {
            renderer,
            input: InputState::new(),
            audio: AudioContext::new(),
            current_map: 0,
            tile_commands: Vec::new(),
            frame_commands: Vec::new(),
            warned_tiles: HashSet::new(),
            warned_sheets: HashSet::new(),
            tick: 0,
            quit_requested: false,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Signal that the application should exit.  The event loop will call
    /// `exit()` after the current update tick completes.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn play_sound(&mut self, name: &str) {
        self.audio.play(name, SoundConfig::default());
    }

    // ── Drawing API ────────────────────────────────────────────────────────

    /// Select which map's atlas subsequent `draw_tile` calls resolve against.
    pub fn set_map(&mut self, index: usize) {
        self.current_map = index;
    }

    /// Queue a map tile at world-pixel position `(x, y)`.
    pub fn draw_tile(&mut self, x: i32, y: i32, id: u32) {
        self.tile_commands.push(TileCommand { x, y, id });
    }

    /// Queue one frame of a sprite sheet at world-pixel position `(x, y)`.
    /// `flip` mirrors the frame horizontally.
    pub fn draw_frame(&mut self, x: i32, y: i32, sheet: &str, frame: u32, flip: bool) {
        self.frame_commands.push(FrameCommand {
            x,
            y,
            sheet: sheet.to_string(),
            frame,
            flip,
        });
    }

    // ── Internal rendering helpers ─────────────────────────────────────────

    /// Resolve the queued draw commands into vertex data for the current
    /// frame.  Tiles and frames are axis-aligned quads of the same scaled
    /// size; frames honour horizontal flipping by swapping UV x-coordinates.
    fn build_vertices(&mut self) -> (Vec<TileVertex>, Vec<TileVertex>) {
        let w = (FRAME_W * SPRITE_SCALE) as f32;
        let h = (FRAME_H * SPRITE_SCALE) as f32;

        let mut tile_verts = Vec::with_capacity(self.tile_commands.len() * 6);
        for cmd in &self.tile_commands {
            let Some((uv_min, uv_max)) = self.renderer.map_uv(self.current_map, cmd.id) else {
                if self.warned_tiles.insert(cmd.id) {
                    warn!(id = cmd.id, map = self.current_map, "tile id missing from atlas");
                }
                continue;
            };
            push_quad(&mut tile_verts, cmd.x as f32, cmd.y as f32, w, h, uv_min, uv_max);
        }

        let mut sprite_verts = Vec::with_capacity(self.frame_commands.len() * 6);
        for cmd in &self.frame_commands {
            let Some((mut uv_min, mut uv_max)) =
                self.renderer.frame_uv(&cmd.sheet, cmd.frame as usize)
            else {
                if self.warned_sheets.insert(cmd.sheet.clone()) {
                    warn!(sheet = %cmd.sheet, frame = cmd.frame, "sprite frame missing from atlas");
                }
                continue;
            };
            if cmd.flip {
                std::mem::swap(&mut uv_min[0], &mut uv_max[0]);
            }
            push_quad(&mut sprite_verts, cmd.x as f32, cmd.y as f32, w, h, uv_min, uv_max);
        }

        (tile_verts, sprite_verts)
    }
}

fn push_quad(
    verts: &mut Vec<TileVertex>,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    uv_min: [f32; 2],
    uv_max: [f32; 2],
) {
    let tint = Color::WHITE.0;
    let tl = TileVertex { position: [x, y], uv: uv_min, tint };
    let tr = TileVertex { position: [x + w, y], uv: [uv_max[0], uv_min[1]], tint };
    let bl = TileVertex { position: [x, y + h], uv: [uv_min[0], uv_max[1]], tint };
    let br = TileVertex { position: [x + w, y + h], uv: uv_max, tint };
    verts.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    target_ups: u32,
    sprite_folder: Option<String>,
    sound_folder: Option<String>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            title: "tilequest".into(),
            width: 800,
            height: 600,
            target_ups: 60,
            sprite_folder: None,
            sound_folder: None,
        }
    }
}

impl EngineBuilder {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_ups(mut self, ups: u32) -> Self {
        self.target_ups = ups;
        self
    }

    /// Specify a directory to scan recursively for `.png` sprite sheets.
    /// The atlas is baked once at startup before the game loop begins.
    pub fn with_sprite_folder(mut self, path: &str) -> Self {
        self.sprite_folder = Some(path.to_string());
        self
    }

    /// Specify a directory to scan recursively for sound cues (`.wav`/`.ogg`),
    /// registered under their file stems.
    pub fn with_sound_folder(mut self, path: &str) -> Self {
        self.sound_folder = Some(path.to_string());
        self
    }

    pub fn run(self, game: impl Game + 'static) {
        let event_loop = EventLoop::new().unwrap();
        let fixed_dt = 1.0 / self.target_ups as f32;
        let mut app = App {
            config: self,
            game: Box::new(game),
            engine: None,
            last_instant: None,
            accumulator: 0.0,
            fixed_dt,
        };
        event_loop.run_app(&mut app).unwrap();
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    config: EngineBuilder,
    game: Box<dyn Game>,
    engine: Option<Engine>,
    last_instant: Option<Instant>,
    accumulator: f32,
    fixed_dt: f32,
}

impl App {
    fn load_sounds(engine: &mut Engine, folder: &str) {
        for entry in walkdir::WalkDir::new(folder)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            let is_cue = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("wav") || e.eq_ignore_ascii_case("ogg"));
            if !is_cue {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                let name = stem.to_string();
                engine.audio.load_sound(&name, path);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(&self.config.title)
                        .with_inner_size(winit::dpi::PhysicalSize::new(
                            self.config.width,
                            self.config.height,
                        ))
                        .with_resizable(false),
                )
                .unwrap(),
        );
        let mut renderer = pollster::block_on(Renderer::new(window));

        if let Some(folder) = &self.config.sprite_folder {
            renderer.load_sprite_folder(folder);
        }

        let mut engine = Engine::from_builder(renderer);
        if let Some(folder) = &self.config.sound_folder {
            Self::load_sounds(&mut engine, folder);
        }

        self.game.on_enter(&mut engine);
        self.engine = Some(engine);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = self.engine.as_ref() {
            engine.renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(engine) = self.engine.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                engine.renderer.resize(size);
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32().min(0.25),
                    None => self.fixed_dt,
                };
                self.last_instant = Some(now);
                self.accumulator += elapsed;

                while self.accumulator >= self.fixed_dt {
                    engine.tick += 1;
                    self.game.update(engine);
                    if engine.quit_requested {
                        event_loop.exit();
                        return;
                    }
                    self.accumulator -= self.fixed_dt;
                }

                engine.tile_commands.clear();
                engine.frame_commands.clear();
                self.game.render(engine);

                let (tile_verts, sprite_verts) = engine.build_vertices();
                match engine.renderer.render(engine.current_map, &tile_verts, &sprite_verts) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let size = engine.renderer.window.inner_size();
                        engine.renderer.resize(size);
                    }
                    Err(e) => warn!(error = %e, "render error"),
                }

                engine.input.clear_frame_state();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    if engine.input.keys_held.insert(code) {
                        engine.input.keys_pressed.insert(code);
                    }
                }
                ElementState::Released => {
                    engine.input.keys_held.remove(&code);
                    engine.input.keys_released.insert(code);
                }
            },

            _ => {}
        }
    }
}
