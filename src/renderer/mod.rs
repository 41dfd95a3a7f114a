pub mod pipeline;
pub mod sprite_atlas;
pub mod tiles;

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use pipeline::{TilePipeline, TileVertex, create_tile_pipeline, orthographic_projection};
use sprite_atlas::SpriteAtlas;
use tiles::{AtlasError, TileLookup, bake_map_atlas};

use crate::tilemap::TileMap;

/// GPU-side state for one map: its baked tileset texture plus the UV
/// rectangle for every tile ID that appears on the map.
struct MapAtlas {
    bind_group: wgpu::BindGroup,
    uvs: HashMap<u32, ([f32; 2], [f32; 2])>,
}

pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    tile_pipeline: TilePipeline,
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    /// One baked atlas per loaded map, indexed in load order.
    map_atlases: Vec<MapAtlas>,
    /// Bind group for the sprite atlas (None until load_sprite_folder is called).
    sprite_atlas_bind_group: Option<wgpu::BindGroup>,
    sprite_atlas: Option<SpriteAtlas>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(Arc::clone(&window)).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .expect("no suitable GPU adapter found");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .expect("failed to create device");

        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats[0];

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let tile_pipeline = create_tile_pipeline(&device, format);

        let proj = orthographic_projection(config.width as f32, config.height as f32);
        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::cast_slice(&proj),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection_bg"),
            layout: &tile_pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        Self {
            window,
            surface,
            device,
            queue,
            config,
            tile_pipeline,
            projection_buffer,
            projection_bind_group,
            map_atlases: Vec::new(),
            sprite_atlas_bind_group: None,
            sprite_atlas: None,
        }
    }

    /// Bake a map's tileset images into a single atlas texture and upload it.
    /// Returns the atlas index, which matches the order maps are loaded in.
    pub fn load_map_atlas(&mut self, map: &TileMap, lookup: &TileLookup) -> Result<usize, AtlasError> {
        let baked = bake_map_atlas(map, lookup)?;
        let (texture_view, sampler) = sprite_atlas::upload_rgba(&self.device, &self.queue, &baked.image);

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("map_atlas_bg"),
            layout: &self.tile_pipeline.atlas_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.map_atlases.push(MapAtlas { bind_group, uvs: baked.uvs });
        Ok(self.map_atlases.len() - 1)
    }

    /// Load all `.png` files from `path` (recursively) into the sprite atlas.
    /// Must be called once during initialisation, before the game loop starts.
    pub fn load_sprite_folder(&mut self, path: &str) {
        let atlas = SpriteAtlas::load_folder(&self.device, &self.queue, path);

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_atlas_bg"),
            layout: &self.tile_pipeline.atlas_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas.texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                },
            ],
        });

        self.sprite_atlas_bind_group = Some(bind_group);
        self.sprite_atlas = Some(atlas);
    }

    /// UV rectangle for a tile ID inside a map's baked atlas.
    pub fn map_uv(&self, map_index: usize, id: u32) -> Option<([f32; 2], [f32; 2])> {
        self.map_atlases.get(map_index)?.uvs.get(&id).copied()
    }

    /// UV rectangle for one frame of a named sprite sheet.
    pub fn frame_uv(&self, sheet: &str, frame: usize) -> Option<([f32; 2], [f32; 2])> {
        self.sprite_atlas
            .as_ref()?
            .sheets
            .get(sheet)?
            .frames
            .get(frame)
            .copied()
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        let proj = orthographic_projection(new_size.width as f32, new_size.height as f32);
        self.queue
            .write_buffer(&self.projection_buffer, 0, bytemuck::cast_slice(&proj));
    }

    /// Render one frame.
    ///
    /// Draw order within the single render pass:
    /// 1. `tile_verts`   — the current map's baked tileset atlas
    /// 2. `sprite_verts` — item, character, and HUD frames from the sprite atlas
    pub fn render(
        &mut self,
        map_index: usize,
        tile_verts: &[TileVertex],
        sprite_verts: &[TileVertex],
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.0,
                            g: 0.0,
                            b: 0.0,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            // ── Pass 1: map tiles ────────────────────────────────────────
            if !tile_verts.is_empty() {
                if let Some(atlas) = self.map_atlases.get(map_index) {
                    let vbuf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("tile_vertex_buffer"),
                        contents: bytemuck::cast_slice(tile_verts),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                    pass.set_pipeline(&self.tile_pipeline.render_pipeline);
                    pass.set_bind_group(0, &self.projection_bind_group, &[]);
                    pass.set_bind_group(1, &atlas.bind_group, &[]);
                    pass.set_vertex_buffer(0, vbuf.slice(..));
                    pass.draw(0..tile_verts.len() as u32, 0..1);
                }
            }

            // ── Pass 2: sprites (items, characters, HUD) ─────────────────
            if !sprite_verts.is_empty() {
                if let Some(sprite_bg) = &self.sprite_atlas_bind_group {
                    let vbuf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("sprite_vertex_buffer"),
                        contents: bytemuck::cast_slice(sprite_verts),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                    pass.set_pipeline(&self.tile_pipeline.render_pipeline);
                    pass.set_bind_group(0, &self.projection_bind_group, &[]);
                    pass.set_bind_group(1, sprite_bg, &[]);
                    pass.set_vertex_buffer(0, vbuf.slice(..));
                    pass.draw(0..sprite_verts.len() as u32, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
