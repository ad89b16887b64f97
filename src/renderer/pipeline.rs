//! WebGPU sprite pipeline
//!
//! Draws a `Scene` as a single vertex buffer, switching the texture bind group
//! between batches. The shake offset and playfield size travel in a uniform.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::RenderError;
use super::assets::{AssetStatus, SpriteId};
use super::scene::{Scene, Texture};
use super::textures::{self, SpriteTexture};
use super::vertex::{Vertex, colors};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::engine::RenderSurface;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    playfield: [f32; 2], // offset 0
    offset: [f32; 2],    // offset 8
}

/// Main render state
pub struct SpriteRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    /// Viewport size in pixels
    pub size: (u32, u32),

    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: SpriteTexture,
    sprites: [Option<SpriteTexture>; 2],

    /// Images still decoding in the browser
    #[cfg(target_arch = "wasm32")]
    pending: [Option<web_sys::HtmlImageElement>; 2],
}

impl SpriteRenderer {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("fire-flap-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(RenderError::UnsupportedSurface)?;

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sprite_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                playfield: [PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT],
                offset: [0.0, 0.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = textures::bind_group_layout(&device);
        let sampler = textures::create_sampler(&device);
        let white = SpriteTexture::white(&device, &queue, &texture_layout, &sampler);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let mut renderer = Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            size: (width, height),
            globals_buffer,
            globals_bind_group,
            texture_layout,
            sampler,
            white,
            sprites: [None, None],
            #[cfg(target_arch = "wasm32")]
            pending: [None, None],
        };

        // Never draw nothing: stand-ins until the real images arrive
        for sprite in SpriteId::ALL {
            let (size, rgba) = sprite.placeholder();
            renderer.load_rgba(sprite, size, &rgba);
        }

        Ok(renderer)
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Install a sprite from raw RGBA8 pixels, replacing any earlier one
    pub fn load_rgba(&mut self, sprite: SpriteId, size: (u32, u32), rgba: &[u8]) {
        let texture = SpriteTexture::from_rgba(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.sampler,
            sprite.path(),
            size,
            rgba,
        );
        self.sprites[sprite.index()] = Some(texture);
    }

    /// Queue a browser image; it is uploaded once it finishes decoding
    #[cfg(target_arch = "wasm32")]
    pub fn load_image(&mut self, sprite: SpriteId, image: web_sys::HtmlImageElement) {
        self.pending[sprite.index()] = Some(image);
    }

    /// Upload any images that finished loading and report what is drawable
    pub fn poll_assets(&mut self) -> AssetStatus {
        self.upload_pending();

        let mut status = AssetStatus::default();
        for sprite in SpriteId::ALL {
            status.set(sprite, self.sprites[sprite.index()].is_some());
        }
        status
    }

    #[cfg(target_arch = "wasm32")]
    fn upload_pending(&mut self) {
        for sprite in SpriteId::ALL {
            let slot = sprite.index();
            let loaded = self.pending[slot]
                .as_ref()
                .is_some_and(|img| img.complete() && img.natural_width() > 0);
            if !loaded {
                continue;
            }
            if let Some(image) = self.pending[slot].take() {
                let texture = SpriteTexture::from_image(
                    &self.device,
                    &self.queue,
                    &self.texture_layout,
                    &self.sampler,
                    sprite.path(),
                    &image,
                );
                log::info!("Sprite ready: {} {:?}", sprite.path(), texture.size);
                self.sprites[slot] = Some(texture);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn upload_pending(&mut self) {
        // Only browser images decode asynchronously
    }

    fn bind_group(&self, texture: Texture) -> Option<&wgpu::BindGroup> {
        match texture {
            Texture::Solid => Some(&self.white.bind_group),
            Texture::Sprite(sprite) => self.sprites[sprite.index()]
                .as_ref()
                .map(|t| &t.bind_group),
        }
    }

    /// Upload the scene and draw it
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals {
                playfield: scene.size.to_array(),
                offset: scene.offset.to_array(),
            }),
        );

        // Flatten batches into one buffer, remembering each batch's range
        let mut vertices: Vec<Vertex> = Vec::with_capacity(scene.vertex_count());
        let mut draws: Vec<(Range<u32>, Texture)> = Vec::with_capacity(scene.batches.len());
        for batch in &scene.batches {
            let start = vertices.len() as u32;
            vertices.extend_from_slice(&batch.vertices);
            draws.push((start..vertices.len() as u32, batch.texture));
        }

        // Recreate buffer each frame (simple approach; could optimize)
        let vertex_buffer = (!vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = &vertex_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                for (range, texture) in draws {
                    // Texture dropped since the scene was built: skip this frame
                    let Some(bind_group) = self.bind_group(texture) else {
                        continue;
                    };
                    render_pass.set_bind_group(1, bind_group, &[]);
                    render_pass.draw(range, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl RenderSurface for SpriteRenderer {
    fn assets(&mut self) -> AssetStatus {
        self.poll_assets()
    }

    fn present(&mut self, scene: &Scene) {
        match self.render(scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.resize(self.size.0, self.size.1);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}
