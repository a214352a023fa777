//! WebGPU sprite pipeline
//!
//! One pipeline draws the whole frame. Group 0 holds the render scale and
//! canvas size the vertex shader uses to map world units to clip space; group 1
//! holds the texture of the current batch.

use std::fmt;

use bytemuck::{Pod, Zeroable};

use super::scene::Scene;
use super::texture::{GpuTexture, TextureSet};
use super::vertex::{Vertex, colors};
use crate::sim::WorldConfig;

/// Vertex capacity of the first buffer; grown by doubling
const INITIAL_VERTEX_CAPACITY: u64 = 4096;

/// Renderer setup failures
#[derive(Debug)]
pub enum RendererError {
    Device(wgpu::RequestDeviceError),
    /// The surface reported no usable texture format
    NoSurfaceFormat,
}

impl fmt::Display for RendererError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(e) => write!(f, "device request failed: {}", e),
            Self::NoSurfaceFormat => write!(f, "surface has no supported format"),
        }
    }
}

impl std::error::Error for RendererError {}

impl From<wgpu::RequestDeviceError> for RendererError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        Self::Device(e)
    }
}

/// Uniforms for the vertex stage (16 bytes, uniform-aligned)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Globals {
    /// Canvas pixels per world unit
    pub render_scale: [f32; 2],
    /// Backing canvas size in pixels
    pub canvas_size: [f32; 2],
}

impl Globals {
    pub fn for_world(world: &WorldConfig) -> Self {
        let (w, h) = world.canvas_size;
        Self {
            render_scale: [world.render_scale_x, world.render_scale_y],
            canvas_size: [w.max(1) as f32, h.max(1) as f32],
        }
    }
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    // Kept for uploading art after startup
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    texture_layout: wgpu::BindGroupLayout,
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    sampler: wgpu::Sampler,
    textures: TextureSet,
    vertex_buffer: wgpu::Buffer,
    /// Capacity of `vertex_buffer` in vertices
    vertex_capacity: u64,
    /// Surface size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RendererError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("flappy-sky-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        // Palette and images are sRGB-encoded already; write them unconverted
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RendererError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

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
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
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
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = GpuTexture::bind_group_layout(&device);
        let sampler = GpuTexture::sampler(&device);
        let textures = TextureSet::new(GpuTexture::blank(&device, &queue, &texture_layout, &sampler));

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
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            globals_bind_group,
            texture_layout,
            sampler,
            textures,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload the loaded art. Slots whose image is missing keep drawing blank.
    #[cfg(target_arch = "wasm32")]
    pub fn set_images(&mut self, images: &crate::platform::web::ImageSet) {
        self.textures.upload(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.sampler,
            images,
        );
    }

    /// Upload one frame's scene and draw it batch by batch
    pub fn render(&mut self, scene: &Scene, world: &WorldConfig) -> Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals::for_world(world)),
        );

        let needed = scene.vertices.len() as u64;
        if needed > self.vertex_capacity {
            self.vertex_capacity = needed.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.vertex_capacity);
        }
        if needed > 0 {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&scene.vertices));
        }

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
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: colors::CLEAR[0] as f64,
                            g: colors::CLEAR[1] as f64,
                            b: colors::CLEAR[2] as f64,
                            a: colors::CLEAR[3] as f64,
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

            if needed > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                for batch in &scene.batches {
                    let texture = self.textures.get(batch.texture);
                    render_pass.set_bind_group(1, &texture.bind_group, &[]);
                    render_pass.draw(batch.vertices.clone(), 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("vertex_buffer"),
        size: capacity * std::mem::size_of::<Vertex>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
