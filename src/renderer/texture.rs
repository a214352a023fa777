//! GPU textures for the game art
//!
//! Every draw binds exactly one texture. Flat geometry uses a 1x1 white
//! texture so a single pipeline covers both images and solid shapes.

/// Which texture a run of vertices samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// 1x1 white; the vertex tint is the color
    Blank,
    Background,
    Bird,
    /// Obstacle art variant, indexed like `AssetCatalog::pipe_variants`
    Pipe(usize),
}

/// A texture and the bind group that samples it
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
}

impl GpuTexture {
    /// Layout shared by every sprite bind group: texture at 0, sampler at 1
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    pub fn sampler(device: &wgpu::Device) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        })
    }

    fn create(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
        size: wgpu::Extent3d,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            // Sampled values stay sRGB-encoded like the vertex colors
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            texture,
            bind_group,
        }
    }

    /// Single white texel
    pub fn blank(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        };
        let blank = Self::create(
            device,
            layout,
            sampler,
            "blank_texture",
            size,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &blank.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[255, 255, 255, 255],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            size,
        );

        blank
    }

    /// Copy a decoded `<img>` into a new texture
    #[cfg(target_arch = "wasm32")]
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &web_sys::HtmlImageElement,
    ) -> Option<Self> {
        let (width, height) = (image.natural_width(), image.natural_height());
        if width == 0 || height == 0 {
            return None;
        }
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = Self::create(
            device,
            layout,
            sampler,
            &image.src(),
            size,
            // External copies need RENDER_ATTACHMENT on WebGPU
            wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
        );

        queue.copy_external_image_to_texture(
            &wgpu::CopyExternalImageSourceInfo {
                source: wgpu::ExternalImageSource::HTMLImageElement(image.clone()),
                origin: wgpu::Origin2d::ZERO,
                flip_y: false,
            },
            wgpu::CopyExternalImageDestInfo {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
                color_space: wgpu::PredefinedColorSpace::Srgb,
                premultiplied_alpha: false,
            },
            size,
        );

        Some(texture)
    }
}

/// Every texture the scene can reference
pub struct TextureSet {
    blank: GpuTexture,
    background: Option<GpuTexture>,
    bird: Option<GpuTexture>,
    /// Same indices as the catalog's variants; None where an upload failed
    pipes: Vec<Option<GpuTexture>>,
}

impl TextureSet {
    pub fn new(blank: GpuTexture) -> Self {
        Self {
            blank,
            background: None,
            bird: None,
            pipes: Vec::new(),
        }
    }

    /// Upload the loaded images, replacing any earlier art
    #[cfg(target_arch = "wasm32")]
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        images: &crate::platform::web::ImageSet,
    ) {
        let upload = |image: &web_sys::HtmlImageElement| {
            GpuTexture::from_image(device, queue, layout, sampler, image)
        };
        self.background = images.background.as_ref().and_then(upload);
        self.bird = images.bird.as_ref().and_then(upload);
        self.pipes = images.pipes.iter().map(upload).collect();
        log::info!(
            "Textures uploaded: background={} bird={} pipes={}",
            self.background.is_some(),
            self.bird.is_some(),
            self.pipes.iter().flatten().count()
        );
    }

    /// Texture for a slot; slots with no uploaded art fall back to blank
    pub fn get(&self, slot: TextureSlot) -> &GpuTexture {
        let art = match slot {
            TextureSlot::Blank => None,
            TextureSlot::Background => self.background.as_ref(),
            TextureSlot::Bird => self.bird.as_ref(),
            TextureSlot::Pipe(i) => self.pipes.get(i).and_then(Option::as_ref),
        };
        art.unwrap_or(&self.blank)
    }
}
