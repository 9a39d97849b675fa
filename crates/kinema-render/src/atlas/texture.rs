use crate::device::GpuContext;
use crate::error::{RenderError, RenderResult};

use super::{AtlasError, ShelfPacker};

/// Atlas dimensions and pixel format.
#[derive(Debug, Clone)]
pub struct AtlasConfig {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    /// Gap in texels between packed items, guarding against bleed when
    /// sampling with linear filtering.
    pub padding: u32,
    pub label: &'static str,
}

impl AtlasConfig {
    /// 2048² RGBA atlas for image content.
    pub fn image() -> Self {
        Self {
            width: 2048,
            height: 2048,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            padding: 1,
            label: "image atlas",
        }
    }

    /// 1024² single-channel atlas for glyph coverage masks.
    pub fn glyph() -> Self {
        Self {
            width: 1024,
            height: 1024,
            format: wgpu::TextureFormat::R8Unorm,
            padding: 1,
            label: "glyph atlas",
        }
    }

    fn bytes_per_texel(&self) -> u32 {
        match self.format {
            wgpu::TextureFormat::R8Unorm => 1,
            _ => 4,
        }
    }
}

/// Raw pixel data to be uploaded into an atlas.
///
/// `pixels` is tightly packed rows of `width` texels in the atlas format.
#[derive(Debug, Copy, Clone)]
pub struct ImageSource<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
}

/// A packed region of an atlas.
///
/// Pixel coordinates locate the region for re-upload; the UV rect is what
/// instance records carry to the shader.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AtlasEntry {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// One texture shared by many packed images, so whole batches bind a single
/// texture regardless of how many distinct images they draw.
///
/// Entries are keyed to a `generation`: when the atlas fills up it is
/// recreated empty under the next generation, and entries from prior
/// generations become stale. The GPU texture is created lazily on first
/// upload.
pub struct TextureAtlas {
    config: AtlasConfig,
    packer: ShelfPacker,
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    sampler: Option<wgpu::Sampler>,
    generation: u64,
}

impl TextureAtlas {
    pub fn new(config: AtlasConfig) -> Self {
        let packer = ShelfPacker::new(config.width, config.height, config.padding);
        Self {
            config,
            packer,
            texture: None,
            view: None,
            sampler: None,
            generation: 0,
        }
    }

    /// Packs `source` into the atlas and uploads its pixels.
    pub fn load_image(&mut self, gpu: &GpuContext, source: ImageSource<'_>) -> RenderResult<AtlasEntry> {
        // Fail on a missing device before consuming packer space.
        self.ensure_texture(gpu)?;
        let queue = gpu.queue().ok_or(RenderError::NotInitialized)?;

        let (x, y) = match self.packer.place(source.width, source.height) {
            Ok(pos) => pos,
            Err(AtlasError::Full { width, height }) => {
                return Err(RenderError::AtlasFull { width, height });
            }
        };
        let texture = self.texture.as_ref().ok_or(RenderError::NotInitialized)?;

        let bytes_per_row = source.width * self.config.bytes_per_texel();
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            source.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(source.height),
            },
            wgpu::Extent3d {
                width: source.width,
                height: source.height,
                depth_or_array_layers: 1,
            },
        );

        Ok(self.entry_for(x, y, source.width, source.height))
    }

    /// Packs a region without uploading pixels (stale-entry tests, reserved
    /// space for deferred uploads).
    pub fn reserve(&mut self, width: u32, height: u32) -> RenderResult<AtlasEntry> {
        match self.packer.place(width, height) {
            Ok((x, y)) => Ok(self.entry_for(x, y, width, height)),
            Err(AtlasError::Full { width, height }) => {
                Err(RenderError::AtlasFull { width, height })
            }
        }
    }

    /// Discards all packed content and starts the next generation.
    ///
    /// The GPU texture is recreated lazily on the next upload. Entries handed
    /// out under earlier generations must not be drawn again.
    pub fn recreate(&mut self) {
        self.packer.reset();
        self.texture = None;
        self.view = None;
        self.generation += 1;
        log::info!(
            "{}: recreated (generation {})",
            self.config.label,
            self.generation
        );
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.view.as_ref()
    }

    pub fn sampler(&self) -> Option<&wgpu::Sampler> {
        self.sampler.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn entry_for(&self, x: u32, y: u32, width: u32, height: u32) -> AtlasEntry {
        let aw = self.config.width as f32;
        let ah = self.config.height as f32;
        AtlasEntry {
            x,
            y,
            width,
            height,
            uv_min: [x as f32 / aw, y as f32 / ah],
            uv_max: [(x + width) as f32 / aw, (y + height) as f32 / ah],
        }
    }

    fn ensure_texture(&mut self, gpu: &GpuContext) -> RenderResult<()> {
        if self.texture.is_some() {
            return Ok(());
        }

        let texture = gpu
            .create_texture(&wgpu::TextureDescriptor {
                label: Some(self.config.label),
                size: wgpu::Extent3d {
                    width: self.config.width,
                    height: self.config.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: self.config.format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            })
            .ok_or(RenderError::NotInitialized)?;

        self.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.texture = Some(texture);

        if self.sampler.is_none() {
            self.sampler = gpu.create_sampler(&wgpu::SamplerDescriptor {
                label: Some(self.config.label),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            });
        }
        Ok(())
    }
}
