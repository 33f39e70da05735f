use flyview_assets::{ImageData, load_image};
use flyview_render::SamplerMode;
use std::path::Path;

/// How a texture slot is interpreted and what stands in when its file is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextureRole {
    Color,
    Normal,
    Specular,
    Gloss,
}

impl TextureRole {
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            Self::Color => wgpu::TextureFormat::Rgba8UnormSrgb,
            Self::Normal | Self::Specular | Self::Gloss => wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    /// 1x1 substitute: white colour, flat normal, no specular, full gloss.
    pub fn fallback(self) -> [u8; 4] {
        match self {
            Self::Color => [255, 255, 255, 255],
            Self::Normal => [128, 128, 255, 255],
            Self::Specular => [0, 0, 0, 255],
            Self::Gloss => [255, 255, 255, 255],
        }
    }
}

/// Sampled 2D texture with a single mip level.
pub(crate) struct GpuTexture {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    /// Load `path`, falling back to a solid colour if it cannot be read.
    pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path, role: TextureRole) -> Self {
        let image = match load_image(path) {
            Ok(image) => {
                tracing::debug!("loaded texture {} ({}x{})", path.display(), image.width, image.height);
                image
            }
            Err(e) => {
                tracing::warn!("texture {} unavailable, using fallback: {e}", path.display());
                ImageData::solid(role.fallback())
            }
        };
        Self::upload(device, queue, &path.display().to_string(), &image, role.format())
    }

    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &ImageData,
        format: wgpu::TextureFormat,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width.max(1),
            height: image.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.row_pitch()),
                rows_per_image: Some(image.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Sampler descriptor for each filtering mode. Addressing wraps.
pub(crate) fn sampler_descriptor(mode: SamplerMode) -> wgpu::SamplerDescriptor<'static> {
    let (filter, anisotropy_clamp, label) = match mode {
        SamplerMode::Point => (wgpu::FilterMode::Nearest, 1, "point_sampler"),
        SamplerMode::Linear => (wgpu::FilterMode::Linear, 1, "linear_sampler"),
        SamplerMode::Anisotropic => (wgpu::FilterMode::Linear, 16, "anisotropic_sampler"),
    };
    wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: filter,
        anisotropy_clamp,
        ..Default::default()
    }
}
