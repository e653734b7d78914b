use std::path::Path;

use image::RgbaImage;

use super::{mip_chain, TextureError};
use crate::shader::GroupLayout;

/// A sampled 2D texture with its full mip chain.
pub struct Texture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    width: u32,
    height: u32,
    mip_levels: u32,
}

/// Decodes the image at `path` as RGB (alpha and extra channels dropped) and
/// returns it expanded to opaque RGBA8.
pub fn decode_rgb(path: impl AsRef<Path>) -> Result<RgbaImage, TextureError> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(TextureError::Empty {
            path: path.to_path_buf(),
        });
    }

    log::debug!(
        "decoded {} ({}x{}, {:?})",
        path.display(),
        decoded.width(),
        decoded.height(),
        decoded.color()
    );

    let rgb = decoded.into_rgb8();
    Ok(image::DynamicImage::ImageRgb8(rgb).into_rgba8())
}

/// Loads the image at `path` into a new texture with a full mip chain.
///
/// Decode failures are logged and returned; no texture is created for them.
pub fn load(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: impl AsRef<Path>,
) -> Result<Texture, TextureError> {
    let path = path.as_ref();
    let base = decode_rgb(path).inspect_err(|e| log::error!("{e}"))?;
    let (width, height) = base.dimensions();

    let max = device.limits().max_texture_dimension_2d;
    if width > max || height > max {
        let err = TextureError::TooLarge {
            path: path.to_path_buf(),
            width,
            height,
            max,
        };
        log::error!("{err}");
        return Err(err);
    }

    let levels = mip_chain(base);
    let mip_levels = levels.len() as u32;
    let label = path.display().to_string();

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: mip_levels,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (level, pixels) in levels.iter().enumerate() {
        let (w, h) = pixels.dimensions();
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: level as u32,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(&label),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    log::debug!("loaded texture {label} ({width}x{height}, {mip_levels} mip levels)");

    Ok(Texture {
        texture,
        view,
        sampler,
        width,
        height,
        mip_levels,
    })
}

impl Texture {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }

    pub fn raw(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Texture at binding 0 and its sampler at binding 1, visible to the
    /// fragment stage.
    pub const LAYOUT_ENTRIES: [wgpu::BindGroupLayoutEntry; 2] = [
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
    ];

    /// Shape of a texture bind group at `group`, for pipeline linking.
    pub fn group_layout(group: u32) -> GroupLayout<'static> {
        GroupLayout::new(group, &Self::LAYOUT_ENTRIES)
    }

    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("boa texture bgl"),
            entries: &Self::LAYOUT_ENTRIES,
        })
    }

    /// Binds this texture and its sampler against a layout from
    /// [`bind_group_layout`](Self::bind_group_layout).
    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("boa texture bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }
}
