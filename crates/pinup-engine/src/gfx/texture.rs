//! Image textures and their unit bookkeeping.
//!
//! A texture unit is the bind group index a texture occupies while bound.
//! Setting a uniform from an unbound texture is an error rather than a
//! silent no-op.

use image::imageops::{self, FilterType};

use crate::gfx::error::GfxError;
use crate::gfx::shader::{TextureBinding, UniformLocation};
use crate::picture::Picture;

/// Which unit, if any, a texture currently occupies.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub(crate) struct UnitState {
    unit: Option<u32>,
}

impl UnitState {
    pub(crate) fn bind(&mut self, unit: u32) {
        self.unit = Some(unit);
    }

    pub(crate) fn unbind(&mut self) {
        self.unit = None;
    }

    pub(crate) fn require(&self) -> Result<u32, GfxError> {
        self.unit.ok_or(GfxError::NotBound)
    }
}

#[derive(Debug)]
pub struct Texture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    state: UnitState,
}

impl Texture {
    /// Uploads `picture` with a full mip chain.
    ///
    /// The layout and the device's size limit are checked before anything is
    /// allocated on the GPU.
    pub fn create(
        ctx: &crate::render::RenderCtx<'_>,
        picture: &Picture,
        wrap: wgpu::AddressMode,
        binding: &TextureBinding<'_>,
    ) -> Result<Self, GfxError> {
        let base = validate_layout(picture, ctx.device.limits().max_texture_dimension_2d)?;
        let levels = mip_chain(base);
        let (width, height) = (picture.width(), picture.height());

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pinup image texture"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, image) in levels.iter().enumerate() {
            ctx.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                image.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(image.width() * 4),
                    rows_per_image: Some(image.height()),
                },
                wgpu::Extent3d {
                    width: image.width(),
                    height: image.height(),
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("pinup image sampler"),
            address_mode_u: wrap,
            address_mode_v: wrap,
            address_mode_w: wrap,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pinup image bind group"),
            layout: binding.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: binding.texture.binding,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: binding.sampler.binding,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::debug!("uploaded {width}x{height} texture with {} mip level(s)", levels.len());

        Ok(Self {
            texture,
            bind_group,
            state: UnitState::default(),
        })
    }

    pub fn bind(&mut self, unit: u32) {
        self.state.bind(unit);
    }

    pub fn unbind(&mut self) {
        self.state.unbind();
    }

    /// Points the sampler uniform at `location` to this texture's unit.
    pub fn set_uniform(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        location: UniformLocation,
    ) -> Result<(), GfxError> {
        let unit = self.state.require()?;
        log::trace!("texture unit {unit} -> @group({})", location.group);
        pass.set_bind_group(location.group, &self.bind_group, &[]);
        Ok(())
    }

    pub fn release(self) {
        self.texture.destroy();
    }
}

/// Accepts only tightly packed, non-empty RGBA8 pixels no larger than `max` per side.
pub(crate) fn validate_layout(picture: &Picture, max: u32) -> Result<image::RgbaImage, GfxError> {
    let (width, height) = (picture.width(), picture.height());
    if width == 0 || height == 0 {
        return Err(GfxError::EmptyImage { width, height });
    }
    if width > max || height > max {
        return Err(GfxError::TooLarge { width, height, max });
    }
    if picture.stride() != width as usize * 4 {
        return Err(GfxError::UnsupportedStride { width, stride: picture.stride() });
    }
    let expected = width as usize * height as usize * 4;
    if picture.pixels().len() != expected {
        return Err(GfxError::BufferSize { expected, actual: picture.pixels().len() });
    }
    picture
        .to_rgba_image()
        .ok_or(GfxError::BufferSize { expected, actual: picture.pixels().len() })
}

pub(crate) fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

fn mip_chain(base: image::RgbaImage) -> Vec<image::RgbaImage> {
    let count = mip_level_count(base.width(), base.height()) as usize;
    let mut levels = Vec::with_capacity(count);
    levels.push(base);
    while levels.len() < count {
        let prev = &levels[levels.len() - 1];
        let (w, h) = ((prev.width() / 2).max(1), (prev.height() / 2).max(1));
        let next = imageops::resize(prev, w, h, FilterType::Triangle);
        levels.push(next);
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u32 = 8192;

    #[test]
    fn mip_counts() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 1), 2);
        assert_eq!(mip_level_count(400, 400), 9);
        assert_eq!(mip_level_count(200, 100), 8);
    }

    #[test]
    fn chain_halves_down_to_one_pixel() {
        let levels = mip_chain(image::RgbaImage::new(8, 2));
        let sizes: Vec<_> = levels.iter().map(|l| l.dimensions()).collect();
        assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
    }

    #[test]
    fn padded_rows_are_rejected() {
        let picture = Picture::from_raw_parts(3, 2, 16, vec![0; 32]);
        match validate_layout(&picture, LIMIT) {
            Err(GfxError::UnsupportedStride { width: 3, stride: 16 }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_image_is_rejected() {
        let picture = Picture::from_raw_parts(0, 5, 0, Vec::new());
        assert!(matches!(validate_layout(&picture, LIMIT), Err(GfxError::EmptyImage { .. })));
    }

    #[test]
    fn short_buffer_is_rejected() {
        let picture = Picture::from_raw_parts(2, 2, 8, vec![0; 12]);
        assert!(matches!(
            validate_layout(&picture, LIMIT),
            Err(GfxError::BufferSize { expected: 16, actual: 12 })
        ));
    }

    #[test]
    fn packed_image_passes() {
        let picture = Picture::from_raw_parts(2, 2, 8, vec![7; 16]);
        let image = validate_layout(&picture, LIMIT).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
    }

    #[test]
    fn unit_state_tracks_binding() {
        let mut state = UnitState::default();
        assert!(matches!(state.require(), Err(GfxError::NotBound)));
        state.bind(0);
        assert_eq!(state.require().unwrap(), 0);
        state.unbind();
        assert!(matches!(state.require(), Err(GfxError::NotBound)));
    }

    #[test]
    fn oversized_image_is_rejected_before_pixels_are_touched() {
        // Claims 9000x1 but carries no pixels: the size check must come first.
        let wide = Picture::from_raw_parts(9000, 1, 9000 * 4, Vec::new());
        match validate_layout(&wide, LIMIT) {
            Err(GfxError::TooLarge { width: 9000, height: 1, max: LIMIT }) => {}
            other => panic!("unexpected: {other:?}"),
        }

        let tall = Picture::from_raw_parts(2, 5, 8, vec![0; 40]);
        assert!(matches!(validate_layout(&tall, 4), Err(GfxError::TooLarge { .. })));
    }

    #[test]
    fn image_at_the_limit_is_accepted() {
        let picture = Picture::from_raw_parts(4, 1, 16, vec![0; 16]);
        assert!(validate_layout(&picture, 4).is_ok());
    }
}
