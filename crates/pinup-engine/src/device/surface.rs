use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(caps.formats[0])
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    preferred: &[wgpu::CompositeAlphaMode],
) -> wgpu::CompositeAlphaMode {
    preferred
        .iter()
        .copied()
        .find(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Picks the highest power-of-two sample count `<= requested` accepted by `supported`.
///
/// A count of 1 (no multisampling) is always valid.
pub(crate) fn pick_sample_count(requested: u32, supported: impl Fn(u32) -> bool) -> u32 {
    [16, 8, 4, 2]
        .into_iter()
        .filter(|&n| n <= requested)
        .find(|&n| supported(n))
        .unwrap_or(1)
}

/// Creates the multisampled color target matching the surface configuration.
///
/// Returns `None` when multisampling is disabled.
pub(crate) fn create_msaa_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("pinup msaa target"),
        size: wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}

/// Whether a surface of `size` can be configured on a device allowing
/// `max_dimension` pixels per side.
pub(crate) fn fits_surface(size: PhysicalSize<u32>, max_dimension: u32) -> bool {
    size.width > 0 && size.height > 0 && size.width <= max_dimension && size.height <= max_dimension
}

/// Updates the stored size and reconfigures the surface.
///
/// wgpu does not support configuring a surface with a 0x0 size; in that case,
/// only internal state is updated and configuration is deferred. Sizes past
/// the device limit are ignored and the previous configuration is kept.
/// Returns whether the surface was reconfigured.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) -> bool {
    let max_dimension = device.limits().max_texture_dimension_2d;
    if new_size.width > max_dimension || new_size.height > max_dimension {
        log::warn!(
            "resize to {}x{} exceeds the GPU limit of {max_dimension}; keeping {}x{}",
            new_size.width,
            new_size.height,
            size.width,
            size.height
        );
        return false;
    }

    *size = new_size;
    if !fits_surface(new_size, max_dimension) {
        return false;
    }

    config.width = new_size.width;
    config.height = new_size.height;

    surface.configure(device, config);
    true
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_takes_requested_when_supported() {
        assert_eq!(pick_sample_count(8, |_| true), 8);
    }

    #[test]
    fn sample_count_falls_back_to_lower_supported() {
        // WebGPU guarantees 1 and 4 only.
        assert_eq!(pick_sample_count(8, |n| n == 4), 4);
    }

    #[test]
    fn sample_count_never_exceeds_request() {
        assert_eq!(pick_sample_count(2, |_| true), 2);
        assert_eq!(pick_sample_count(1, |_| true), 1);
    }

    #[test]
    fn sample_count_without_support_disables_msaa() {
        assert_eq!(pick_sample_count(8, |_| false), 1);
    }

    #[test]
    fn only_out_of_memory_is_fatal() {
        assert!(SurfaceErrorAction::Fatal.is_fatal());
        assert!(!SurfaceErrorAction::SkipFrame.is_fatal());
        assert!(!SurfaceErrorAction::Reconfigured.is_fatal());
    }

    #[test]
    fn surface_sizes_past_the_limit_do_not_fit() {
        assert!(fits_surface(PhysicalSize::new(8192, 8192), 8192));
        assert!(!fits_surface(PhysicalSize::new(8193, 10), 8192));
        assert!(!fits_surface(PhysicalSize::new(10, 9000), 8192));
        assert!(!fits_surface(PhysicalSize::new(0, 10), 8192));
    }
}
