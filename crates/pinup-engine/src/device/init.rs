/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and paces the loop to the display.
    pub present_mode: wgpu::PresentMode,

    /// Alpha modes to try, in order of preference.
    ///
    /// The first one supported by the surface wins; if none is, the surface's
    /// first advertised mode is used. A transparent widget needs a
    /// non-opaque mode to show the desktop behind it.
    pub alpha_modes: Vec<wgpu::CompositeAlphaMode>,

    /// Requested MSAA sample count.
    ///
    /// Clamped down to the highest count the adapter supports for the surface format.
    pub sample_count: u32,

    /// Desired maximum frame latency for the surface.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_modes: vec![
                wgpu::CompositeAlphaMode::PreMultiplied,
                wgpu::CompositeAlphaMode::PostMultiplied,
                wgpu::CompositeAlphaMode::Inherit,
            ],
            sample_count: 8,
            desired_maximum_frame_latency: 2,
        }
    }
}
