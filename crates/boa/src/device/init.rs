/// Parameters for creating a window's [`Gpu`](super::Gpu).
///
/// The defaults give a vsync'd sRGB surface with a `Depth32Float` depth
/// attachment on whichever native API wgpu finds first.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub backends: wgpu::Backends,

    /// GLES 3 minor version; only read by the GL backend.
    pub gles_minor_version: wgpu::Gles3MinorVersion,

    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Depth attachment kept next to the surface and cleared every frame.
    /// `None` renders without depth testing.
    pub depth_format: Option<wgpu::TextureFormat>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint only.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            gles_minor_version: wgpu::Gles3MinorVersion::Automatic,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            depth_format: Some(wgpu::TextureFormat::Depth32Float),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
