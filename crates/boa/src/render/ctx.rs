/// Drawable size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Orthographic projection mapping `(0, 0)..(width, height)` to the full
    /// target, +Y up, depth range `-1..1`.
    pub fn ortho(self) -> glam::Mat4 {
        glam::Mat4::orthographic_rh(0.0, self.width, 0.0, self.height, -1.0, 1.0)
    }
}

/// Device handles and target formats for the frame being recorded.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            depth_format,
            viewport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_nan_viewport_is_invalid() {
        assert!(Viewport::new(640.0, 480.0).is_valid());
        assert!(!Viewport::new(0.0, 480.0).is_valid());
        assert!(!Viewport::new(f32::NAN, 480.0).is_valid());
    }

    #[test]
    fn ortho_maps_corners_to_ndc() {
        let proj = Viewport::new(640.0, 480.0).ortho();
        let lo = proj.project_point3(glam::vec3(0.0, 0.0, 0.0));
        let hi = proj.project_point3(glam::vec3(640.0, 480.0, 0.0));
        assert!((lo.x + 1.0).abs() < 1e-6 && (lo.y + 1.0).abs() < 1e-6);
        assert!((hi.x - 1.0).abs() < 1e-6 && (hi.y - 1.0).abs() < 1e-6);
    }
}
