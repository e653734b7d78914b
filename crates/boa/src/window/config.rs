use crate::device::GpuInit;

/// Context requirements fixed once, when the runtime is initialized.
#[derive(Debug, Clone)]
pub struct ContextHints {
    /// Requested `(major, minor)` context version.
    ///
    /// Only meaningful for the GL backend: major 3 selects the GLES 3 minor
    /// version. Anything else is left to wgpu.
    pub version: (u8, u8),

    /// Whether windows created by the runtime can be resized by the user.
    pub resizable: bool,

    /// Native APIs wgpu may pick from. Overrides [`GpuInit::backends`].
    pub backends: wgpu::Backends,
}

impl Default for ContextHints {
    fn default() -> Self {
        Self {
            version: (3, 3),
            resizable: true,
            backends: wgpu::Backends::all(),
        }
    }
}

impl ContextHints {
    /// GLES 3 minor version for the requested context version.
    pub fn gles_minor_version(&self) -> wgpu::Gles3MinorVersion {
        match self.version {
            (3, 0) => wgpu::Gles3MinorVersion::Version0,
            (3, 1) => wgpu::Gles3MinorVersion::Version1,
            (3, 2) => wgpu::Gles3MinorVersion::Version2,
            (3, _) => wgpu::Gles3MinorVersion::Automatic,
            (major, minor) => {
                log::warn!(
                    "context version {major}.{minor} has no GLES 3 equivalent; letting wgpu choose"
                );
                wgpu::Gles3MinorVersion::Automatic
            }
        }
    }

    /// Folds these hints into the GPU initialization parameters.
    pub fn apply(&self, init: GpuInit) -> GpuInit {
        GpuInit {
            backends: self.backends,
            gles_minor_version: self.gles_minor_version(),
            ..init
        }
    }
}

/// Where a window is shown.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum MonitorMode {
    #[default]
    Windowed,
    /// Borderless fullscreen on the current monitor.
    Fullscreen,
}

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Inner width in logical pixels.
    pub width: u32,
    /// Inner height in logical pixels.
    pub height: u32,
    pub title: String,
    pub monitor: MonitorMode,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "boa".to_string(),
            monitor: MonitorMode::Windowed,
        }
    }
}

impl WindowConfig {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            ..Default::default()
        }
    }

    pub(crate) fn attributes(&self, resizable: bool) -> winit::window::WindowAttributes {
        let fullscreen = match self.monitor {
            MonitorMode::Windowed => None,
            MonitorMode::Fullscreen => Some(winit::window::Fullscreen::Borderless(None)),
        };

        winit::window::Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                f64::from(self.width.max(1)),
                f64::from(self.height.max(1)),
            ))
            .with_resizable(resizable)
            .with_fullscreen(fullscreen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gles_minor_follows_requested_version() {
        let hints = |version| ContextHints {
            version,
            ..Default::default()
        };
        assert_eq!(hints((3, 0)).gles_minor_version(), wgpu::Gles3MinorVersion::Version0);
        assert_eq!(hints((3, 2)).gles_minor_version(), wgpu::Gles3MinorVersion::Version2);
        assert_eq!(hints((3, 3)).gles_minor_version(), wgpu::Gles3MinorVersion::Automatic);
        assert_eq!(hints((4, 6)).gles_minor_version(), wgpu::Gles3MinorVersion::Automatic);
    }

    #[test]
    fn hints_override_backends_and_keep_the_rest() {
        let hints = ContextHints {
            version: (3, 1),
            resizable: false,
            backends: wgpu::Backends::GL,
        };
        let init = hints.apply(GpuInit {
            present_mode: wgpu::PresentMode::Immediate,
            ..Default::default()
        });

        assert_eq!(init.backends, wgpu::Backends::GL);
        assert_eq!(init.gles_minor_version, wgpu::Gles3MinorVersion::Version1);
        assert_eq!(init.present_mode, wgpu::PresentMode::Immediate);
    }

    #[test]
    fn attributes_carry_size_title_and_resizable() {
        let attrs = WindowConfig::new(640, 480, "Adder Physics Engine").attributes(false);
        assert_eq!(attrs.title, "Adder Physics Engine");
        assert!(!attrs.resizable);
        assert!(attrs.fullscreen.is_none());
        assert_eq!(
            attrs.inner_size,
            Some(winit::dpi::Size::Logical(winit::dpi::LogicalSize::new(640.0, 480.0)))
        );
    }
}
