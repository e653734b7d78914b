//! Renders one star-shaped polygon in an orthographic 2D scene.
//!
//! W/A/S/D move the camera, Escape quits.

mod app;
mod camera;
mod config;
mod polygon;

use boa::device::GpuInit;
use boa::logging::{LoggingConfig, init_logging};
use boa::window::{ContextHints, Runtime, WindowConfig};

use crate::app::PolygonDemo;
use crate::config::DemoConfig;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = DemoConfig::from_env();
    app::check_shader_dir(&config)?;

    let runtime = Runtime::init(ContextHints {
        version: config.context_version,
        resizable: false,
        ..Default::default()
    })?;

    let window = WindowConfig::new(config.width, config.height, config.title.clone());
    let gpu_init = GpuInit {
        depth_format: Some(wgpu::TextureFormat::Depth32Float),
        ..Default::default()
    };

    runtime.run(window, gpu_init, PolygonDemo::new(config))
}
