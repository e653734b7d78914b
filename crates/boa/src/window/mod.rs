//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window, and wires them to the GPU layer.

mod config;
mod runtime;

pub use config::{ContextHints, MonitorMode, WindowConfig};
pub use runtime::{Runtime, RuntimeCtx};
