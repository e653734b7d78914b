//! Boa: a small helper layer over winit + wgpu.
//!
//! Window and GPU context creation, WGSL shader compilation and pipeline
//! linking, texture loading, and one-shot geometry upload.

pub mod core;
pub mod device;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod render;
pub mod shader;
pub mod texture;
pub mod time;
pub mod window;
