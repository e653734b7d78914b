//! GPU context management.
//!
//! `Gpu` is the explicit stand-in for a "current context": every resource
//! helper in this crate takes the device/queue it exposes as a parameter.
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain) and its depth attachment
//! - acquiring frames and providing encoders/views for rendering

mod gpu;
mod init;
mod surface;
#[cfg(test)]
pub(crate) mod testing;

pub use gpu::{Gpu, GpuFrame, SurfaceErrorAction};
pub use init::GpuInit;
