//! Image-file textures.
//!
//! Images are decoded with the `image` crate, interpreted as RGB, expanded to
//! opaque RGBA8 (wgpu has no 3-channel format) and uploaded with a full mip
//! chain built on the host.

mod error;
mod load;
mod mip;

pub use error::TextureError;
pub use load::{decode_rgb, load, Texture};
pub use mip::{mip_chain, mip_level_count};
