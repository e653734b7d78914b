//! Shader compilation and pipeline linking.
//!
//! Shaders are WGSL files, one per stage. `compile` runs the source through
//! naga (parse + validate) before handing it to wgpu, so every diagnostic is
//! reported with the file it came from. `link` checks that a set of shaders
//! forms a usable render pipeline and builds it, along with the uniform block
//! the shaders declare at `@group(0) @binding(0)`. Any other resource the
//! shaders use lives in a bind group the caller supplies through
//! [`PipelineDesc::with_bind_group`].

mod caps;
mod compile;
mod error;
mod link;
mod reflect;
mod stage;

pub use caps::{capabilities_for, device_capabilities};
pub use compile::{compile, compile_with, Shader, ShaderIr};
pub use error::{LinkError, ShaderError};
pub use link::{link, GroupLayout, LinkPlan, Pipeline, PipelineDesc};
pub use reflect::{
    ResourceBinding, ResourceKind, TextureSample, UniformBlock, UniformKind, UniformMember,
    UniformSlot, UniformStaging,
};
pub use stage::ShaderStage;
