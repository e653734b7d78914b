use std::path::{Path, PathBuf};

use super::{ResourceKind, ShaderStage};

/// Failure to turn one shader source file into a shader.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("{}: failed to read shader source: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{}: {message}", path.display())]
    Validation { path: PathBuf, message: String },

    #[error("{}: no {stage} entry point", path.display())]
    MissingEntryPoint { path: PathBuf, stage: ShaderStage },
}

impl ShaderError {
    /// Source file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            ShaderError::Io { path, .. }
            | ShaderError::Parse { path, .. }
            | ShaderError::Validation { path, .. }
            | ShaderError::MissingEntryPoint { path, .. } => path,
        }
    }
}

/// Failure to link a set of shaders into a render pipeline, or to resolve one
/// of its uniform inputs.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("no {0} shader supplied")]
    MissingStage(ShaderStage),

    #[error("{stage} stage supplied twice ({} and {})", first.display(), second.display())]
    DuplicateStage {
        stage: ShaderStage,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("{stage} shader {} cannot be part of a render pipeline", path.display())]
    UnsupportedStage { stage: ShaderStage, path: PathBuf },

    #[error("fragment input @location({location}) is not written by the vertex stage")]
    InterfaceMismatch { location: u32 },

    #[error("uniform block at @group(0) @binding(0) differs between {} and {}", first.display(), second.display())]
    UniformMismatch { first: PathBuf, second: PathBuf },

    #[error("{}: @group({group}) @binding({binding}) is not provided by any bind group layout", path.display())]
    UnboundResource {
        group: u32,
        binding: u32,
        path: PathBuf,
    },

    #[error("{}: @group({group}) @binding({binding}) expects {expected:?}, layout provides {found:?}", path.display())]
    ResourceTypeMismatch {
        group: u32,
        binding: u32,
        path: PathBuf,
        expected: ResourceKind,
        found: wgpu::BindingType,
    },

    #[error("{}: @group({group}) @binding({binding}) is not visible to the {stage} stage", path.display())]
    ResourceNotVisible {
        group: u32,
        binding: u32,
        path: PathBuf,
        stage: ShaderStage,
    },

    #[error("bind group {0} is reserved for the pipeline's uniform block")]
    ReservedGroup(u32),

    #[error("bind group {0} supplied twice")]
    DuplicateGroup(u32),

    #[error("no uniform named `{0}`")]
    UnknownUniform(String),

    #[error("uniform `{name}` is not a mat4x4<f32>")]
    NotMat4 { name: String },
}
