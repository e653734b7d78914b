use std::borrow::Cow;
use std::path::{Path, PathBuf};

use naga::valid::Capabilities;

use super::caps::device_capabilities;
use super::{reflect, ShaderError, ShaderStage};

/// Validated, GPU-independent form of one shader source file.
///
/// Holds the naga module so the linker can inspect entry points, stage
/// interfaces and uniform layout without touching the device.
#[derive(Debug)]
pub struct ShaderIr {
    path: PathBuf,
    stage: ShaderStage,
    entry_point: String,
    source: String,
    module: naga::Module,
    info: naga::valid::ModuleInfo,
    entry_index: usize,
}

impl ShaderIr {
    /// Reads `path` verbatim and compiles it for `stage`, accepting every
    /// shader capability.
    pub fn load(path: impl AsRef<Path>, stage: ShaderStage) -> Result<Self, ShaderError> {
        Self::load_with(path, stage, Capabilities::all())
    }

    /// Like [`load`](Self::load), validating against `caps`.
    pub fn load_with(
        path: impl AsRef<Path>,
        stage: ShaderStage,
        caps: Capabilities,
    ) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source_with(path, source, stage, caps)
    }

    /// Compiles in-memory WGSL. `path` is only used to label diagnostics.
    pub fn from_source(
        path: impl Into<PathBuf>,
        source: String,
        stage: ShaderStage,
    ) -> Result<Self, ShaderError> {
        Self::from_source_with(path, source, stage, Capabilities::all())
    }

    /// Like [`from_source`](Self::from_source), validating against `caps`.
    pub fn from_source_with(
        path: impl Into<PathBuf>,
        source: String,
        stage: ShaderStage,
        caps: Capabilities,
    ) -> Result<Self, ShaderError> {
        let path = path.into();

        let module = naga::front::wgsl::parse_str(&source).map_err(|e| ShaderError::Parse {
            message: e.emit_to_string(&source),
            path: path.clone(),
        })?;

        let mut validator =
            naga::valid::Validator::new(naga::valid::ValidationFlags::all(), caps);
        let info = validator
            .validate(&module)
            .map_err(|e| ShaderError::Validation {
                message: e.emit_to_string(&source),
                path: path.clone(),
            })?;

        let mut candidates = module
            .entry_points
            .iter()
            .enumerate()
            .filter(|(_, ep)| ep.stage == stage.to_naga());

        let Some((entry_index, entry)) = candidates.next() else {
            return Err(ShaderError::MissingEntryPoint { path, stage });
        };
        let entry_point = entry.name.clone();

        if candidates.next().is_some() {
            log::debug!(
                "{}: several {stage} entry points; using `{entry_point}`",
                path.display()
            );
        }

        Ok(Self {
            path,
            stage,
            entry_point,
            source,
            module,
            info,
            entry_index,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Name of the entry point used for this shader's stage.
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn module(&self) -> &naga::Module {
        &self.module
    }

    pub(crate) fn naga_entry_point(&self) -> Option<&naga::EntryPoint> {
        self.module.entry_points.get(self.entry_index)
    }

    /// Resource bindings the selected entry point actually uses.
    pub(crate) fn used_resources(&self) -> Vec<reflect::ResourceBinding> {
        let usage = self.info.get_entry_point(self.entry_index);
        reflect::resource_bindings(&self.module, |var| !usage[var].is_empty())
    }
}

/// A compiled shader: validated IR plus the device-side module.
///
/// Only needed until the pipeline using it is linked.
pub struct Shader {
    ir: ShaderIr,
    module: wgpu::ShaderModule,
}

impl Shader {
    /// Creates the device module for already-validated `ir`.
    pub(crate) fn new(device: &wgpu::Device, ir: ShaderIr) -> Self {
        let label = ir.path.display().to_string();
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(ir.source())),
        });

        log::debug!("compiled {} shader {label} (entry `{}`)", ir.stage, ir.entry_point);

        Self { ir, module }
    }

    pub fn ir(&self) -> &ShaderIr {
        &self.ir
    }

    pub fn stage(&self) -> ShaderStage {
        self.ir.stage
    }

    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }
}

/// Reads and compiles the shader at `path` for `stage` on `device`.
///
/// Failures are logged with the source path and the compiler diagnostic, then
/// returned; nothing is created on the device in that case.
pub fn compile(
    device: &wgpu::Device,
    path: impl AsRef<Path>,
    stage: ShaderStage,
) -> Result<Shader, ShaderError> {
    compile_with(device, path, stage, device_capabilities(device))
}

/// Like [`compile`], validating against `caps` (see
/// [`capabilities_for`](super::capabilities_for)).
pub fn compile_with(
    device: &wgpu::Device,
    path: impl AsRef<Path>,
    stage: ShaderStage,
    caps: Capabilities,
) -> Result<Shader, ShaderError> {
    let ir = ShaderIr::load_with(path, stage, caps).inspect_err(|e| log::error!("{e}"))?;
    Ok(Shader::new(device, ir))
}
