use std::collections::BTreeSet;

use super::LinkError;

/// Bind group and binding of the uniform block a pipeline manages itself.
pub(crate) const UNIFORM_GROUP: u32 = 0;
pub(crate) const UNIFORM_BINDING: u32 = 0;

/// Coarse type of a uniform member, enough to check writes against.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Mat4,
    Other,
}

/// One named member of a uniform block.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformMember {
    pub name: String,
    pub offset: u32,
    pub size: u32,
    pub kind: UniformKind,
}

/// Layout of the uniform buffer at `@group(0) @binding(0)`, as declared by a shader.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformBlock {
    pub size: u32,
    pub members: Vec<UniformMember>,
}

/// Resolved byte range of a uniform member.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformSlot {
    offset: u32,
    size: u32,
}

impl UniformSlot {
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

impl UniformBlock {
    /// Looks up a member by name. Unknown names are an error, never a silent no-op.
    pub fn resolve(&self, name: &str) -> Result<UniformSlot, LinkError> {
        self.members
            .iter()
            .find(|m| m.name == name)
            .map(|m| UniformSlot {
                offset: m.offset,
                size: m.size,
            })
            .ok_or_else(|| LinkError::UnknownUniform(name.to_string()))
    }

    /// Like [`resolve`](Self::resolve), but also requires a `mat4x4<f32>` member.
    pub fn resolve_mat4(&self, name: &str) -> Result<UniformSlot, LinkError> {
        let slot = self.resolve(name)?;
        match self.members.iter().find(|m| m.name == name) {
            Some(m) if m.kind == UniformKind::Mat4 => Ok(slot),
            _ => Err(LinkError::NotMat4 {
                name: name.to_string(),
            }),
        }
    }

    /// Buffer size to allocate: the block span rounded up to 16 bytes.
    pub fn buffer_size(&self) -> u64 {
        (u64::from(self.size.max(1)) + 15) & !15
    }
}

/// Host copy of a uniform block; written by slot, uploaded in one piece.
#[derive(Debug, Clone)]
pub struct UniformStaging {
    block: UniformBlock,
    bytes: Vec<u8>,
    dirty: bool,
}

impl UniformStaging {
    pub fn new(block: UniformBlock) -> Self {
        let bytes = vec![0u8; block.buffer_size() as usize];
        Self {
            block,
            bytes,
            dirty: true,
        }
    }

    pub fn block(&self) -> &UniformBlock {
        &self.block
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Writes `value` into `slot`. Slots are resolved against this block, so a
    /// slot that does not fit means it came from another pipeline; it is dropped.
    pub fn write(&mut self, slot: UniformSlot, value: &[u8]) {
        let start = slot.offset as usize;
        let len = value.len().min(slot.size as usize);
        match self.bytes.get_mut(start..start + len) {
            Some(dst) => {
                dst.copy_from_slice(&value[..len]);
                self.dirty = true;
            }
            None => log::warn!(
                "uniform write at offset {} ({} bytes) is outside the {}-byte block",
                slot.offset,
                len,
                self.bytes.len()
            ),
        }
    }

    pub fn write_mat4(&mut self, slot: UniformSlot, m: &glam::Mat4) {
        let cols = m.to_cols_array();
        self.write(slot, bytemuck::cast_slice(&cols));
    }

    /// Returns the bytes if they changed since the last call.
    pub(crate) fn take_dirty(&mut self) -> Option<&[u8]> {
        if std::mem::take(&mut self.dirty) {
            Some(&self.bytes)
        } else {
            None
        }
    }
}

/// Reflects the uniform block a module declares at `@group(0) @binding(0)`.
pub(crate) fn uniform_block(module: &naga::Module) -> Option<UniformBlock> {
    let (_, var) = module.global_variables.iter().find(|(_, var)| {
        var.space == naga::AddressSpace::Uniform
            && var
                .binding
                .as_ref()
                .is_some_and(|b| b.group == UNIFORM_GROUP && b.binding == UNIFORM_BINDING)
    })?;

    let ty = &module.types[var.ty];

    let block = match &ty.inner {
        naga::TypeInner::Struct { members, span } => UniformBlock {
            size: *span,
            members: members
                .iter()
                .filter_map(|m| {
                    let inner = &module.types[m.ty].inner;
                    Some(UniformMember {
                        name: m.name.clone()?,
                        offset: m.offset,
                        size: inner.size(module.to_ctx()),
                        kind: kind_of(inner),
                    })
                })
                .collect(),
        },
        inner => {
            // A bare `var<uniform> name: T` is addressed by the variable name.
            let size = inner.size(module.to_ctx());
            UniformBlock {
                size,
                members: var
                    .name
                    .clone()
                    .map(|name| UniformMember {
                        name,
                        offset: 0,
                        size,
                        kind: kind_of(inner),
                    })
                    .into_iter()
                    .collect(),
            }
        }
    };

    Some(block)
}

fn kind_of(inner: &naga::TypeInner) -> UniformKind {
    match inner {
        naga::TypeInner::Matrix {
            columns: naga::VectorSize::Quad,
            rows: naga::VectorSize::Quad,
            scalar,
        } if scalar.kind == naga::ScalarKind::Float && scalar.width == 4 => UniformKind::Mat4,
        _ => UniformKind::Other,
    }
}

/// Sample type a sampled texture binding is read as.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureSample {
    Float,
    Depth,
    Sint,
    Uint,
}

/// What a shader expects to find at a resource binding.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResourceKind {
    UniformBuffer,
    StorageBuffer {
        writable: bool,
    },
    Texture {
        dimension: wgpu::TextureViewDimension,
        sample: TextureSample,
        multisampled: bool,
    },
    StorageTexture {
        dimension: wgpu::TextureViewDimension,
    },
    Sampler {
        comparison: bool,
    },
    /// Acceleration structures and external textures; only presence is checked.
    Other,
}

impl ResourceKind {
    /// Whether a bind group layout entry of type `ty` can back this binding.
    pub fn accepts(&self, ty: &wgpu::BindingType) -> bool {
        use wgpu::{BindingType as B, BufferBindingType as Buf};

        match (*self, ty) {
            (ResourceKind::UniformBuffer, B::Buffer { ty: Buf::Uniform, .. }) => true,
            (ResourceKind::StorageBuffer { writable }, B::Buffer { ty: Buf::Storage { read_only }, .. }) => {
                !(writable && *read_only)
            }
            (
                ResourceKind::Texture {
                    dimension,
                    sample,
                    multisampled,
                },
                B::Texture {
                    sample_type,
                    view_dimension,
                    multisampled: layout_multisampled,
                },
            ) => {
                let sample_matches = matches!(
                    (sample, sample_type),
                    (TextureSample::Float, wgpu::TextureSampleType::Float { .. })
                        | (TextureSample::Depth, wgpu::TextureSampleType::Depth)
                        | (TextureSample::Sint, wgpu::TextureSampleType::Sint)
                        | (TextureSample::Uint, wgpu::TextureSampleType::Uint)
                );
                sample_matches
                    && dimension == *view_dimension
                    && multisampled == *layout_multisampled
            }
            (ResourceKind::StorageTexture { dimension }, B::StorageTexture { view_dimension, .. }) => {
                dimension == *view_dimension
            }
            (ResourceKind::Sampler { comparison }, B::Sampler(sampler)) => {
                comparison == (*sampler == wgpu::SamplerBindingType::Comparison)
            }
            (ResourceKind::Other, _) => true,
            _ => false,
        }
    }
}

/// A `@group(g) @binding(b)` global declared by a module.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ResourceBinding {
    pub group: u32,
    pub binding: u32,
    pub kind: ResourceKind,
}

/// Reflects the resource bindings of a module for which `used` holds, in
/// declaration order.
pub(crate) fn resource_bindings(
    module: &naga::Module,
    used: impl Fn(naga::Handle<naga::GlobalVariable>) -> bool,
) -> Vec<ResourceBinding> {
    module
        .global_variables
        .iter()
        .filter(|(handle, _)| used(*handle))
        .filter_map(|(_, var)| {
            let binding = var.binding.as_ref()?;
            Some(ResourceBinding {
                group: binding.group,
                binding: binding.binding,
                kind: resource_kind(module, var.space, var.ty),
            })
        })
        .collect()
}

fn resource_kind(
    module: &naga::Module,
    space: naga::AddressSpace,
    ty: naga::Handle<naga::Type>,
) -> ResourceKind {
    match space {
        naga::AddressSpace::Uniform => return ResourceKind::UniformBuffer,
        naga::AddressSpace::Storage { access } => {
            return ResourceKind::StorageBuffer {
                writable: access.contains(naga::StorageAccess::STORE),
            };
        }
        _ => {}
    }

    match &module.types[ty].inner {
        naga::TypeInner::BindingArray { base, .. } => resource_kind(module, space, *base),
        naga::TypeInner::Sampler { comparison } => ResourceKind::Sampler {
            comparison: *comparison,
        },
        naga::TypeInner::Image {
            dim,
            arrayed,
            class,
        } => {
            let dimension = view_dimension(*dim, *arrayed);
            match *class {
                naga::ImageClass::Sampled { kind, multi } => ResourceKind::Texture {
                    dimension,
                    sample: match kind {
                        naga::ScalarKind::Sint => TextureSample::Sint,
                        naga::ScalarKind::Uint => TextureSample::Uint,
                        _ => TextureSample::Float,
                    },
                    multisampled: multi,
                },
                naga::ImageClass::Depth { multi } => ResourceKind::Texture {
                    dimension,
                    sample: TextureSample::Depth,
                    multisampled: multi,
                },
                naga::ImageClass::Storage { .. } => ResourceKind::StorageTexture { dimension },
                naga::ImageClass::External => ResourceKind::Other,
            }
        }
        _ => ResourceKind::Other,
    }
}

fn view_dimension(dim: naga::ImageDimension, arrayed: bool) -> wgpu::TextureViewDimension {
    use wgpu::TextureViewDimension as V;
    match (dim, arrayed) {
        (naga::ImageDimension::D1, _) => V::D1,
        (naga::ImageDimension::D2, false) => V::D2,
        (naga::ImageDimension::D2, true) => V::D2Array,
        (naga::ImageDimension::D3, _) => V::D3,
        (naga::ImageDimension::Cube, false) => V::Cube,
        (naga::ImageDimension::Cube, true) => V::CubeArray,
    }
}

/// `@location`s written by an entry point's result.
pub(crate) fn output_locations(module: &naga::Module, ep: &naga::EntryPoint) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    if let Some(result) = &ep.function.result {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

/// `@location`s read by an entry point's arguments.
pub(crate) fn input_locations(module: &naga::Module, ep: &naga::EntryPoint) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    for arg in &ep.function.arguments {
        collect_locations(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(_) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_locations(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}
