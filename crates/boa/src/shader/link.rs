use super::reflect::{
    self, ResourceKind, UNIFORM_BINDING, UNIFORM_GROUP, UniformBlock, UniformSlot, UniformStaging,
};
use super::{LinkError, Shader, ShaderIr, ShaderStage};

/// Shape of a bind group the caller supplies for a pipeline: its index and
/// the entries of its layout.
#[derive(Debug, Copy, Clone)]
pub struct GroupLayout<'a> {
    pub group: u32,
    pub entries: &'a [wgpu::BindGroupLayoutEntry],
}

impl<'a> GroupLayout<'a> {
    pub fn new(group: u32, entries: &'a [wgpu::BindGroupLayoutEntry]) -> Self {
        Self { group, entries }
    }

    fn entry(&self, binding: u32) -> Option<&'a wgpu::BindGroupLayoutEntry> {
        self.entries.iter().find(|e| e.binding == binding)
    }
}

/// Result of checking a shader set for a render pipeline.
///
/// Produced without a device, so link failures are caught before any GPU
/// object exists.
#[derive(Debug)]
pub struct LinkPlan {
    vertex: usize,
    fragment: Option<usize>,
    uniforms: Option<UniformBlock>,
    uniform_visibility: wgpu::ShaderStages,
    group_count: u32,
}

impl LinkPlan {
    /// Checks that `shaders` (in any order) form a render pipeline:
    /// exactly one vertex stage, at most one fragment stage, matching stage
    /// interfaces and a consistent uniform block.
    ///
    /// Every other resource the entry points use must be declared, with a
    /// compatible type and visibility, by one of `groups`. Group 0 belongs
    /// to the uniform block when the shaders declare one.
    pub fn check(shaders: &[&ShaderIr], groups: &[GroupLayout<'_>]) -> Result<Self, LinkError> {
        let mut vertex: Option<usize> = None;
        let mut fragment: Option<usize> = None;

        for (i, ir) in shaders.iter().enumerate() {
            let slot = match ir.stage() {
                ShaderStage::Vertex => &mut vertex,
                ShaderStage::Fragment => &mut fragment,
                stage @ ShaderStage::Compute => {
                    return Err(LinkError::UnsupportedStage {
                        stage,
                        path: ir.path().to_path_buf(),
                    });
                }
            };
            if let Some(first) = *slot {
                return Err(LinkError::DuplicateStage {
                    stage: ir.stage(),
                    first: shaders[first].path().to_path_buf(),
                    second: ir.path().to_path_buf(),
                });
            }
            *slot = Some(i);
        }

        let vertex = vertex.ok_or(LinkError::MissingStage(ShaderStage::Vertex))?;

        if let Some(fragment) = fragment {
            check_interface(shaders[vertex], shaders[fragment])?;
        }

        let mut uniforms: Option<(UniformBlock, usize)> = None;
        let mut uniform_visibility = wgpu::ShaderStages::NONE;
        for i in std::iter::once(vertex).chain(fragment) {
            let Some(block) = reflect::uniform_block(shaders[i].module()) else {
                continue;
            };
            match &uniforms {
                Some((existing, first)) if *existing != block => {
                    return Err(LinkError::UniformMismatch {
                        first: shaders[*first].path().to_path_buf(),
                        second: shaders[i].path().to_path_buf(),
                    });
                }
                Some(_) => {}
                None => uniforms = Some((block, i)),
            }
            uniform_visibility |= shaders[i].stage().wgpu_stages();
        }

        for (i, layout) in groups.iter().enumerate() {
            if uniforms.is_some() && layout.group == UNIFORM_GROUP {
                return Err(LinkError::ReservedGroup(layout.group));
            }
            if groups[..i].iter().any(|g| g.group == layout.group) {
                return Err(LinkError::DuplicateGroup(layout.group));
            }
        }

        let mut group_count = groups.iter().map(|g| g.group + 1).max().unwrap_or(0);
        if uniforms.is_some() {
            group_count = group_count.max(UNIFORM_GROUP + 1);
        }
        for i in std::iter::once(vertex).chain(fragment) {
            group_count = group_count.max(check_resources(shaders[i], groups)?);
        }

        Ok(Self {
            vertex,
            fragment,
            uniforms: uniforms.map(|(block, _)| block),
            uniform_visibility,
            group_count,
        })
    }

    /// Index of the vertex shader in the checked set.
    pub fn vertex(&self) -> usize {
        self.vertex
    }

    /// Index of the fragment shader in the checked set, if any.
    pub fn fragment(&self) -> Option<usize> {
        self.fragment
    }

    /// The merged uniform block, if any stage declares one.
    pub fn uniforms(&self) -> Option<&UniformBlock> {
        self.uniforms.as_ref()
    }

    pub fn uniform_visibility(&self) -> wgpu::ShaderStages {
        self.uniform_visibility
    }

    /// Number of bind group slots the pipeline layout needs.
    pub fn group_count(&self) -> u32 {
        self.group_count
    }
}

/// Matches the resources `ir` uses against `groups`; returns the number of
/// group slots they span.
fn check_resources(ir: &ShaderIr, groups: &[GroupLayout<'_>]) -> Result<u32, LinkError> {
    let mut span = 0;

    for res in ir.used_resources() {
        span = span.max(res.group + 1);

        let managed = res.group == UNIFORM_GROUP
            && res.binding == UNIFORM_BINDING
            && res.kind == ResourceKind::UniformBuffer;
        if managed {
            continue;
        }

        let entry = groups
            .iter()
            .find(|g| g.group == res.group)
            .and_then(|g| g.entry(res.binding));
        let Some(entry) = entry else {
            return Err(LinkError::UnboundResource {
                group: res.group,
                binding: res.binding,
                path: ir.path().to_path_buf(),
            });
        };

        if !res.kind.accepts(&entry.ty) {
            return Err(LinkError::ResourceTypeMismatch {
                group: res.group,
                binding: res.binding,
                path: ir.path().to_path_buf(),
                expected: res.kind,
                found: entry.ty,
            });
        }

        if !entry.visibility.contains(ir.stage().wgpu_stages()) {
            return Err(LinkError::ResourceNotVisible {
                group: res.group,
                binding: res.binding,
                path: ir.path().to_path_buf(),
                stage: ir.stage(),
            });
        }
    }

    Ok(span)
}

fn check_interface(vertex: &ShaderIr, fragment: &ShaderIr) -> Result<(), LinkError> {
    let (Some(vs), Some(fs)) = (vertex.naga_entry_point(), fragment.naga_entry_point()) else {
        return Ok(());
    };

    let written = reflect::output_locations(vertex.module(), vs);
    let read = reflect::input_locations(fragment.module(), fs);

    match read.difference(&written).next() {
        Some(&location) => Err(LinkError::InterfaceMismatch { location }),
        None => Ok(()),
    }
}

/// Fixed-function state of a render pipeline.
#[derive(Debug, Clone)]
pub struct PipelineDesc<'a> {
    pub label: &'a str,
    pub color_format: wgpu::TextureFormat,
    /// Depth attachment format; enables `Less` depth testing with writes.
    pub depth_format: Option<wgpu::TextureFormat>,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub topology: wgpu::PrimitiveTopology,
    pub cull_mode: Option<wgpu::Face>,
    /// Caller-owned bind groups, each with the layout it was created from.
    pub bind_groups: Vec<(GroupLayout<'a>, &'a wgpu::BindGroupLayout)>,
}

impl<'a> PipelineDesc<'a> {
    pub fn new(label: &'a str, color_format: wgpu::TextureFormat) -> Self {
        Self {
            label,
            color_format,
            depth_format: None,
            vertex_buffers: &[],
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            bind_groups: Vec::new(),
        }
    }

    pub fn with_depth(mut self, format: Option<wgpu::TextureFormat>) -> Self {
        self.depth_format = format;
        self
    }

    pub fn with_vertex_buffers(mut self, layouts: &'a [wgpu::VertexBufferLayout<'a>]) -> Self {
        self.vertex_buffers = layouts;
        self
    }

    /// Adds a bind group slot. `layout` must have been created from
    /// `shape.entries`; the caller sets the matching bind group at
    /// `shape.group` before drawing.
    pub fn with_bind_group(
        mut self,
        shape: GroupLayout<'a>,
        layout: &'a wgpu::BindGroupLayout,
    ) -> Self {
        self.bind_groups.push((shape, layout));
        self
    }

    fn supplied_layout(&self, group: u32) -> Option<&'a wgpu::BindGroupLayout> {
        self.bind_groups
            .iter()
            .find(|(shape, _)| shape.group == group)
            .map(|(_, layout)| *layout)
    }
}

struct UniformBinding {
    staging: UniformStaging,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// A linked render pipeline plus the uniform buffer its shaders read.
pub struct Pipeline {
    label: String,
    pipeline: wgpu::RenderPipeline,
    uniforms: Option<UniformBinding>,
    /// Empty bind group for group slots nobody supplies.
    gaps: Option<(Vec<u32>, wgpu::BindGroup)>,
}

/// Links `shaders` (any order) into a render pipeline on `device`.
///
/// Link failures are logged and returned before anything is created.
pub fn link(
    device: &wgpu::Device,
    shaders: &[&Shader],
    desc: &PipelineDesc<'_>,
) -> Result<Pipeline, LinkError> {
    let irs: Vec<&ShaderIr> = shaders.iter().map(|s| s.ir()).collect();
    let shapes: Vec<GroupLayout<'_>> = desc.bind_groups.iter().map(|(shape, _)| *shape).collect();
    let plan = LinkPlan::check(&irs, &shapes)
        .inspect_err(|e| log::error!("failed to link pipeline `{}`: {e}", desc.label))?;

    let uniform_layout = plan.uniforms().map(|block| {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{} uniforms bgl", desc.label)),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: UNIFORM_BINDING,
                visibility: plan.uniform_visibility(),
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(u64::from(block.size)),
                },
                count: None,
            }],
        })
    });

    let slots: Vec<Option<&wgpu::BindGroupLayout>> = (0..plan.group_count())
        .map(|group| match &uniform_layout {
            Some(layout) if group == UNIFORM_GROUP => Some(layout),
            _ => desc.supplied_layout(group),
        })
        .collect();

    let gap_groups: Vec<u32> = (0u32..)
        .zip(&slots)
        .filter(|(_, slot)| slot.is_none())
        .map(|(group, _)| group)
        .collect();
    let empty_layout = (!gap_groups.is_empty()).then(|| {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{} empty bgl", desc.label)),
            entries: &[],
        })
    });

    let bind_group_layouts: Vec<&wgpu::BindGroupLayout> = slots
        .iter()
        .filter_map(|slot| slot.or(empty_layout.as_ref()))
        .collect();
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} layout", desc.label)),
        bind_group_layouts: &bind_group_layouts,
        immediate_size: 0,
    });

    let vertex = shaders[plan.vertex()];
    let fragment = plan.fragment().map(|i| shaders[i]);

    let color_targets = [Some(wgpu::ColorTargetState {
        format: desc.color_format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
    })];

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: vertex.module(),
            entry_point: Some(vertex.ir().entry_point()),
            compilation_options: Default::default(),
            buffers: desc.vertex_buffers,
        },

        fragment: fragment.map(|fs| wgpu::FragmentState {
            module: fs.module(),
            entry_point: Some(fs.ir().entry_point()),
            compilation_options: Default::default(),
            targets: &color_targets,
        }),

        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: desc.depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),

        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    let uniforms = match (plan.uniforms, uniform_layout) {
        (Some(block), Some(layout)) => {
            let staging = UniformStaging::new(block);
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{} uniforms", desc.label)),
                size: staging.block().buffer_size(),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} uniforms bind group", desc.label)),
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: UNIFORM_BINDING,
                    resource: buffer.as_entire_binding(),
                }],
            });
            Some(UniformBinding {
                staging,
                buffer,
                bind_group,
            })
        }
        _ => None,
    };

    let gaps = empty_layout.map(|layout| {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} empty bind group", desc.label)),
            layout: &layout,
            entries: &[],
        });
        (gap_groups, bind_group)
    });

    log::debug!(
        "linked pipeline `{}` ({} shaders, {} bind groups, uniforms: {})",
        desc.label,
        shaders.len(),
        plan.group_count,
        uniforms.is_some()
    );

    Ok(Pipeline {
        label: desc.label.to_string(),
        pipeline,
        uniforms,
        gaps,
    })
}

impl Pipeline {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Resolves a uniform input by name.
    pub fn uniform(&self, name: &str) -> Result<UniformSlot, LinkError> {
        self.block(name)?.resolve(name)
    }

    /// Resolves a `mat4x4<f32>` uniform input by name.
    pub fn uniform_mat4(&self, name: &str) -> Result<UniformSlot, LinkError> {
        self.block(name)?.resolve_mat4(name)
    }

    fn block(&self, name: &str) -> Result<&UniformBlock, LinkError> {
        self.uniforms
            .as_ref()
            .map(|u| u.staging.block())
            .ok_or_else(|| LinkError::UnknownUniform(name.to_string()))
    }

    pub fn set_mat4(&mut self, slot: UniformSlot, m: &glam::Mat4) {
        if let Some(u) = self.uniforms.as_mut() {
            u.staging.write_mat4(slot, m);
        }
    }

    /// Uploads uniform writes made since the last flush.
    pub fn flush(&mut self, queue: &wgpu::Queue) {
        let Some(u) = self.uniforms.as_mut() else { return };
        if let Some(bytes) = u.staging.take_dirty() {
            queue.write_buffer(&u.buffer, 0, bytes);
        }
    }

    /// Sets the pipeline and the bind groups it owns on `pass`. Groups
    /// supplied through [`PipelineDesc::with_bind_group`] are left to the caller.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        if let Some(u) = &self.uniforms {
            pass.set_bind_group(UNIFORM_GROUP, &u.bind_group, &[]);
        }
        if let Some((groups, empty)) = &self.gaps {
            for &group in groups {
                pass.set_bind_group(group, empty, &[]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::compile::tests::{ir, FRAGMENT, VERTEX};
    use crate::device::testing::{self, headless};
    use crate::geometry::{GeometryBuffers, MeshData};
    use crate::texture::Texture;

    #[test]
    fn vertex_and_fragment_link_in_any_order() {
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);
        let f = ir("f.wgsl", FRAGMENT, ShaderStage::Fragment);

        let plan = LinkPlan::check(&[&v, &f], &[]).unwrap();
        assert_eq!((plan.vertex(), plan.fragment()), (0, Some(1)));

        let plan = LinkPlan::check(&[&f, &v], &[]).unwrap();
        assert_eq!((plan.vertex(), plan.fragment()), (1, Some(0)));

        assert_eq!(plan.uniforms().map(|b| b.members.len()), Some(3));
        assert_eq!(plan.uniform_visibility(), wgpu::ShaderStages::VERTEX);
    }

    #[test]
    fn vertex_only_pipeline_links() {
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);
        let plan = LinkPlan::check(&[&v], &[]).unwrap();
        assert_eq!(plan.fragment(), None);
    }

    #[test]
    fn empty_set_is_missing_vertex_stage() {
        let err = LinkPlan::check(&[], &[]).unwrap_err();
        assert!(matches!(err, LinkError::MissingStage(ShaderStage::Vertex)));
    }

    #[test]
    fn fragment_only_is_missing_vertex_stage() {
        let f = ir("f.wgsl", FRAGMENT, ShaderStage::Fragment);
        assert!(matches!(
            LinkPlan::check(&[&f], &[]),
            Err(LinkError::MissingStage(ShaderStage::Vertex))
        ));
    }

    #[test]
    fn two_vertex_shaders_fail_to_link() {
        let a = ir("a.wgsl", VERTEX, ShaderStage::Vertex);
        let b = ir("b.wgsl", VERTEX, ShaderStage::Vertex);

        let err = LinkPlan::check(&[&a, &b], &[]).unwrap_err();
        match err {
            LinkError::DuplicateStage {
                stage,
                first,
                second,
            } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert_eq!(first.to_str(), Some("a.wgsl"));
                assert_eq!(second.to_str(), Some("b.wgsl"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn compute_shader_is_rejected() {
        let src = "@compute @workgroup_size(1) fn main() {}";
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);
        let c = ir("c.wgsl", src, ShaderStage::Compute);
        assert!(matches!(
            LinkPlan::check(&[&v, &c], &[]),
            Err(LinkError::UnsupportedStage {
                stage: ShaderStage::Compute,
                ..
            })
        ));
    }

    #[test]
    fn fragment_reading_unwritten_location_fails() {
        let src = r#"
@fragment
fn fs_main(@location(3) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(uv, 0.0, 1.0);
}
"#;
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);
        let f = ir("uv.wgsl", src, ShaderStage::Fragment);
        assert!(matches!(
            LinkPlan::check(&[&v, &f], &[]),
            Err(LinkError::InterfaceMismatch { location: 3 })
        ));
    }

    #[test]
    fn conflicting_uniform_blocks_fail() {
        let src = r#"
struct Tint { color: vec4<f32> }
@group(0) @binding(0) var<uniform> tint: Tint;

@fragment
fn fs_main(@location(0) local: vec3<f32>) -> @location(0) vec4<f32> {
    return tint.color;
}
"#;
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);
        let f = ir("tint.wgsl", src, ShaderStage::Fragment);
        assert!(matches!(
            LinkPlan::check(&[&v, &f], &[]),
            Err(LinkError::UniformMismatch { .. })
        ));
    }

    #[test]
    fn shared_uniform_block_is_visible_to_both_stages() {
        let src = r#"
struct Transforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
}
@group(0) @binding(0) var<uniform> transforms: Transforms;

@fragment
fn fs_main(@location(0) local: vec3<f32>) -> @location(0) vec4<f32> {
    return transforms.model[0];
}
"#;
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);
        let f = ir("f.wgsl", src, ShaderStage::Fragment);
        let plan = LinkPlan::check(&[&v, &f], &[]).unwrap();
        assert_eq!(
            plan.uniform_visibility(),
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT
        );
    }

    const TEXTURED_FRAGMENT: &str = r#"
@group(1) @binding(0) var tex: texture_2d<f32>;
@group(1) @binding(1) var samp: sampler;

@fragment
fn fs_main(@location(0) local: vec3<f32>) -> @location(0) vec4<f32> {
    return textureSample(tex, samp, local.xy);
}
"#;

    #[test]
    fn textured_fragment_without_its_group_is_unbound() {
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);
        let f = ir("textured.wgsl", TEXTURED_FRAGMENT, ShaderStage::Fragment);

        match LinkPlan::check(&[&v, &f], &[]).unwrap_err() {
            LinkError::UnboundResource {
                group,
                binding,
                path,
            } => {
                assert_eq!((group, binding), (1, 0));
                assert_eq!(path.to_str(), Some("textured.wgsl"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn textured_fragment_links_with_texture_group() {
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);
        let f = ir("textured.wgsl", TEXTURED_FRAGMENT, ShaderStage::Fragment);

        let plan = LinkPlan::check(&[&v, &f], &[Texture::group_layout(1)]).unwrap();
        assert_eq!(plan.group_count(), 2);
        assert!(plan.uniforms().is_some());
    }

    #[test]
    fn swapped_texture_and_sampler_is_a_type_mismatch() {
        let swapped = Texture::LAYOUT_ENTRIES.map(|mut e| {
            e.binding = 1 - e.binding;
            e
        });
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);
        let f = ir("textured.wgsl", TEXTURED_FRAGMENT, ShaderStage::Fragment);

        let err = LinkPlan::check(&[&v, &f], &[GroupLayout::new(1, &swapped)]).unwrap_err();
        assert!(
            matches!(
                err,
                LinkError::ResourceTypeMismatch {
                    group: 1,
                    binding: 0,
                    found: wgpu::BindingType::Sampler(_),
                    ..
                }
            ),
            "{err:?}"
        );
    }

    #[test]
    fn vertex_only_visibility_hides_the_texture() {
        let hidden = Texture::LAYOUT_ENTRIES.map(|mut e| {
            e.visibility = wgpu::ShaderStages::VERTEX;
            e
        });
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);
        let f = ir("textured.wgsl", TEXTURED_FRAGMENT, ShaderStage::Fragment);

        assert!(matches!(
            LinkPlan::check(&[&v, &f], &[GroupLayout::new(1, &hidden)]),
            Err(LinkError::ResourceNotVisible {
                group: 1,
                binding: 0,
                stage: ShaderStage::Fragment,
                ..
            })
        ));
    }

    #[test]
    fn uniform_group_cannot_be_supplied() {
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);
        assert!(matches!(
            LinkPlan::check(&[&v], &[Texture::group_layout(0)]),
            Err(LinkError::ReservedGroup(0))
        ));
    }

    #[test]
    fn group_supplied_twice_fails() {
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);
        assert!(matches!(
            LinkPlan::check(&[&v], &[Texture::group_layout(2), Texture::group_layout(2)]),
            Err(LinkError::DuplicateGroup(2))
        ));
    }

    #[test]
    fn skipped_groups_still_count_as_slots() {
        let f = ir(
            "textured.wgsl",
            &TEXTURED_FRAGMENT.replace("@group(1)", "@group(3)"),
            ShaderStage::Fragment,
        );
        let v = ir("v.wgsl", VERTEX, ShaderStage::Vertex);

        let plan = LinkPlan::check(&[&v, &f], &[Texture::group_layout(3)]).unwrap();
        assert_eq!(plan.group_count(), 4);
    }

    fn triangle() -> MeshData {
        MeshData::new(
            vec![0.0, 0.0, 0.5, 1.0, 0.0, 0.5, 0.0, 1.0, 0.5],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn textured_pipeline_draws_on_a_device() {
        let Some((device, queue)) = headless() else {
            return;
        };

        let vert = Shader::new(&device, ir("v.wgsl", VERTEX, ShaderStage::Vertex));
        let frag = Shader::new(
            &device,
            ir("textured.wgsl", TEXTURED_FRAGMENT, ShaderStage::Fragment),
        );

        let texture_layout = Texture::bind_group_layout(&device);
        let buffers = [MeshData::vertex_layout()];
        let desc = PipelineDesc::new("textured", testing::COLOR_FORMAT)
            .with_depth(Some(testing::DEPTH_FORMAT))
            .with_vertex_buffers(&buffers)
            .with_bind_group(Texture::group_layout(1), &texture_layout);
        let mut pipeline = link(&device, &[&frag, &vert], &desc).unwrap();

        let projection = pipeline.uniform_mat4("projection").unwrap();
        pipeline.set_mat4(projection, &glam::Mat4::orthographic_rh(0.0, 1.0, 0.0, 1.0, -1.0, 1.0));
        for name in ["model", "view"] {
            let slot = pipeline.uniform_mat4(name).unwrap();
            pipeline.set_mat4(slot, &glam::Mat4::IDENTITY);
        }
        pipeline.flush(&queue);

        let path = std::env::temp_dir().join(format!("boa-link-{}.png", std::process::id()));
        image::RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10])).save(&path).unwrap();
        let texture = crate::texture::load(&device, &queue, &path).unwrap();
        std::fs::remove_file(&path).ok();
        let texture_group = texture.bind_group(&device, &texture_layout);

        let geometry = GeometryBuffers::upload(&device, &triangle());
        let targets = testing::Targets::new(&device, 8, 8);
        targets.render(&device, &queue, |pass| {
            pipeline.bind(pass);
            pass.set_bind_group(1, &texture_group, &[]);
            geometry.draw(pass);
        });
    }

    #[test]
    fn unsupplied_groups_are_filled_on_a_device() {
        let Some((device, queue)) = headless() else {
            return;
        };

        let src = TEXTURED_FRAGMENT.replace("@group(1)", "@group(2)");
        let vert = Shader::new(&device, ir("v.wgsl", VERTEX, ShaderStage::Vertex));
        let frag = Shader::new(&device, ir("textured.wgsl", &src, ShaderStage::Fragment));

        let texture_layout = Texture::bind_group_layout(&device);
        let buffers = [MeshData::vertex_layout()];
        let desc = PipelineDesc::new("gap", testing::COLOR_FORMAT)
            .with_depth(Some(testing::DEPTH_FORMAT))
            .with_vertex_buffers(&buffers)
            .with_bind_group(Texture::group_layout(2), &texture_layout);
        let mut pipeline = link(&device, &[&vert, &frag], &desc).unwrap();
        pipeline.flush(&queue);

        let path = std::env::temp_dir().join(format!("boa-gap-{}.png", std::process::id()));
        image::RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 255])).save(&path).unwrap();
        let texture = crate::texture::load(&device, &queue, &path).unwrap();
        std::fs::remove_file(&path).ok();
        let texture_group = texture.bind_group(&device, &texture_layout);

        let geometry = GeometryBuffers::upload(&device, &triangle());
        let targets = testing::Targets::new(&device, 8, 8);
        targets.render(&device, &queue, |pass| {
            pipeline.bind(pass);
            pass.set_bind_group(2, &texture_group, &[]);
            geometry.draw(pass);
        });
    }

    #[test]
    fn uniform_writes_are_uploaded_once() {
        let Some((device, queue)) = headless() else {
            return;
        };

        let vert = Shader::new(&device, ir("v.wgsl", VERTEX, ShaderStage::Vertex));
        let frag = Shader::new(&device, ir("f.wgsl", FRAGMENT, ShaderStage::Fragment));
        let buffers = [MeshData::vertex_layout()];
        let desc = PipelineDesc::new("uniforms", testing::COLOR_FORMAT).with_vertex_buffers(&buffers);
        let mut pipeline = link(&device, &[&vert, &frag], &desc).unwrap();

        assert!(matches!(
            pipeline.uniform_mat4("modle"),
            Err(LinkError::UnknownUniform(_))
        ));

        let view = pipeline.uniform_mat4("view").unwrap();
        pipeline.set_mat4(view, &glam::Mat4::from_translation(glam::vec3(1.0, 2.0, 0.0)));
        pipeline.flush(&queue);

        let staging = &mut pipeline.uniforms.as_mut().unwrap().staging;
        assert!(staging.take_dirty().is_none());
        let floats: Vec<f32> = bytemuck::pod_collect_to_vec(&staging.bytes()[64..128]);
        assert_eq!(&floats[12..14], [1.0, 2.0]);
    }
}
