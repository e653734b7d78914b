use super::triangulate;

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

/// Vertex and index arrays staged on the host.
///
/// Vertices are tightly packed `x, y, z` floats; the layout is fixed (see
/// [`MeshData::vertex_layout`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

impl MeshData {
    /// Wraps raw arrays. `vertices.len()` should be a multiple of 3.
    pub fn new(vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        if vertices.len() % 3 != 0 {
            log::warn!(
                "vertex array has {} floats; trailing {} ignored by the xyz layout",
                vertices.len(),
                vertices.len() % 3
            );
        }
        Self { vertices, indices }
    }

    /// Builds a filled polygon from homogeneous vertices (`x, y, z, w`).
    ///
    /// Positions are divided by `w` (left as-is when `w == 0`) and the outline
    /// is triangulated in the xy plane.
    pub fn from_homogeneous(points: &[[f32; 4]]) -> Self {
        let positions: Vec<[f32; 3]> = points
            .iter()
            .map(|&[x, y, z, w]| {
                if w == 0.0 || w == 1.0 {
                    [x, y, z]
                } else {
                    [x / w, y / w, z / w]
                }
            })
            .collect();

        let outline: Vec<[f32; 2]> = positions.iter().map(|p| [p[0], p[1]]).collect();
        let indices = triangulate(&outline);

        Self {
            vertices: positions.into_iter().flatten().collect(),
            indices,
        }
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of indices drawn.
    pub fn num_elements(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Size of the vertex array in bytes.
    pub fn verts_size(&self) -> u64 {
        std::mem::size_of_val(self.vertices.as_slice()) as u64
    }

    /// Size of the index array in bytes.
    pub fn indices_size(&self) -> u64 {
        std::mem::size_of_val(self.indices.as_slice()) as u64
    }

    /// `Float32x3` positions at location 0, 12-byte stride, nothing else.
    pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: (3 * std::mem::size_of::<f32>()) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRS,
        }
    }
}
