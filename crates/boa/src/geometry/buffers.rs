use wgpu::util::DeviceExt;

use super::MeshData;

/// Vertex + index buffers uploaded once from a [`MeshData`].
///
/// The two buffers are created together and only ever bound together, through
/// [`bind`](Self::bind). There is no update path; upload a new mesh instead.
pub struct GeometryBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_elements: u32,
    verts_size: u64,
    indices_size: u64,
}

impl GeometryBuffers {
    /// Copies `mesh` into two new GPU buffers. Every call creates independent buffers.
    pub fn upload(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("boa vertex buffer"),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("boa index buffer"),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "uploaded geometry: {} vertices ({} bytes), {} indices ({} bytes)",
            mesh.vertex_count(),
            mesh.verts_size(),
            mesh.num_elements(),
            mesh.indices_size()
        );

        Self {
            vertex_buffer,
            index_buffer,
            num_elements: mesh.num_elements(),
            verts_size: mesh.verts_size(),
            indices_size: mesh.indices_size(),
        }
    }

    pub fn num_elements(&self) -> u32 {
        self.num_elements
    }

    pub fn verts_size(&self) -> u64 {
        self.verts_size
    }

    pub fn indices_size(&self) -> u64 {
        self.indices_size
    }

    /// Binds the vertex buffer at slot 0 and the index buffer.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    /// Binds both buffers and issues one indexed draw over every element.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.num_elements == 0 {
            return;
        }
        self.bind(pass);
        pass.draw_indexed(0..self.num_elements, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::testing::headless;

    fn square() -> MeshData {
        MeshData::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn each_upload_creates_independent_buffers() {
        let Some((device, _queue)) = headless() else {
            return;
        };
        let mesh = square();

        let a = GeometryBuffers::upload(&device, &mesh);
        let b = GeometryBuffers::upload(&device, &mesh);

        assert_eq!(a.num_elements(), 6);
        assert_eq!(
            (a.num_elements(), a.verts_size(), a.indices_size()),
            (b.num_elements(), b.verts_size(), b.indices_size())
        );
        assert_eq!((a.verts_size(), a.indices_size()), (48, 24));
        assert_ne!(a.vertex_buffer, b.vertex_buffer);
        assert_ne!(a.index_buffer, b.index_buffer);
        assert_eq!(a.vertex_buffer.size(), 48);
        assert_eq!(a.index_buffer.size(), 24);
    }

    #[test]
    fn empty_mesh_uploads_and_draws_nothing() {
        let Some((device, _queue)) = headless() else {
            return;
        };
        let empty = GeometryBuffers::upload(&device, &MeshData::new(Vec::new(), Vec::new()));
        assert_eq!(empty.num_elements(), 0);
        assert_eq!((empty.verts_size(), empty.indices_size()), (0, 0));
    }
}
