//! Host-side mesh data and its one-shot upload into GPU buffers.

mod buffers;
mod mesh;
mod triangulate;

pub use buffers::GeometryBuffers;
pub use mesh::MeshData;
pub use triangulate::triangulate;
