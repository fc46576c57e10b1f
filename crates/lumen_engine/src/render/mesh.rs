//! Mesh representation for 3D models
//!
//! [`MeshData`] is the CPU-side triangle list a loader builds; [`Mesh`] is the
//! uploaded, immutable form a [`Model`](super::Model) draws. A mesh is bound
//! to exactly one [`Material`].

use bytemuck::{Pod, Zeroable};

use super::backend::{BackendResult, GraphicsBackend, MeshHandle};
use super::material::Material;

/// 3D vertex data structure for rendering
///
/// # Memory Layout
/// `#[repr(C)]` plus `Pod` so a vertex slice can be handed to the GPU as raw
/// bytes. Attribute locations: 0 = position, 1 = normal, 2 = texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Indexed triangle list in host memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data, three per triangle
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create a new mesh
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has nothing to draw
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Uploaded mesh bound to one material
///
/// Buffers never change after upload. The handle is owned by this mesh and
/// freed through [`Mesh::release`], so a mesh cannot be duplicated:
///
/// ```compile_fail
/// fn duplicate(mesh: &lumen_engine::render::Mesh) -> lumen_engine::render::Mesh {
///     mesh.clone()
/// }
/// ```
#[derive(Debug)]
pub struct Mesh {
    handle: MeshHandle,
    index_count: u32,
    vertex_count: u32,
    material: Material,
}

impl Mesh {
    /// Upload a triangle list and bind it to a material
    pub fn upload(
        backend: &mut dyn GraphicsBackend,
        data: &MeshData,
        material: Material,
    ) -> BackendResult<Self> {
        let handle = backend.upload_mesh(&data.vertices, &data.indices)?;
        Ok(Self {
            handle,
            index_count: data.indices.len() as u32,
            vertex_count: data.vertices.len() as u32,
            material,
        })
    }

    /// GPU buffer handle
    pub const fn handle(&self) -> MeshHandle {
        self.handle
    }

    /// Number of indices drawn
    pub const fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Number of unique vertices in the buffer
    pub const fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of triangles drawn
    pub const fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }

    /// Material bound to this mesh
    pub const fn material(&self) -> &Material {
        &self.material
    }

    /// Free the GPU buffers
    pub fn release(self, backend: &mut dyn GraphicsBackend) -> BackendResult<()> {
        backend.release_mesh(self.handle)
    }
}
