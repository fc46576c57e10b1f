//! In-memory graphics backend
//!
//! Keeps every upload in host-side slot maps instead of GPU memory. Used
//! by offline tools (mesh statistics, config checks) and by the test suite to
//! observe exactly what a loader allocated and freed.

use slotmap::SlotMap;

use super::backend::{
    BackendResult, GraphicsBackend, MeshHandle, RenderError, TextureHandle, TextureParams,
    VertexArrayHandle,
};
use crate::assets::ImageData;
use crate::render::Vertex;

/// Uploaded vertex + index buffers
#[derive(Debug, Clone)]
pub struct StoredMesh {
    /// Vertex buffer
    pub vertices: Vec<Vertex>,
    /// Index buffer
    pub indices: Vec<u32>,
}

impl StoredMesh {
    /// Vertex buffer as it would be handed to the GPU
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Uploaded texture
#[derive(Debug, Clone)]
pub struct StoredTexture {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA8 pixel data
    pub pixels: Vec<u8>,
    /// Sampling parameters
    pub params: TextureParams,
}

/// Graphics backend that keeps resources in host memory
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    meshes: SlotMap<MeshHandle, StoredMesh>,
    textures: SlotMap<TextureHandle, StoredTexture>,
    vertex_arrays: SlotMap<VertexArrayHandle, Vec<Vertex>>,
    total_uploads: usize,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of live vertex arrays
    pub fn vertex_array_count(&self) -> usize {
        self.vertex_arrays.len()
    }

    /// Number of uploads performed since creation, including released ones
    pub fn total_uploads(&self) -> usize {
        self.total_uploads
    }

    /// Look up a live mesh
    pub fn mesh(&self, handle: MeshHandle) -> Option<&StoredMesh> {
        self.meshes.get(handle)
    }

    /// Look up a live texture
    pub fn texture(&self, handle: TextureHandle) -> Option<&StoredTexture> {
        self.textures.get(handle)
    }

    /// Look up a live vertex array
    pub fn vertex_array(&self, handle: VertexArrayHandle) -> Option<&[Vertex]> {
        self.vertex_arrays.get(handle).map(Vec::as_slice)
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn upload_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> BackendResult<MeshHandle> {
        if vertices.is_empty() || indices.is_empty() {
            return Err(RenderError::EmptyUpload("mesh"));
        }
        self.total_uploads += 1;
        let handle = self.meshes.insert(StoredMesh {
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
        });
        log::trace!("Headless: uploaded mesh {:?} ({} vertices, {} indices)", handle, vertices.len(), indices.len());
        Ok(handle)
    }

    fn upload_texture(&mut self, image: &ImageData, params: &TextureParams) -> BackendResult<TextureHandle> {
        if image.data.is_empty() {
            return Err(RenderError::EmptyUpload("texture"));
        }
        self.total_uploads += 1;
        let handle = self.textures.insert(StoredTexture {
            width: image.width,
            height: image.height,
            pixels: image.data.clone(),
            params: *params,
        });
        log::trace!("Headless: uploaded texture {:?} ({}x{})", handle, image.width, image.height);
        Ok(handle)
    }

    fn create_vertex_array(&mut self, vertices: &[Vertex]) -> BackendResult<VertexArrayHandle> {
        if vertices.is_empty() {
            return Err(RenderError::EmptyUpload("vertex array"));
        }
        self.total_uploads += 1;
        Ok(self.vertex_arrays.insert(vertices.to_vec()))
    }

    fn release_mesh(&mut self, handle: MeshHandle) -> BackendResult<()> {
        self.meshes
            .remove(handle)
            .map(|_| ())
            .ok_or(RenderError::UnknownHandle("mesh"))
    }

    fn release_texture(&mut self, handle: TextureHandle) -> BackendResult<()> {
        self.textures
            .remove(handle)
            .map(|_| ())
            .ok_or(RenderError::UnknownHandle("texture"))
    }

    fn release_vertex_array(&mut self, handle: VertexArrayHandle) -> BackendResult<()> {
        self.vertex_arrays
            .remove(handle)
            .map(|_| ())
            .ok_or(RenderError::UnknownHandle("vertex array"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Vertex> {
        vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
        ]
    }

    #[test]
    fn test_mesh_upload_keeps_vertex_layout() {
        let mut backend = HeadlessBackend::new();
        let handle = backend.upload_mesh(&triangle(), &[0, 1, 2]).unwrap();

        let stored = backend.mesh(handle).unwrap();
        assert_eq!(stored.vertex_bytes().len(), 3 * std::mem::size_of::<Vertex>());
        assert_eq!(stored.vertices, triangle());
        assert_eq!(stored.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_upload_is_rejected() {
        let mut backend = HeadlessBackend::new();
        assert!(matches!(backend.upload_mesh(&[], &[]), Err(RenderError::EmptyUpload(_))));
        assert!(backend.create_vertex_array(&[]).is_err());
        assert_eq!(backend.total_uploads(), 0);
    }

    #[test]
    fn test_double_release_is_an_error() {
        let mut backend = HeadlessBackend::new();
        let handle = backend.create_vertex_array(&triangle()).unwrap();
        assert_eq!(backend.vertex_array_count(), 1);

        backend.release_vertex_array(handle).unwrap();
        assert_eq!(backend.vertex_array_count(), 0);
        assert!(matches!(
            backend.release_vertex_array(handle),
            Err(RenderError::UnknownHandle(_))
        ));
    }

    #[test]
    fn test_texture_upload_records_params() {
        let mut backend = HeadlessBackend::new();
        let image = ImageData::solid_color(2, 2, [255, 0, 0, 255]);
        let handle = backend.upload_texture(&image, &TextureParams::default()).unwrap();

        let stored = backend.texture(handle).unwrap();
        assert_eq!((stored.width, stored.height), (2, 2));
        assert_eq!(stored.params.wrap_mode, super::super::WrapMode::ClampToEdge);
    }
}
