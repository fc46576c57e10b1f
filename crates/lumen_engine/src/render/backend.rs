//! Backend abstraction traits for GPU resource creation
//!
//! Loaders and light collections never talk to a graphics API directly. They
//! allocate buffers, textures and vertex arrays through [`GraphicsBackend`] and
//! keep the returned opaque handles. A backend is assumed to either succeed or
//! report a [`RenderError`]; retry and recovery are left to the caller.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::assets::ImageData;
use crate::render::Vertex;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

slotmap::new_key_type! {
    /// Handle to an uploaded vertex + index buffer pair
    pub struct MeshHandle;

    /// Handle to an uploaded 2D texture
    pub struct TextureHandle;

    /// Handle to a non-indexed vertex array (light markers and similar)
    pub struct VertexArrayHandle;
}

/// Texture filtering modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    /// Nearest neighbor filtering
    Nearest,
    /// Linear filtering
    Linear,
}

/// Texture wrapping modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    /// Repeat the texture
    Repeat,
    /// Mirror the texture
    MirroredRepeat,
    /// Clamp to edge
    ClampToEdge,
}

/// Texture creation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParams {
    /// Texture filtering mode
    pub filter_mode: FilterMode,
    /// Texture wrapping mode
    pub wrap_mode: WrapMode,
}

impl Default for TextureParams {
    /// Material textures: clamp-to-edge, linear filtering
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::Linear,
            wrap_mode: WrapMode::ClampToEdge,
        }
    }
}

/// Rendering backend errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Upload with no data
    #[error("Cannot upload empty {0}")]
    EmptyUpload(&'static str),

    /// Handle that the backend never issued or already released
    #[error("Unknown {0} handle")]
    UnknownHandle(&'static str),

    /// Backend specific failure
    #[error("Backend error: {0}")]
    Backend(String),
}

/// GPU resource allocator
///
/// Every handle returned by a backend is owned by exactly one component, which
/// is responsible for handing it back through the matching `release_*` call.
pub trait GraphicsBackend {
    /// Upload an indexed triangle list
    fn upload_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> BackendResult<MeshHandle>;

    /// Upload a decoded image as a 2D texture
    fn upload_texture(&mut self, image: &ImageData, params: &TextureParams) -> BackendResult<TextureHandle>;

    /// Upload a non-indexed triangle list
    fn create_vertex_array(&mut self, vertices: &[Vertex]) -> BackendResult<VertexArrayHandle>;

    /// Free a mesh created by [`GraphicsBackend::upload_mesh`]
    fn release_mesh(&mut self, handle: MeshHandle) -> BackendResult<()>;

    /// Free a texture created by [`GraphicsBackend::upload_texture`]
    fn release_texture(&mut self, handle: TextureHandle) -> BackendResult<()>;

    /// Free a vertex array created by [`GraphicsBackend::create_vertex_array`]
    fn release_vertex_array(&mut self, handle: VertexArrayHandle) -> BackendResult<()>;
}
