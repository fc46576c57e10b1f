//! Rendering core
//!
//! GPU-facing types: resource and shader traits, meshes, materials, models
//! and point lights. Nothing here owns a window or a graphics context.

pub mod backend;
pub mod headless;
pub mod shader;
pub mod mesh;
pub mod material;
pub mod model;
pub mod primitives;
pub mod lighting;
pub mod transparency;

pub use backend::{
    BackendResult, FilterMode, GraphicsBackend, MeshHandle, RenderError, TextureHandle,
    TextureParams, VertexArrayHandle, WrapMode,
};
pub use headless::HeadlessBackend;
pub use shader::{ProgramCommand, RecordingProgram, ShaderProgram, UniformValue};
pub use mesh::{Mesh, MeshData, Vertex};
pub use material::Material;
pub use model::Model;
pub use transparency::{draw_quads_back_to_front, sort_back_to_front};
