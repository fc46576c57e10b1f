//! # Lumen Engine
//!
//! Model loading and light synchronization for a small real-time demo scene.
//!
//! ## Features
//!
//! - **OBJ/MTL Loading**: Wavefront geometry and materials grouped into one mesh per material
//! - **Point Lights**: Light collections that push `pointLights[i]` uniform blocks into a shader
//! - **Backend Traits**: GPU uploads and uniform writes go through small traits, with an
//!   in-memory implementation for tools and tests
//! - **Configuration**: TOML/RON scene configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lumen_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut backend = HeadlessBackend::new();
//!     let model = ModelLoader::load("assets/models/backpack/backpack.obj", &mut backend, &LoadOptions::default())?;
//!
//!     let mut lights = PointLightCollection::new(
//!         Vec3::new(1.0, 1.0, 1.0),
//!         LightLevels::new(0.05, 0.5, 1.0),
//!         Attenuation::new(1.0, 0.045, 0.0075),
//!     );
//!     lights.add_light_at_position(&mut backend, Vec3::new(1.2, 1.0, 2.0))?;
//!
//!     let mut shader = RecordingProgram::new("point_lights");
//!     lights.update_shader(&mut shader, &Mat4::identity(), LightSelection::All)?;
//!     model.draw(&mut shader);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        foundation::math::{Vec2, Vec3, Mat4},
        assets::{AssetError, LoadOptions, ModelLoader, MaterialTable, ObjParser, MtlParser},
        render::{
            GraphicsBackend, HeadlessBackend, RenderError,
            ShaderProgram, RecordingProgram,
            Material, Mesh, MeshData, Model, Vertex,
            lighting::{
                Attenuation, LightLevels, LightSelection, LightSpace, LightingError,
                PointLight, PointLightCollection,
            },
        },
        config::{Config, ConfigError, SceneConfig},
    };
}
