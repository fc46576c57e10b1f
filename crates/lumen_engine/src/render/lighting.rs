//! Point light collection
//!
//! All lights in a [`PointLightCollection`] share one [`LightLevels`] profile
//! and one [`Attenuation`] curve; only position (and optionally color) varies
//! per light. The collection pushes the lights into a shader as an array of
//! `pointLights[i]` uniform blocks:
//!
//! ```glsl
//! struct PointLight {
//!     vec3 position;
//!     vec3 ambient;
//!     vec3 diffuse;
//!     vec3 specular;
//!     float constant;
//!     float linear;
//!     float quadratic;
//! };
//! uniform PointLight pointLights[16];
//! uniform int pointLightCount;
//! ```
//!
//! Light markers are small cubes drawn with `model` and `color` uniforms. The
//! marker vertex array is created on the first light add and shared by every
//! light in the collection.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use super::backend::{GraphicsBackend, RenderError, VertexArrayHandle};
use super::primitives::{cube_vertices, CUBE_VERTEX_COUNT};
use super::shader::ShaderProgram;
use crate::foundation::math::{transform_point, Mat4, Mat4Ext, Vec3};

/// Size of the `pointLights` array in the lighting shader
pub const MAX_POINT_LIGHTS: usize = 16;

/// Default uniform scale of a light marker cube
pub const DEFAULT_MARKER_SCALE: f32 = 0.2;

/// Uniform holding the number of active lights
pub const LIGHT_COUNT_UNIFORM: &str = "pointLightCount";

/// Lighting errors
#[derive(Error, Debug)]
pub enum LightingError {
    /// Light index past the end of the collection
    #[error("Light index {index} out of range (collection has {len} lights)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of lights
        len: usize,
    },

    /// No room left in the shader light array
    #[error("Point light collection is full ({0} lights)")]
    CollectionFull(usize),

    /// Marker geometry could not be created or freed
    #[error("Light marker error: {0}")]
    Backend(#[from] RenderError),
}

/// Ambient, diffuse and specular multipliers applied to a light's color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightLevels {
    /// Ambient multiplier
    pub ambient: f32,
    /// Diffuse multiplier
    pub diffuse: f32,
    /// Specular multiplier
    pub specular: f32,
}

impl LightLevels {
    /// Create a level profile
    pub const fn new(ambient: f32, diffuse: f32, specular: f32) -> Self {
        Self { ambient, diffuse, specular }
    }
}

/// Distance attenuation `1 / (constant + linear * d + quadratic * d^2)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    /// Constant term
    pub constant: f32,
    /// Linear term
    pub linear: f32,
    /// Quadratic term
    pub quadratic: f32,
}

impl Attenuation {
    /// Create an attenuation curve
    pub const fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self { constant, linear, quadratic }
    }

    /// Attenuation factor at a distance
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// Coordinate space light positions are written in
///
/// Must match the lighting shader: a shader that computes lighting in view
/// space expects view-space light positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightSpace {
    /// Positions transformed by the view matrix
    #[default]
    View,
    /// Positions written as stored
    World,
}

/// Which lights [`PointLightCollection::update_shader`] writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightSelection {
    /// Every light plus `pointLightCount`
    All,
    /// One light block; `pointLightCount` is left untouched
    Single(usize),
}

/// One point light
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    /// World-space position, free to change every frame
    pub position: Vec3,
    color: Vec3,
    ambient: Vec3,
    diffuse: Vec3,
    specular: Vec3,
    attenuation: Attenuation,
}

impl PointLight {
    fn new(position: Vec3, color: Vec3, levels: LightLevels, attenuation: Attenuation) -> Self {
        let mut light = Self {
            position,
            color,
            ambient: Vec3::zeros(),
            diffuse: Vec3::zeros(),
            specular: Vec3::zeros(),
            attenuation,
        };
        light.apply_levels(levels);
        light
    }

    fn apply_levels(&mut self, levels: LightLevels) {
        self.ambient = self.color * levels.ambient;
        self.diffuse = self.color * levels.diffuse;
        self.specular = self.color * levels.specular;
    }

    /// Base color
    pub const fn color(&self) -> Vec3 {
        self.color
    }

    /// Ambient term (color x ambient level)
    pub const fn ambient(&self) -> Vec3 {
        self.ambient
    }

    /// Diffuse term (color x diffuse level)
    pub const fn diffuse(&self) -> Vec3 {
        self.diffuse
    }

    /// Specular term (color x specular level)
    pub const fn specular(&self) -> Vec3 {
        self.specular
    }

    /// Attenuation curve
    pub const fn attenuation(&self) -> Attenuation {
        self.attenuation
    }

    fn write_uniforms(&self, shader: &mut dyn ShaderProgram, index: usize, position: &Vec3) {
        let block = format!("pointLights[{index}]");
        shader.set_vec3(&format!("{block}.position"), position);
        shader.set_vec3(&format!("{block}.ambient"), &self.ambient);
        shader.set_vec3(&format!("{block}.diffuse"), &self.diffuse);
        shader.set_vec3(&format!("{block}.specular"), &self.specular);
        shader.set_float(&format!("{block}.constant"), self.attenuation.constant);
        shader.set_float(&format!("{block}.linear"), self.attenuation.linear);
        shader.set_float(&format!("{block}.quadratic"), self.attenuation.quadratic);
    }
}

/// Ordered point lights with a shared profile and marker geometry
#[derive(Debug)]
pub struct PointLightCollection {
    lights: Vec<PointLight>,
    color: Vec3,
    levels: LightLevels,
    attenuation: Attenuation,
    space: LightSpace,
    marker_scale: f32,
    marker: Option<VertexArrayHandle>,
}

impl PointLightCollection {
    /// Create an empty collection
    ///
    /// No GPU resources are allocated until the first light is added.
    pub fn new(color: Vec3, levels: LightLevels, attenuation: Attenuation) -> Self {
        Self {
            lights: Vec::new(),
            color,
            levels,
            attenuation,
            space: LightSpace::default(),
            marker_scale: DEFAULT_MARKER_SCALE,
            marker: None,
        }
    }

    /// Set the space positions are written in
    #[must_use]
    pub fn with_space(mut self, space: LightSpace) -> Self {
        self.space = space;
        self
    }

    /// Set the marker cube scale
    #[must_use]
    pub fn with_marker_scale(mut self, scale: f32) -> Self {
        self.marker_scale = scale;
        self
    }

    /// Add a light with the collection's color and profile
    ///
    /// Returns the new light's index. The first call creates the shared
    /// marker vertex array.
    pub fn add_light_at_position(
        &mut self,
        backend: &mut dyn GraphicsBackend,
        position: Vec3,
    ) -> Result<usize, LightingError> {
        if self.lights.len() >= MAX_POINT_LIGHTS {
            return Err(LightingError::CollectionFull(MAX_POINT_LIGHTS));
        }
        if self.marker.is_none() {
            let handle = backend.create_vertex_array(&cube_vertices())?;
            log::debug!("Created light marker vertex array {:?}", handle);
            self.marker = Some(handle);
        }

        self.lights.push(PointLight::new(position, self.color, self.levels, self.attenuation));
        let index = self.lights.len() - 1;
        log::debug!("Added point light {} at ({:.2}, {:.2}, {:.2})", index, position.x, position.y, position.z);
        Ok(index)
    }

    /// Write light uniforms
    ///
    /// `view` is only used when the collection is in [`LightSpace::View`].
    /// Reads light state only.
    pub fn update_shader(
        &self,
        shader: &mut dyn ShaderProgram,
        view: &Mat4,
        selection: LightSelection,
    ) -> Result<(), LightingError> {
        match selection {
            LightSelection::All => {
                for (index, light) in self.lights.iter().enumerate() {
                    light.write_uniforms(shader, index, &self.pushed_position(light, view));
                }
                shader.set_int(LIGHT_COUNT_UNIFORM, self.lights.len() as i32);
            }
            LightSelection::Single(index) => {
                let light = self.lights.get(index).ok_or(LightingError::IndexOutOfRange {
                    index,
                    len: self.lights.len(),
                })?;
                light.write_uniforms(shader, index, &self.pushed_position(light, view));
            }
        }
        log::trace!("Pushed {:?} of {} point lights to {}", selection, self.lights.len(), shader.name());
        Ok(())
    }

    fn pushed_position(&self, light: &PointLight, view: &Mat4) -> Vec3 {
        match self.space {
            LightSpace::View => transform_point(view, light.position),
            LightSpace::World => light.position,
        }
    }

    /// Draw one marker cube per light
    ///
    /// Expects the marker shader to be active.
    pub fn draw_all(&self, shader: &mut dyn ShaderProgram) {
        let Some(marker) = self.marker else {
            return;
        };
        for light in &self.lights {
            shader.set_mat4("model", &Mat4::translation_scale(light.position, self.marker_scale));
            shader.set_vec3("color", &light.color);
            shader.draw_arrays(marker, CUBE_VERTEX_COUNT);
        }
    }

    /// Lights in insertion order
    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Mutable access to one light
    pub fn light_mut(&mut self, index: usize) -> Option<&mut PointLight> {
        self.lights.get_mut(index)
    }

    /// Change one light's color, recomputing its terms from the shared levels
    pub fn set_light_color(&mut self, index: usize, color: Vec3) -> Result<(), LightingError> {
        let len = self.lights.len();
        let levels = self.levels;
        let light = self
            .lights
            .get_mut(index)
            .ok_or(LightingError::IndexOutOfRange { index, len })?;
        light.color = color;
        light.apply_levels(levels);
        Ok(())
    }

    /// Number of lights
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// Whether the collection has no lights
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Shared level profile
    pub const fn levels(&self) -> LightLevels {
        self.levels
    }

    /// Shared attenuation curve
    pub const fn attenuation(&self) -> Attenuation {
        self.attenuation
    }

    /// Space positions are written in
    pub const fn space(&self) -> LightSpace {
        self.space
    }

    /// Shared marker vertex array, once a light has been added
    pub const fn marker(&self) -> Option<VertexArrayHandle> {
        self.marker
    }

    /// Free the shared marker vertex array
    pub fn release(self, backend: &mut dyn GraphicsBackend) -> Result<(), LightingError> {
        if let Some(marker) = self.marker {
            backend.release_vertex_array(marker)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::{ProgramCommand, RecordingProgram};
    use crate::render::HeadlessBackend;
    use approx::assert_relative_eq;

    fn demo_collection() -> PointLightCollection {
        PointLightCollection::new(
            Vec3::new(1.0, 1.0, 1.0),
            LightLevels::new(0.05, 0.5, 1.0),
            Attenuation::new(1.0, 0.045, 0.0075),
        )
    }

    fn with_three_lights(backend: &mut HeadlessBackend) -> PointLightCollection {
        let mut lights = demo_collection();
        lights.add_light_at_position(backend, Vec3::new(1.2, 1.0, 2.0)).unwrap();
        lights.add_light_at_position(backend, Vec3::new(1.2, 1.0, 2.0)).unwrap();
        lights.add_light_at_position(backend, Vec3::new(-15.0, -1.0, -15.0)).unwrap();
        lights
    }

    #[test]
    fn test_update_all_writes_every_block_and_count() {
        let mut backend = HeadlessBackend::new();
        let lights = with_three_lights(&mut backend);
        let mut shader = RecordingProgram::new("phong");

        lights.update_shader(&mut shader, &Mat4::identity(), LightSelection::All).unwrap();

        assert_eq!(shader.int(LIGHT_COUNT_UNIFORM), Some(3));
        for i in 0..3 {
            assert_eq!(shader.writes_with_prefix(&format!("pointLights[{i}].")).count(), 7);
        }
        assert_eq!(shader.writes_with_prefix("pointLights[3]").count(), 0);
        assert_eq!(shader.float("pointLights[2].quadratic"), Some(0.0075));
        assert_eq!(shader.vec3("pointLights[0].diffuse"), Some(Vec3::new(0.5, 0.5, 0.5)));
    }

    #[test]
    fn test_update_single_leaves_count_untouched() {
        let mut backend = HeadlessBackend::new();
        let lights = with_three_lights(&mut backend);
        let mut shader = RecordingProgram::new("phong");

        lights.update_shader(&mut shader, &Mat4::identity(), LightSelection::Single(1)).unwrap();

        assert_eq!(shader.int(LIGHT_COUNT_UNIFORM), None);
        assert_eq!(shader.writes_with_prefix("pointLights[1].").count(), 7);
        assert_eq!(shader.writes_with_prefix("pointLights").count(), 7);
    }

    #[test]
    fn test_single_keeps_previous_count() {
        let mut backend = HeadlessBackend::new();
        let lights = with_three_lights(&mut backend);
        let mut shader = RecordingProgram::new("phong");
        shader.set_int(LIGHT_COUNT_UNIFORM, 7);
        shader.clear_commands();

        lights.update_shader(&mut shader, &Mat4::identity(), LightSelection::Single(0)).unwrap();
        assert_eq!(shader.int(LIGHT_COUNT_UNIFORM), Some(7));
    }

    #[test]
    fn test_single_out_of_range() {
        let mut backend = HeadlessBackend::new();
        let lights = with_three_lights(&mut backend);
        let mut shader = RecordingProgram::new("phong");

        let result = lights.update_shader(&mut shader, &Mat4::identity(), LightSelection::Single(3));
        assert!(matches!(result, Err(LightingError::IndexOutOfRange { index: 3, len: 3 })));
        assert!(shader.commands().is_empty());
    }

    #[test]
    fn test_marker_vertex_array_is_shared() {
        let mut backend = HeadlessBackend::new();
        let mut lights = demo_collection();
        assert!(lights.marker().is_none());

        lights.add_light_at_position(&mut backend, Vec3::zeros()).unwrap();
        lights.add_light_at_position(&mut backend, Vec3::x()).unwrap();
        assert_eq!(backend.vertex_array_count(), 1);
        let marker = lights.marker().unwrap();
        assert_eq!(backend.vertex_array(marker).unwrap().len(), CUBE_VERTEX_COUNT as usize);

        lights.release(&mut backend).unwrap();
        assert_eq!(backend.vertex_array_count(), 0);
    }

    #[test]
    fn test_collection_full() {
        let mut backend = HeadlessBackend::new();
        let mut lights = demo_collection();
        for _ in 0..MAX_POINT_LIGHTS {
            lights.add_light_at_position(&mut backend, Vec3::zeros()).unwrap();
        }
        assert!(matches!(
            lights.add_light_at_position(&mut backend, Vec3::zeros()),
            Err(LightingError::CollectionFull(MAX_POINT_LIGHTS))
        ));
        assert_eq!(lights.len(), MAX_POINT_LIGHTS);
    }

    #[test]
    fn test_view_space_positions() {
        let mut backend = HeadlessBackend::new();
        let mut lights = demo_collection();
        lights.add_light_at_position(&mut backend, Vec3::new(0.0, 0.0, 0.0)).unwrap();
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::zeros(), Vec3::y());
        let mut shader = RecordingProgram::new("phong");

        lights.update_shader(&mut shader, &view, LightSelection::All).unwrap();
        assert_relative_eq!(
            shader.vec3("pointLights[0].position").unwrap(),
            Vec3::new(0.0, 0.0, -5.0),
            epsilon = 1e-5
        );

        let lights = lights.with_space(LightSpace::World);
        lights.update_shader(&mut shader, &view, LightSelection::All).unwrap();
        assert_eq!(shader.vec3("pointLights[0].position"), Some(Vec3::zeros()));
    }

    #[test]
    fn test_moved_light_is_pushed_next_update() {
        let mut backend = HeadlessBackend::new();
        let mut lights = with_three_lights(&mut backend).with_space(LightSpace::World);
        let mut shader = RecordingProgram::new("phong");

        lights.light_mut(0).unwrap().position = Vec3::new(3.0, 0.0, 0.0);
        lights.update_shader(&mut shader, &Mat4::identity(), LightSelection::Single(0)).unwrap();
        assert_eq!(shader.vec3("pointLights[0].position"), Some(Vec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn test_set_light_color_recomputes_terms() {
        let mut backend = HeadlessBackend::new();
        let mut lights = with_three_lights(&mut backend);
        lights.set_light_color(2, Vec3::new(1.0, 0.0, 0.0)).unwrap();

        let light = &lights.lights()[2];
        assert_eq!(light.ambient(), Vec3::new(0.05, 0.0, 0.0));
        assert_eq!(light.specular(), Vec3::new(1.0, 0.0, 0.0));
        assert!(lights.set_light_color(3, Vec3::zeros()).is_err());
    }

    #[test]
    fn test_draw_all_uses_marker_per_light() {
        let mut backend = HeadlessBackend::new();
        let lights = with_three_lights(&mut backend);
        let marker = lights.marker().unwrap();
        let mut shader = RecordingProgram::new("light_cube");

        lights.draw_all(&mut shader);

        let draws: Vec<_> = shader
            .commands()
            .iter()
            .filter(|c| matches!(c, ProgramCommand::DrawArrays { vertex_array, vertex_count: 36 } if *vertex_array == marker))
            .collect();
        assert_eq!(draws.len(), 3);
        assert_eq!(shader.vec3("color"), Some(Vec3::new(1.0, 1.0, 1.0)));

        let model = shader.mat4("model").unwrap();
        assert_relative_eq!(model[(0, 0)], DEFAULT_MARKER_SCALE);
        assert_relative_eq!(model[(0, 3)], -15.0);
    }

    #[test]
    fn test_draw_all_without_lights_is_noop() {
        let lights = demo_collection();
        let mut shader = RecordingProgram::new("light_cube");
        lights.draw_all(&mut shader);
        assert!(shader.commands().is_empty());
    }

    #[test]
    fn test_attenuation_factor() {
        let attenuation = Attenuation::new(1.0, 0.045, 0.0075);
        assert_relative_eq!(attenuation.factor(0.0), 1.0);
        assert!(attenuation.factor(10.0) < attenuation.factor(1.0));
    }
}
