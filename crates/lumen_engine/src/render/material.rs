//! Phong material

use super::backend::TextureHandle;
use super::shader::ShaderProgram;
use crate::foundation::math::Vec3;

/// Texture unit the diffuse map is bound to
pub const DIFFUSE_TEXTURE_UNIT: u32 = 0;

/// Named Phong coefficients plus an optional diffuse texture
///
/// Immutable after load. The texture handle is owned by the
/// [`MaterialTable`](crate::assets::MaterialTable) the material came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name (`newmtl`)
    pub name: String,
    /// Ambient color (`Ka`)
    pub ambient: Vec3,
    /// Diffuse color (`Kd`)
    pub diffuse: Vec3,
    /// Specular color (`Ks`)
    pub specular: Vec3,
    /// Specular exponent (`Ns`)
    pub shininess: f32,
    /// Diffuse texture (`map_Kd`)
    pub texture: Option<TextureHandle>,
}

impl Default for Material {
    fn default() -> Self {
        Self::fallback()
    }
}

impl Material {
    /// Name given to [`Material::fallback`]
    pub const FALLBACK_NAME: &'static str = "__default__";

    /// Create an untextured material
    pub fn new(name: impl Into<String>, ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            name: name.into(),
            ambient,
            diffuse,
            specular,
            shininess,
            texture: None,
        }
    }

    /// Material used when a face references no, or an unknown, material
    ///
    /// Moderate grey diffuse, no specular highlight, no texture.
    pub fn fallback() -> Self {
        Self::new(
            Self::FALLBACK_NAME,
            Vec3::new(0.1, 0.1, 0.1),
            Vec3::new(0.6, 0.6, 0.6),
            Vec3::zeros(),
            32.0,
        )
    }

    /// Whether this is the fallback material
    pub fn is_fallback(&self) -> bool {
        self.name == Self::FALLBACK_NAME
    }

    /// Bind the texture and write the `material.*` uniforms
    pub fn apply(&self, shader: &mut dyn ShaderProgram) {
        shader.bind_texture(DIFFUSE_TEXTURE_UNIT, self.texture);
        shader.set_int("material.diffuseMap", DIFFUSE_TEXTURE_UNIT as i32);
        shader.set_bool("material.hasDiffuseMap", self.texture.is_some());
        shader.set_vec3("material.ambient", &self.ambient);
        shader.set_vec3("material.diffuse", &self.diffuse);
        shader.set_vec3("material.specular", &self.specular);
        shader.set_float("material.shininess", self.shininess);
    }
}
