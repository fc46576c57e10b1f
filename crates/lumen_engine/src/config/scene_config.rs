//! # Scene Configuration
//!
//! Describes which models the demo scene loads, where they are placed, and the
//! shared profile of its point lights. Every field has a default matching the
//! stock demo scene, so a config file only needs to list what it overrides.
//!
//! ```toml
//! log_level = "debug"
//!
//! [[models]]
//! path = "models/floor/floor.obj"
//! position = [0.0, -3.5, 0.0]
//!
//! [lighting]
//! attenuation = [1.0, 0.09, 0.032]
//! ```

use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use super::{Config, ConfigError};
use crate::assets::LoadOptions;
use crate::foundation::math::Vec3;
use crate::render::lighting::{Attenuation, LightLevels, LightSpace, MAX_POINT_LIGHTS};
use crate::render::{FilterMode, TextureParams, WrapMode};

/// Top-level scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Default log filter, used when `RUST_LOG` is not set
    pub log_level: String,
    /// Directory model paths are relative to
    pub assets_dir: String,
    /// Initial camera position
    pub camera_position: [f32; 3],
    /// World positions of the alpha-blended quads
    pub transparent_quads: Vec<[f32; 3]>,
    /// Uniform scale of the blended quads
    pub transparent_quad_scale: f32,
    // Tables last so the TOML output stays valid
    /// Texture decoding and upload settings
    pub assets: AssetSettings,
    /// Point light profile and initial positions
    pub lighting: LightingConfig,
    /// Models to load, in draw order
    pub models: Vec<ModelConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            assets_dir: "assets".to_string(),
            camera_position: [0.0, 0.0, 5.0],
            transparent_quads: vec![[0.0, -1.0, -5.0], [0.0, -1.0, 7.0]],
            transparent_quad_scale: 3.0,
            assets: AssetSettings::default(),
            lighting: LightingConfig::default(),
            models: vec![
                ModelConfig::new("models/backpack/backpack.obj", [0.0, 0.0, 0.0]),
                ModelConfig::new("models/floor/floor.obj", [0.0, -3.5, 0.0]),
            ],
        }
    }
}

impl Config for SceneConfig {}

impl SceneConfig {
    /// Resolve a model entry against `assets_dir`
    pub fn model_path(&self, model: &ModelConfig) -> PathBuf {
        Path::new(&self.assets_dir).join(&model.path)
    }

    /// Camera position as a vector
    pub fn camera_position(&self) -> Vec3 {
        Vec3::from(self.camera_position)
    }

    /// Transparent quad positions as vectors
    pub fn transparent_quad_positions(&self) -> Vec<Vec3> {
        self.transparent_quads.iter().copied().map(Vec3::from).collect()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.iter().any(|m| m.path.trim().is_empty()) {
            return Err(ConfigError::Invalid("model path cannot be empty".to_string()));
        }
        if self.transparent_quad_scale <= 0.0 {
            return Err(ConfigError::Invalid("transparent quad scale must be positive".to_string()));
        }
        self.lighting.validate()
    }
}

/// One model placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// OBJ path, relative to `assets_dir`
    pub path: String,
    /// World translation applied when drawing
    #[serde(default)]
    pub position: [f32; 3],
}

impl ModelConfig {
    /// Create a new model entry
    pub fn new(path: impl Into<String>, position: [f32; 3]) -> Self {
        Self {
            path: path.into(),
            position,
        }
    }

    /// Placement as a vector
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

/// Texture decoding and upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Flip decoded images so row 0 is the bottom row (OpenGL texture origin)
    pub flip_textures_vertically: bool,
    /// Wrap mode for material textures
    pub texture_wrap: WrapMode,
    /// Filter mode for material textures
    pub texture_filter: FilterMode,
}

impl Default for AssetSettings {
    fn default() -> Self {
        let params = TextureParams::default();
        Self {
            flip_textures_vertically: true,
            texture_wrap: params.wrap_mode,
            texture_filter: params.filter_mode,
        }
    }
}

impl AssetSettings {
    /// Convert to loader options
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            flip_textures_vertically: self.flip_textures_vertically,
            texture_params: TextureParams {
                wrap_mode: self.texture_wrap,
                filter_mode: self.texture_filter,
            },
        }
    }
}

/// Shared point light profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Base color of every light
    pub color: [f32; 3],
    /// Ambient, diffuse, specular levels
    pub levels: [f32; 3],
    /// Constant, linear, quadratic attenuation terms
    pub attenuation: [f32; 3],
    /// Uniform scale of the light marker cubes
    pub marker_scale: f32,
    /// Space light positions are pushed in
    pub space: LightSpace,
    /// Initial light positions
    pub positions: Vec<[f32; 3]>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            levels: [0.05, 0.5, 1.0],
            attenuation: [1.0, 0.045, 0.0075],
            marker_scale: 0.2,
            space: LightSpace::View,
            positions: vec![
                [1.2, 1.0, 2.0],
                [1.2, 1.0, 2.0],
                [-15.0, -1.0, -15.0],
            ],
        }
    }
}

impl LightingConfig {
    /// Light color as a vector
    pub fn color(&self) -> Vec3 {
        Vec3::from(self.color)
    }

    /// Shared light levels
    pub fn levels(&self) -> LightLevels {
        LightLevels::new(self.levels[0], self.levels[1], self.levels[2])
    }

    /// Shared attenuation
    pub fn attenuation(&self) -> Attenuation {
        Attenuation::new(self.attenuation[0], self.attenuation[1], self.attenuation[2])
    }

    /// Validate the lighting profile
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.iter().chain(self.attenuation.iter()).any(|v| *v < 0.0) {
            return Err(ConfigError::Invalid("light levels and attenuation must be non-negative".to_string()));
        }
        if self.attenuation.iter().all(|v| *v == 0.0) {
            return Err(ConfigError::Invalid("attenuation cannot be all zero".to_string()));
        }
        if self.marker_scale <= 0.0 {
            return Err(ConfigError::Invalid("marker scale must be positive".to_string()));
        }
        if self.positions.len() > MAX_POINT_LIGHTS {
            return Err(ConfigError::Invalid(format!(
                "{} point lights configured, at most {} are supported",
                self.positions.len(),
                MAX_POINT_LIGHTS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lighting.positions.len(), 3);
        assert_eq!(config.models.len(), 2);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SceneConfig = toml::from_str(
            r#"
log_level = "debug"

[lighting]
attenuation = [1.0, 0.09, 0.032]
"#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.lighting.attenuation, [1.0, 0.09, 0.032]);
        assert_eq!(config.lighting.levels, [0.05, 0.5, 1.0]);
        assert_eq!(config.lighting.space, LightSpace::View);
        assert_eq!(config.models.len(), 2);
    }

    #[test]
    fn test_world_space_from_ron() {
        let config: SceneConfig = ron::from_str("(lighting: (space: World, positions: []))").unwrap();
        assert_eq!(config.lighting.space, LightSpace::World);
        assert!(config.lighting.positions.is_empty());
    }

    #[test]
    fn test_rejects_too_many_lights() {
        let mut config = SceneConfig::default();
        config.lighting.positions = vec![[0.0; 3]; MAX_POINT_LIGHTS + 1];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_attenuation() {
        let mut config = SceneConfig::default();
        config.lighting.attenuation = [0.0; 3];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_transparent_quad_scale() {
        let config: SceneConfig = toml::from_str("transparent_quad_scale = 1.5\n").unwrap();
        assert_eq!(config.transparent_quad_scale, 1.5);
        assert_eq!(SceneConfig::default().transparent_quad_scale, 3.0);

        let mut config = SceneConfig::default();
        config.transparent_quad_scale = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_model_path_joins_assets_dir() {
        let config = SceneConfig::default();
        let path = config.model_path(&config.models[1]);
        assert_eq!(path, Path::new("assets").join("models/floor/floor.obj"));
    }

    #[test]
    fn test_save_and_load_toml_file() {
        let dir = std::env::temp_dir().join(format!("lumen_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scene.toml");

        let mut config = SceneConfig::default();
        config.lighting.marker_scale = 0.5;
        config.save_to_file(&path).unwrap();

        let loaded = SceneConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.lighting.marker_scale, 0.5);
        assert_eq!(loaded.models.len(), config.models.len());

        assert!(matches!(
            SceneConfig::load_from_file(dir.join("scene.yaml")),
            Err(ConfigError::Io(_) | ConfigError::UnsupportedFormat(_))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }
}
