//! Point light demo scene, driven headlessly
//!
//! Loads the configured models and lights, then runs a few frames of the
//! scene's update and draw sequence against recording shader programs and
//! logs what each frame submitted.
//!
//! Usage: `lumen_demo [scene.toml|scene.ron]`

use lumen_engine::config::{Config, SceneConfig};
use lumen_engine::foundation::logging;
use lumen_engine::foundation::math::{Mat4, Mat4Ext, Vec3};
use lumen_engine::render::lighting::{LightSelection, PointLightCollection};
use lumen_engine::render::primitives::quad_vertices;
use lumen_engine::render::{
    draw_quads_back_to_front, GraphicsBackend, HeadlessBackend, Model, RecordingProgram, ShaderProgram,
};
use lumen_engine::assets::ModelLoader;
use nalgebra::{Rotation3, Vector3};

const FRAMES: u32 = 3;
const FRAME_TIME: f32 = 1.0 / 60.0;
/// Radians per second the first two lights orbit the origin
const ORBIT_SPEED: f32 = 0.8;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load_from_file(&path)?,
        None => SceneConfig::default(),
    };
    logging::init_with_level(&config.log_level);
    config.validate()?;

    log::info!("Starting lumen demo scene");

    let mut backend = HeadlessBackend::new();
    let options = config.assets.load_options();

    let mut models: Vec<Model> = Vec::new();
    for entry in &config.models {
        let path = config.model_path(entry);
        match ModelLoader::load(&path, &mut backend, &options) {
            Ok(model) => models.push(model.with_position(entry.position())),
            Err(e) => log::warn!("Skipping model {:?}: {}", path, e),
        }
    }

    let lighting = &config.lighting;
    let mut lights = PointLightCollection::new(lighting.color(), lighting.levels(), lighting.attenuation())
        .with_space(lighting.space)
        .with_marker_scale(lighting.marker_scale);
    for position in &lighting.positions {
        lights.add_light_at_position(&mut backend, Vec3::from(*position))?;
    }
    let base_positions: Vec<Vec3> = lights.lights().iter().map(|l| l.position).collect();

    let camera = config.camera_position();
    let view = Mat4::look_at(camera, Vec3::zeros(), Vec3::y());
    let projection = Mat4::perspective(45.0, 800.0 / 600.0, 0.1, 100.0);
    let quads = config.transparent_quad_positions();
    let quad = backend.create_vertex_array(&quad_vertices())?;

    let mut phong = RecordingProgram::new("phong");
    let mut marker = RecordingProgram::new("light_cube");
    let mut blended = RecordingProgram::new("blended");

    for frame in 0..FRAMES {
        phong.clear_commands();
        marker.clear_commands();
        blended.clear_commands();

        let angle = frame as f32 * FRAME_TIME * ORBIT_SPEED;
        let orbit = Rotation3::from_axis_angle(&Vector3::y_axis(), angle);
        for (index, base) in base_positions.iter().enumerate().take(2) {
            if let Some(light) = lights.light_mut(index) {
                light.position = orbit * base;
            }
        }

        phong.set_mat4("view", &view);
        phong.set_mat4("projection", &projection);
        lights.update_shader(&mut phong, &view, LightSelection::All)?;
        for model in &models {
            model.draw(&mut phong);
        }

        marker.set_mat4("view", &view);
        marker.set_mat4("projection", &projection);
        lights.draw_all(&mut marker);

        blended.set_mat4("view", &view);
        blended.set_mat4("projection", &projection);
        draw_quads_back_to_front(&mut blended, quad, &quads, camera, config.transparent_quad_scale);

        log::debug!(
            "Frame {}: {} model draws, {} marker draws, {} blended draws",
            frame,
            phong.draw_count(),
            marker.draw_count(),
            blended.draw_count()
        );
    }

    let triangles: usize = models.iter().map(Model::triangle_count).sum();
    let diagnostics: usize = models.iter().map(|m| m.diagnostics().len()).sum();
    log::info!(
        "Scene summary: {} models, {} triangles, {} lights, {} textures, {} parse diagnostics",
        models.len(),
        triangles,
        lights.len(),
        backend.texture_count(),
        diagnostics
    );

    for model in models {
        model.release(&mut backend)?;
    }
    lights.release(&mut backend)?;
    backend.release_vertex_array(quad)?;
    log::info!("Released all GPU resources ({} uploads in total)", backend.total_uploads());
    Ok(())
}
