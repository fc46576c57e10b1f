//! Draw ordering for blended geometry

use super::backend::VertexArrayHandle;
use super::primitives::QUAD_VERTEX_COUNT;
use super::shader::ShaderProgram;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Order positions farthest-from-camera first
///
/// Blended quads must be drawn back to front after all opaque geometry.
/// Equal distances keep their input order.
pub fn sort_back_to_front(positions: &[Vec3], camera: Vec3) -> Vec<Vec3> {
    let mut sorted = positions.to_vec();
    // sort_by is stable
    sorted.sort_by(|a, b| {
        let da = (a - camera).norm_squared();
        let db = (b - camera).norm_squared();
        db.total_cmp(&da)
    });
    sorted
}

/// Draw one quad per position, farthest first, each scaled by `scale`
///
/// `quad` must hold [`quad_vertices`](super::primitives::quad_vertices).
pub fn draw_quads_back_to_front(
    shader: &mut dyn ShaderProgram,
    quad: VertexArrayHandle,
    positions: &[Vec3],
    camera: Vec3,
    scale: f32,
) {
    for position in sort_back_to_front(positions, camera) {
        shader.set_mat4("model", &Mat4::translation_scale(position, scale));
        shader.draw_arrays(quad, QUAD_VERTEX_COUNT);
    }
}
